//! BigQuery dialect. Backtick identifiers, `@pN` placeholders, bracket array
//! literals, `UNNEST`-membership instead of `= ANY`, and the
//! `JSON_VALUE`/`JSON_QUERY` path functions in place of operator syntax.

use crate::buffer::OutputBuffer;
use crate::error::TranslateResult;

use super::{CastType, CelDialect, JsonExtractMode, Thunk};

pub struct BigQuery;

impl CelDialect for BigQuery {
    fn quote_identifier(&self, name: &str) -> String {
        super::helpers::quote_backtick(name)
    }

    fn format_bytes(&self, bytes: &[u8]) -> String {
        super::helpers::format_bytes_b_string(bytes)
    }

    fn placeholder(&self, ordinal: usize) -> String {
        format!("@p{ordinal}")
    }

    fn write_matches(
        &self,
        buf: &mut OutputBuffer,
        subject: &mut Thunk,
        pattern: &str,
        case_insensitive: bool,
    ) -> TranslateResult<()> {
        buf.push_str("REGEXP_CONTAINS(")?;
        subject(buf)?;
        buf.push_str(", ")?;
        if case_insensitive {
            buf.push_str(&self.quote_string(&format!("(?i){pattern}")))?;
        } else {
            buf.push_str(&self.quote_string(pattern))?;
        }
        buf.push_char(')')
    }

    fn write_contains(&self, buf: &mut OutputBuffer, subject: &mut Thunk, needle: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("STRPOS(")?;
        subject(buf)?;
        buf.push_str(", ")?;
        needle(buf)?;
        buf.push_str(") > 0")
    }

    fn write_array_length(&self, buf: &mut OutputBuffer, array: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("ARRAY_LENGTH(")?;
        array(buf)?;
        buf.push_char(')')
    }

    fn array_literal_open(&self) -> &'static str {
        "["
    }

    fn array_literal_close(&self) -> &'static str {
        "]"
    }

    fn write_in_array(&self, buf: &mut OutputBuffer, needle: &mut Thunk, array: &mut Thunk) -> TranslateResult<()> {
        needle(buf)?;
        buf.push_str(" IN UNNEST(")?;
        array(buf)?;
        buf.push_char(')')
    }

    fn write_json_path_step(
        &self,
        buf: &mut OutputBuffer,
        receiver: &mut Thunk,
        key: &str,
        mode: JsonExtractMode,
    ) -> TranslateResult<()> {
        buf.push_str(match mode {
            JsonExtractMode::Scalar => "JSON_VALUE(",
            JsonExtractMode::Subtree => "JSON_QUERY(",
        })?;
        receiver(buf)?;
        buf.push_str(", '$.")?;
        buf.push_str(key)?;
        buf.push_str("')")
    }

    fn write_json_key_exists(&self, buf: &mut OutputBuffer, receiver: &mut Thunk, key: &str, _binary: bool) -> TranslateResult<()> {
        buf.push_str("JSON_VALUE(")?;
        receiver(buf)?;
        buf.push_str(", '$.")?;
        buf.push_str(key)?;
        buf.push_str("') IS NOT NULL")
    }

    fn write_json_numeric_cast(&self, buf: &mut OutputBuffer, value: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("CAST(")?;
        value(buf)?;
        buf.push_str(" AS FLOAT64)")
    }

    fn cast_keyword(&self, target: CastType) -> &'static str {
        match target {
            CastType::Int => "INT64",
            CastType::UInt => "INT64",
            CastType::Double => "FLOAT64",
            CastType::String => "STRING",
            CastType::Bool => "BOOL",
            CastType::Bytes => "BYTES",
            CastType::Timestamp => "TIMESTAMP",
            CastType::Duration => "INTERVAL",
        }
    }
}
