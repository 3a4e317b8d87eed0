//! MySQL dialect. Backtick identifiers, numeric booleans, `?` placeholders,
//! best-effort ICU regex via `REGEXP_LIKE`, and JSON-backed arrays (MySQL has
//! no native array type, so `FieldKind::Array` fields are stored as JSON
//! arrays and walked through `JSON_TABLE`).

use crate::buffer::OutputBuffer;
use crate::error::TranslateResult;

use super::{CastType, CelDialect, JsonExtractMode, Thunk};

pub struct MySql;

impl CelDialect for MySql {
    fn quote_identifier(&self, name: &str) -> String {
        super::helpers::quote_backtick(name)
    }

    fn format_bool(&self, b: bool) -> String {
        super::helpers::format_bool_numeric(b).to_string()
    }

    fn format_bytes(&self, bytes: &[u8]) -> String {
        super::helpers::format_bytes_x_quote(bytes)
    }

    fn placeholder(&self, _ordinal: usize) -> String {
        "?".to_string()
    }

    /// Not RE2; MySQL 8's ICU-backed `REGEXP_LIKE` covers a usable subset.
    /// The translator validates the pattern against that subset before
    /// calling this, since [`Self::supports_native_regex`] is `false`.
    fn supports_native_regex(&self) -> bool {
        false
    }

    fn write_matches(
        &self,
        buf: &mut OutputBuffer,
        subject: &mut Thunk,
        pattern: &str,
        case_insensitive: bool,
    ) -> TranslateResult<()> {
        buf.push_str("REGEXP_LIKE(")?;
        subject(buf)?;
        buf.push_str(", ")?;
        buf.push_str(&self.quote_string(pattern))?;
        buf.push_str(if case_insensitive { ", 'i')" } else { ", 'c')" })
    }

    fn write_array_length(&self, buf: &mut OutputBuffer, array: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("JSON_LENGTH(")?;
        array(buf)?;
        buf.push_char(')')
    }

    fn array_literal_open(&self) -> &'static str {
        "JSON_ARRAY("
    }

    fn array_literal_close(&self) -> &'static str {
        ")"
    }

    fn write_in_array(&self, buf: &mut OutputBuffer, needle: &mut Thunk, array: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("JSON_CONTAINS(")?;
        array(buf)?;
        buf.push_str(", JSON_ARRAY(")?;
        needle(buf)?;
        buf.push_str("))")
    }

    fn write_unnest(&self, buf: &mut OutputBuffer, array: &mut Thunk, alias: &str) -> TranslateResult<()> {
        buf.push_str("JSON_TABLE(")?;
        array(buf)?;
        buf.push_str(", '$[*]' COLUMNS (value JSON PATH '$')) AS ")?;
        buf.push_str(alias)
    }

    fn iter_var_ref(&self, alias: &str) -> String {
        format!("{alias}.value")
    }

    fn write_json_path_step(
        &self,
        buf: &mut OutputBuffer,
        receiver: &mut Thunk,
        key: &str,
        mode: JsonExtractMode,
    ) -> TranslateResult<()> {
        if matches!(mode, JsonExtractMode::Scalar) {
            buf.push_str("JSON_UNQUOTE(")?;
        }
        buf.push_str("JSON_EXTRACT(")?;
        receiver(buf)?;
        buf.push_str(", '$.")?;
        buf.push_str(key)?;
        buf.push_str("')")?;
        if matches!(mode, JsonExtractMode::Scalar) {
            buf.push_char(')')?;
        }
        Ok(())
    }

    fn write_json_key_exists(&self, buf: &mut OutputBuffer, receiver: &mut Thunk, key: &str, _binary: bool) -> TranslateResult<()> {
        buf.push_str("JSON_CONTAINS_PATH(")?;
        receiver(buf)?;
        buf.push_str(", 'one', '$.")?;
        buf.push_str(key)?;
        buf.push_str("')")
    }

    fn write_json_numeric_cast(&self, buf: &mut OutputBuffer, value: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("CAST(")?;
        value(buf)?;
        buf.push_str(" AS DECIMAL)")
    }

    fn cast_keyword(&self, target: CastType) -> &'static str {
        match target {
            CastType::Int => "SIGNED",
            CastType::UInt => "UNSIGNED",
            CastType::Double => "DOUBLE",
            CastType::String => "CHAR",
            CastType::Bool => "UNSIGNED",
            CastType::Bytes => "BINARY",
            CastType::Timestamp => "DATETIME",
            CastType::Duration => "CHAR",
        }
    }
}
