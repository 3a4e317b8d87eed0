//! SQLite dialect. Double-quoted identifiers, numeric booleans (no native
//! `BOOLEAN` type), `?` placeholders, the JSON1 extension's `json_extract`/
//! `json_each` for JSON and array work, and `strftime`-based temporal
//! component accessors (SQLite has no `EXTRACT`). Has no SPQL-native regex at
//! all, so [`Self::supports_native_regex`] is `false` like MySQL.

use crate::buffer::OutputBuffer;
use crate::error::TranslateResult;

use super::{CastType, CelDialect, JsonExtractMode, TemporalComponent, Thunk};

pub struct Sqlite;

impl CelDialect for Sqlite {
    fn format_bool(&self, b: bool) -> String {
        super::helpers::format_bool_numeric(b).to_string()
    }

    fn format_bytes(&self, bytes: &[u8]) -> String {
        super::helpers::format_bytes_x_quote(bytes)
    }

    fn placeholder(&self, _ordinal: usize) -> String {
        "?".to_string()
    }

    /// SQLite has no built-in regex; the `REGEXP` operator only exists if the
    /// host application registers a user function for it, which this kernel
    /// cannot assume. Best-effort: emit `REGEXP` and let callers register a
    /// compatible function, but report no native support so the translator
    /// validates the pattern against the safe subset first.
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
        if case_insensitive {
            buf.push_str("LOWER(")?;
            subject(buf)?;
            buf.push_str(") REGEXP LOWER(")?;
            buf.push_str(&self.quote_string(pattern))?;
            buf.push_char(')')
        } else {
            subject(buf)?;
            buf.push_str(" REGEXP ")?;
            buf.push_str(&self.quote_string(pattern))
        }
    }

    fn write_array_length(&self, buf: &mut OutputBuffer, array: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("json_array_length(")?;
        array(buf)?;
        buf.push_char(')')
    }

    fn array_literal_open(&self) -> &'static str {
        "json_array("
    }

    fn array_literal_close(&self) -> &'static str {
        ")"
    }

    fn write_in_array(&self, buf: &mut OutputBuffer, needle: &mut Thunk, array: &mut Thunk) -> TranslateResult<()> {
        needle(buf)?;
        buf.push_str(" IN (SELECT value FROM json_each(")?;
        array(buf)?;
        buf.push_str("))")
    }

    fn write_unnest(&self, buf: &mut OutputBuffer, array: &mut Thunk, alias: &str) -> TranslateResult<()> {
        buf.push_str("json_each(")?;
        array(buf)?;
        buf.push_str(") AS ")?;
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
        _mode: JsonExtractMode,
    ) -> TranslateResult<()> {
        buf.push_str("json_extract(")?;
        receiver(buf)?;
        buf.push_str(", '$.")?;
        buf.push_str(key)?;
        buf.push_str("')")
    }

    fn write_json_numeric_cast(&self, buf: &mut OutputBuffer, value: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("CAST(")?;
        value(buf)?;
        buf.push_str(" AS REAL)")
    }

    fn cast_keyword(&self, target: CastType) -> &'static str {
        match target {
            CastType::Int => "INTEGER",
            CastType::UInt => "INTEGER",
            CastType::Double => "REAL",
            CastType::String => "TEXT",
            CastType::Bool => "INTEGER",
            CastType::Bytes => "BLOB",
            CastType::Timestamp => "TEXT",
            CastType::Duration => "TEXT",
        }
    }

    fn write_temporal_component(
        &self,
        buf: &mut OutputBuffer,
        value: &mut Thunk,
        component: TemporalComponent,
    ) -> TranslateResult<()> {
        buf.push_str("CAST(strftime('")?;
        buf.push_str(self.temporal_unit_keyword(component))?;
        buf.push_str("', ")?;
        value(buf)?;
        buf.push_str(") AS INTEGER)")
    }

    fn temporal_unit_keyword(&self, component: TemporalComponent) -> &'static str {
        match component {
            TemporalComponent::FullYear => "%Y",
            TemporalComponent::Month => "%m",
            TemporalComponent::DayOfMonth => "%d",
            TemporalComponent::Hours => "%H",
            TemporalComponent::Minutes => "%M",
            TemporalComponent::Seconds => "%S",
        }
    }
}
