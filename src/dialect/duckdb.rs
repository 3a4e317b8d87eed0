//! DuckDB dialect. PostgreSQL-compatible with a few divergences: regex goes
//! through `regexp_matches()` rather than `~`, array length uses `len()`, and
//! DuckDB has no binary/text JSON split (`json_exists()` covers existence
//! regardless of the schema's `binary` flag).

use crate::buffer::OutputBuffer;
use crate::error::TranslateResult;

use super::{CelDialect, JsonExtractMode, Thunk};

pub struct DuckDb;

impl CelDialect for DuckDb {
    fn write_matches(
        &self,
        buf: &mut OutputBuffer,
        subject: &mut Thunk,
        pattern: &str,
        case_insensitive: bool,
    ) -> TranslateResult<()> {
        buf.push_str("regexp_matches(")?;
        subject(buf)?;
        buf.push_str(", ")?;
        buf.push_str(&self.quote_string(pattern))?;
        if case_insensitive {
            buf.push_str(", 'i'")?;
        }
        buf.push_char(')')
    }

    fn write_array_length(&self, buf: &mut OutputBuffer, array: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("len(")?;
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
        receiver(buf)?;
        buf.push_str(match mode {
            JsonExtractMode::Scalar => "->>",
            JsonExtractMode::Subtree => "->",
        })?;
        buf.push_str(&self.quote_string(key))
    }

    fn write_json_key_exists(&self, buf: &mut OutputBuffer, receiver: &mut Thunk, key: &str, _binary: bool) -> TranslateResult<()> {
        buf.push_str("json_exists(")?;
        receiver(buf)?;
        buf.push_str(", '$.")?;
        buf.push_str(key)?;
        buf.push_str("')")
    }
}
