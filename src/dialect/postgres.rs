//! PostgreSQL dialect. Most capabilities use the trait's ANSI-flavored
//! defaults (which are modeled on PostgreSQL to begin with); this struct
//! overrides only what PostgreSQL spells differently: native regex via `~`,
//! and the `->`/`->>` JSON path operators with `?` key-existence (only valid
//! on `jsonb`, so plain `json` columns fall back to `IS NOT NULL`).

use crate::buffer::OutputBuffer;
use crate::error::TranslateResult;

use super::{CelDialect, JsonExtractMode, Thunk};

pub struct Postgres;

impl CelDialect for Postgres {
    fn write_matches(
        &self,
        buf: &mut OutputBuffer,
        subject: &mut Thunk,
        pattern: &str,
        case_insensitive: bool,
    ) -> TranslateResult<()> {
        subject(buf)?;
        buf.push_str(if case_insensitive { " ~* " } else { " ~ " })?;
        buf.push_str(&self.quote_string(pattern))
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

    fn write_json_key_exists(&self, buf: &mut OutputBuffer, receiver: &mut Thunk, key: &str, binary: bool) -> TranslateResult<()> {
        if !binary {
            // `?` is jsonb-only; a plain `json` column has no existence
            // operator, so fall back to extract-and-compare.
            self.write_json_path_step(buf, receiver, key, JsonExtractMode::Scalar)?;
            return buf.push_str(" IS NOT NULL");
        }
        receiver(buf)?;
        buf.push_str(" ? ")?;
        buf.push_str(&self.quote_string(key))
    }
}
