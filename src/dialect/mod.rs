//! Dialect capability table (C5): the abstract write-primitives the
//! translator invokes for every syntactic choice. Each capability that wraps
//! a sub-expression receives the output buffer plus one or more emit-thunks
//! (`&mut dyn FnMut(&mut OutputBuffer) -> TranslateResult<()>`) rather than a
//! pre-rendered string, so dialects can interleave their own syntax with
//! translated operands — this is what lets suffix-cast dialects
//! (`expr::numeric`) and function-cast dialects (`CAST(expr AS FLOAT64)`)
//! share one walker. Flag-style methods are declared with sensible ANSI
//! defaults, overridden only where a dialect actually differs.

pub mod bigquery;
pub mod duckdb;
pub mod helpers;
pub mod mysql;
pub mod postgres;
pub mod sqlite;

use crate::buffer::OutputBuffer;
use crate::error::TranslateResult;

/// A deferred sub-expression emitter: invoking it writes the translated
/// operand into the shared buffer.
pub type Thunk<'a> = dyn FnMut(&mut OutputBuffer) -> TranslateResult<()> + 'a;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastType {
    Int,
    UInt,
    Double,
    String,
    Bool,
    Bytes,
    Timestamp,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalComponent {
    FullYear,
    Month,
    DayOfMonth,
    Hours,
    Minutes,
    Seconds,
}

/// Which CEL macro a comprehension lowers to; used by `write_unnest` callers
/// to pick SELECT-list shape, not by the dialect itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonExtractMode {
    /// The selection is used as a value: scalar-extract operator (`->>`).
    Scalar,
    /// The selection is a receiver for further indexing: subtree-extract (`->`).
    Subtree,
}

/// A concrete SQL target. Every capability below covers one of the ≈40
/// operations the translator needs; where two dialects agree, the trait
/// default suffices.
pub trait CelDialect {
    // ---- identifier / literal formatting -------------------------------

    fn quote_identifier(&self, name: &str) -> String {
        helpers::quote_double(name)
    }

    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    fn format_bool(&self, b: bool) -> String {
        helpers::format_bool_keyword(b).to_string()
    }

    fn format_null(&self) -> String {
        "NULL".to_string()
    }

    fn format_bytes(&self, bytes: &[u8]) -> String {
        helpers::format_bytes_hex(bytes)
    }

    /// `true` for dialects with native RE2-ish regex (`~` / `REGEXP_CONTAINS`);
    /// `false` for dialects requiring best-effort translation (MySQL, SQLite).
    fn supports_native_regex(&self) -> bool {
        true
    }

    // ---- parameter placeholders -----------------------------------------

    /// 1-based ordinal placeholder spelling: `$N`, `@pN`, or `?`.
    fn placeholder(&self, ordinal: usize) -> String {
        format!("${ordinal}")
    }

    fn write_placeholder(&self, buf: &mut OutputBuffer, ordinal: usize) -> TranslateResult<()> {
        buf.push_str(&self.placeholder(ordinal))
    }

    // ---- operator overloading --------------------------------------------

    /// String concatenation operator/function.
    fn write_concat(&self, buf: &mut OutputBuffer, lhs: &mut Thunk, rhs: &mut Thunk) -> TranslateResult<()> {
        lhs(buf)?;
        buf.push_str(" || ")?;
        rhs(buf)
    }

    /// `timestamp + duration` or `duration + timestamp`.
    fn write_temporal_add(&self, buf: &mut OutputBuffer, lhs: &mut Thunk, rhs: &mut Thunk) -> TranslateResult<()> {
        lhs(buf)?;
        buf.push_str(" + ")?;
        rhs(buf)
    }

    /// `timestamp - duration` or `timestamp - timestamp`.
    fn write_temporal_sub(&self, buf: &mut OutputBuffer, lhs: &mut Thunk, rhs: &mut Thunk) -> TranslateResult<()> {
        lhs(buf)?;
        buf.push_str(" - ")?;
        rhs(buf)
    }

    // ---- regex --------------------------------------------------------

    /// Emits a `matches(subject, pattern)` call. `pattern` is a literal CEL
    /// (RE2-subset) string; dialects lacking native RE2 may translate the
    /// supported subset or the translator surfaces `RegexUnsupported`.
    fn write_matches(
        &self,
        buf: &mut OutputBuffer,
        subject: &mut Thunk,
        pattern: &str,
        case_insensitive: bool,
    ) -> TranslateResult<()>;

    // ---- string ops -----------------------------------------------------

    fn write_contains(&self, buf: &mut OutputBuffer, subject: &mut Thunk, needle: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("POSITION(")?;
        needle(buf)?;
        buf.push_str(" IN ")?;
        subject(buf)?;
        buf.push_str(") > 0")
    }

    fn write_starts_with(&self, buf: &mut OutputBuffer, subject: &mut Thunk, prefix: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("STARTS_WITH(")?;
        subject(buf)?;
        buf.push_str(", ")?;
        prefix(buf)?;
        buf.push_char(')')
    }

    fn write_ends_with(&self, buf: &mut OutputBuffer, subject: &mut Thunk, suffix: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("ENDS_WITH(")?;
        subject(buf)?;
        buf.push_str(", ")?;
        suffix(buf)?;
        buf.push_char(')')
    }

    fn write_string_length(&self, buf: &mut OutputBuffer, subject: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("LENGTH(")?;
        subject(buf)?;
        buf.push_char(')')
    }

    fn write_split(&self, buf: &mut OutputBuffer, subject: &mut Thunk, sep: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("SPLIT(")?;
        subject(buf)?;
        buf.push_str(", ")?;
        sep(buf)?;
        buf.push_char(')')
    }

    fn write_join(&self, buf: &mut OutputBuffer, array: &mut Thunk, sep: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("ARRAY_TO_STRING(")?;
        array(buf)?;
        buf.push_str(", ")?;
        sep(buf)?;
        buf.push_char(')')
    }

    // ---- array ops -------------------------------------------------------

    fn write_array_length(&self, buf: &mut OutputBuffer, array: &mut Thunk) -> TranslateResult<()> {
        buf.push_str("ARRAY_LENGTH(")?;
        array(buf)?;
        buf.push_str(", 1)")
    }

    /// `ARRAY[a, b, c]`-style literal construction. Declarative rather than
    /// thunk-driven: the translator emits each element itself, separated by
    /// [`Self::array_literal_separator`], between these two delimiters. An
    /// open/close pair (rather than a callback) keeps the translator from
    /// needing more than one live sub-expression borrow at a time when an
    /// element count is unknown up front.
    fn array_literal_open(&self) -> &'static str {
        "ARRAY["
    }

    fn array_literal_separator(&self) -> &'static str {
        ", "
    }

    fn array_literal_close(&self) -> &'static str {
        "]"
    }

    fn write_in_array(&self, buf: &mut OutputBuffer, needle: &mut Thunk, array: &mut Thunk) -> TranslateResult<()> {
        needle(buf)?;
        buf.push_str(" = ANY(")?;
        array(buf)?;
        buf.push_char(')')
    }

    /// `UNNEST(array) AS alias`-equivalent range source, as required by
    /// macro translation (§4.6.5).
    fn write_unnest(&self, buf: &mut OutputBuffer, array: &mut Thunk, alias: &str) -> TranslateResult<()> {
        buf.push_str("UNNEST(")?;
        array(buf)?;
        buf.push_str(") AS ")?;
        buf.push_str(alias)
    }

    /// How the bound iteration variable is referenced as a whole element
    /// value. Dialects whose unnest primitive produces a row rather than a
    /// bare scalar (MySQL's `JSON_TABLE`, SQLite's `json_each`) override this
    /// to project the value column.
    fn iter_var_ref(&self, alias: &str) -> String {
        alias.to_string()
    }

    // ---- JSON ops ----------------------------------------------------------

    /// One JSON path step. `scalar_extract` selects `->>`-style text
    /// extraction (final segment used as a value) vs. `->`-style subtree
    /// extraction (used as a receiver for further indexing).
    fn write_json_path_step(
        &self,
        buf: &mut OutputBuffer,
        receiver: &mut Thunk,
        key: &str,
        mode: JsonExtractMode,
    ) -> TranslateResult<()>;

    /// Default fallback: extract the key and test for non-null. Dialects with
    /// a dedicated existence operator (PostgreSQL's `?`, MySQL's
    /// `JSON_CONTAINS_PATH`) override this with the cheaper form. `binary`
    /// carries the schema's `FieldKind::Json { binary }` flag through for the
    /// one dialect (PostgreSQL) whose existence operator depends on it: `?`
    /// is only defined on `jsonb`, so a plain `json` column still needs the
    /// extract-and-compare fallback.
    fn write_json_key_exists(&self, buf: &mut OutputBuffer, receiver: &mut Thunk, key: &str, binary: bool) -> TranslateResult<()> {
        let _ = binary;
        self.write_json_path_step(buf, receiver, key, JsonExtractMode::Scalar)?;
        buf.push_str(" IS NOT NULL")
    }

    /// Wraps a JSON-extracted text value for comparison against a numeric
    /// literal.
    fn write_json_numeric_cast(&self, buf: &mut OutputBuffer, value: &mut Thunk) -> TranslateResult<()> {
        buf.push_char('(')?;
        value(buf)?;
        buf.push_str(")::numeric")
    }

    // ---- casts --------------------------------------------------------

    fn write_cast(&self, buf: &mut OutputBuffer, value: &mut Thunk, target: CastType) -> TranslateResult<()> {
        buf.push_str("CAST(")?;
        value(buf)?;
        buf.push_str(" AS ")?;
        buf.push_str(self.cast_keyword(target))?;
        buf.push_char(')')
    }

    fn cast_keyword(&self, target: CastType) -> &'static str {
        match target {
            CastType::Int => "BIGINT",
            CastType::UInt => "BIGINT",
            CastType::Double => "DOUBLE PRECISION",
            CastType::String => "TEXT",
            CastType::Bool => "BOOLEAN",
            CastType::Bytes => "BYTEA",
            CastType::Timestamp => "TIMESTAMP",
            CastType::Duration => "INTERVAL",
        }
    }

    // ---- temporal -------------------------------------------------------

    fn write_temporal_component(
        &self,
        buf: &mut OutputBuffer,
        value: &mut Thunk,
        component: TemporalComponent,
    ) -> TranslateResult<()> {
        buf.push_str("EXTRACT(")?;
        buf.push_str(self.temporal_unit_keyword(component))?;
        buf.push_str(" FROM ")?;
        value(buf)?;
        buf.push_char(')')
    }

    fn temporal_unit_keyword(&self, component: TemporalComponent) -> &'static str {
        match component {
            TemporalComponent::FullYear => "YEAR",
            TemporalComponent::Month => "MONTH",
            TemporalComponent::DayOfMonth => "DAY",
            TemporalComponent::Hours => "HOUR",
            TemporalComponent::Minutes => "MINUTE",
            TemporalComponent::Seconds => "SECOND",
        }
    }
}

/// A concrete dialect selection, usable as a value (e.g. loaded from
/// [`crate::config::TranslateConfig`]) that dispatches to one of the five
/// realizations below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
    DuckDb,
    BigQuery,
}

impl Dialect {
    /// Case-insensitive parse of the `dialect` configuration option (§6.2).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Some(Dialect::Postgres),
            "mysql" => Some(Dialect::MySql),
            "sqlite" => Some(Dialect::Sqlite),
            "duckdb" => Some(Dialect::DuckDb),
            "bigquery" => Some(Dialect::BigQuery),
            _ => None,
        }
    }

    fn dialect(&self) -> &'static dyn CelDialect {
        match self {
            Dialect::Postgres => &postgres::Postgres,
            Dialect::MySql => &mysql::MySql,
            Dialect::Sqlite => &sqlite::Sqlite,
            Dialect::DuckDb => &duckdb::DuckDb,
            Dialect::BigQuery => &bigquery::BigQuery,
        }
    }
}

impl CelDialect for Dialect {
    fn quote_identifier(&self, name: &str) -> String {
        self.dialect().quote_identifier(name)
    }
    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }
    fn format_bool(&self, b: bool) -> String {
        self.dialect().format_bool(b)
    }
    fn format_null(&self) -> String {
        self.dialect().format_null()
    }
    fn format_bytes(&self, bytes: &[u8]) -> String {
        self.dialect().format_bytes(bytes)
    }
    fn supports_native_regex(&self) -> bool {
        self.dialect().supports_native_regex()
    }
    fn placeholder(&self, ordinal: usize) -> String {
        self.dialect().placeholder(ordinal)
    }
    fn write_placeholder(&self, buf: &mut OutputBuffer, ordinal: usize) -> TranslateResult<()> {
        self.dialect().write_placeholder(buf, ordinal)
    }
    fn write_concat(&self, buf: &mut OutputBuffer, lhs: &mut Thunk, rhs: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_concat(buf, lhs, rhs)
    }
    fn write_temporal_add(&self, buf: &mut OutputBuffer, lhs: &mut Thunk, rhs: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_temporal_add(buf, lhs, rhs)
    }
    fn write_temporal_sub(&self, buf: &mut OutputBuffer, lhs: &mut Thunk, rhs: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_temporal_sub(buf, lhs, rhs)
    }
    fn write_matches(
        &self,
        buf: &mut OutputBuffer,
        subject: &mut Thunk,
        pattern: &str,
        case_insensitive: bool,
    ) -> TranslateResult<()> {
        self.dialect().write_matches(buf, subject, pattern, case_insensitive)
    }
    fn write_contains(&self, buf: &mut OutputBuffer, subject: &mut Thunk, needle: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_contains(buf, subject, needle)
    }
    fn write_starts_with(&self, buf: &mut OutputBuffer, subject: &mut Thunk, prefix: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_starts_with(buf, subject, prefix)
    }
    fn write_ends_with(&self, buf: &mut OutputBuffer, subject: &mut Thunk, suffix: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_ends_with(buf, subject, suffix)
    }
    fn write_string_length(&self, buf: &mut OutputBuffer, subject: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_string_length(buf, subject)
    }
    fn write_split(&self, buf: &mut OutputBuffer, subject: &mut Thunk, sep: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_split(buf, subject, sep)
    }
    fn write_join(&self, buf: &mut OutputBuffer, array: &mut Thunk, sep: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_join(buf, array, sep)
    }
    fn write_array_length(&self, buf: &mut OutputBuffer, array: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_array_length(buf, array)
    }
    fn array_literal_open(&self) -> &'static str {
        self.dialect().array_literal_open()
    }
    fn array_literal_separator(&self) -> &'static str {
        self.dialect().array_literal_separator()
    }
    fn array_literal_close(&self) -> &'static str {
        self.dialect().array_literal_close()
    }
    fn write_in_array(&self, buf: &mut OutputBuffer, needle: &mut Thunk, array: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_in_array(buf, needle, array)
    }
    fn write_unnest(&self, buf: &mut OutputBuffer, array: &mut Thunk, alias: &str) -> TranslateResult<()> {
        self.dialect().write_unnest(buf, array, alias)
    }
    fn iter_var_ref(&self, alias: &str) -> String {
        self.dialect().iter_var_ref(alias)
    }
    fn write_json_path_step(
        &self,
        buf: &mut OutputBuffer,
        receiver: &mut Thunk,
        key: &str,
        mode: JsonExtractMode,
    ) -> TranslateResult<()> {
        self.dialect().write_json_path_step(buf, receiver, key, mode)
    }
    fn write_json_key_exists(&self, buf: &mut OutputBuffer, receiver: &mut Thunk, key: &str, binary: bool) -> TranslateResult<()> {
        self.dialect().write_json_key_exists(buf, receiver, key, binary)
    }
    fn write_json_numeric_cast(&self, buf: &mut OutputBuffer, value: &mut Thunk) -> TranslateResult<()> {
        self.dialect().write_json_numeric_cast(buf, value)
    }
    fn write_cast(&self, buf: &mut OutputBuffer, value: &mut Thunk, target: CastType) -> TranslateResult<()> {
        self.dialect().write_cast(buf, value, target)
    }
    fn cast_keyword(&self, target: CastType) -> &'static str {
        self.dialect().cast_keyword(target)
    }
    fn write_temporal_component(
        &self,
        buf: &mut OutputBuffer,
        value: &mut Thunk,
        component: TemporalComponent,
    ) -> TranslateResult<()> {
        self.dialect().write_temporal_component(buf, value, component)
    }
    fn temporal_unit_keyword(&self, component: TemporalComponent) -> &'static str {
        self.dialect().temporal_unit_keyword(component)
    }
}
