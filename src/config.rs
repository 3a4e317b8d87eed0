//! Translation configuration (§6.2): dialect selection, output mode, and the
//! resource limits enforced by the Output Buffer (C3).

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Literal SQL tokens are written inline, escaped per dialect.
    Inline,
    /// Literals reserve an ordinal placeholder and are returned as bound values.
    Parameterized,
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Inline
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub dialect: ConfigDialect,
    pub mode: OutputMode,
    pub max_depth: usize,
    pub max_output_length: usize,
    pub max_comprehension_nesting: usize,
    pub max_pattern_length: usize,
    pub max_identifier_length: usize,
    pub max_bytes_literal: usize,
    /// Whether [`crate::advisor`] should re-walk the AST after translation.
    pub recommend_indexes: bool,
}

/// Serde-friendly wrapper around [`Dialect`] so `TranslateConfig` round-trips
/// through the lowercase dialect names used on the wire (§6.2) without
/// exposing string parsing at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigDialect(pub Dialect);

impl Default for ConfigDialect {
    fn default() -> Self {
        ConfigDialect(Dialect::Postgres)
    }
}

impl Serialize for ConfigDialect {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let name = match self.0 {
            Dialect::Postgres => "postgresql",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
            Dialect::DuckDb => "duckdb",
            Dialect::BigQuery => "bigquery",
        };
        serializer.serialize_str(name)
    }
}

impl<'de> Deserialize<'de> for ConfigDialect {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Dialect::parse(&raw)
            .map(ConfigDialect)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized dialect '{raw}'")))
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            dialect: ConfigDialect::default(),
            mode: OutputMode::default(),
            max_depth: 100,
            max_output_length: 50_000,
            max_comprehension_nesting: 3,
            max_pattern_length: 500,
            max_identifier_length: 63,
            max_bytes_literal: 10_000,
            recommend_indexes: false,
        }
    }
}

impl TranslateConfig {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect: ConfigDialect(dialect),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_recommend_indexes(mut self, recommend: bool) -> Self {
        self.recommend_indexes = recommend;
        self
    }
}
