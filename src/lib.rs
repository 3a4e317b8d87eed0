//! # cel-sql
//!
//! A CEL (Common Expression Language) to SQL translation kernel: compiles a
//! CEL AST into a dialect-valid `WHERE`-clause fragment across PostgreSQL,
//! DuckDB, BigQuery, MySQL and SQLite.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │         CEL AST + Schema Registry + Config               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [translate::translate]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Translator (walks the AST, consults the Dialect for    │
//! │   every syntactic choice and the Schema for every field) │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!            ┌────────────┴────────────┐
//!            ▼                         ▼ [advisor, optional]
//! ┌───────────────────────┐ ┌───────────────────────────────┐
//! │ SQL text + Parameters  │ │     Index Recommendations      │
//! └───────────────────────┘ └───────────────────────────────┘
//! ```
//!
//! The kernel ([`translate`]) is pure: no I/O, no logging, a single
//! synchronous pass per call. It is safe to share one [`schema::SchemaRegistry`]
//! and one [`dialect::Dialect`] across threads; all mutable state
//! ([`buffer::OutputBuffer`], [`binder::ParameterBinder`]) is per-call.

pub mod advisor;
pub mod ast;
pub mod binder;
pub mod buffer;
pub mod config;
pub mod dialect;
pub mod error;
pub mod schema;
pub mod translate;

pub use advisor::{recommend_indexes, IndexPriority, IndexRecommendation};
pub use ast::{BinaryOperator, Callee, Comprehension, ComprehensionKind, Entry, Expr, Literal, Span, UnaryOperator};
pub use binder::BoundValue;
pub use config::{OutputMode, TranslateConfig};
pub use dialect::Dialect;
pub use error::{TranslateError, TranslateErrorKind, TranslateResult};
pub use schema::{FieldKind, FieldSchema, Schema, SchemaRegistry, ScalarType};
pub use translate::{translate, Context, TranslationOutput};
