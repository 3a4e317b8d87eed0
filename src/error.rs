//! Dual-channel error model for the translation kernel.
//!
//! Every failure is a [`TranslateErrorKind`] wrapped in [`TranslateError`]. The
//! kind carries both a public-safe message and a diagnostic message as methods
//! rather than as two separate error types, so the taxonomy stays a single
//! exhaustive match site.

use std::fmt;

use crate::ast::Span;

pub type TranslateResult<T> = Result<T, TranslateError>;

/// Taxonomy of kernel failures. One variant per §7 entry; each carries the
/// structured data needed to render both a public and a diagnostic message.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateErrorKind {
    /// The AST is not well-formed (a node references fields it cannot carry,
    /// e.g. a `Comprehension` missing an accumulator in macros that require one).
    ParseRejected { reason: String, at: Option<Span> },

    /// A CEL construct or operator outside the accepted surface (§6.1).
    UnsupportedFeature { feature: String, at: Option<Span> },

    /// Identifier does not resolve against the registry and has no dialect fallback.
    UnresolvedIdentifier { name: String, at: Option<Span> },

    /// An operator or receiver rejected the inferred operand type.
    TypeMismatch {
        operator: String,
        expected: String,
        found: String,
        at: Option<Span>,
    },

    /// `size()` called on a receiver whose type could not be inferred.
    AmbiguousSize { at: Option<Span> },

    /// A `FieldSelect` continued past a scalar field.
    NonJSONPath { field: String, at: Option<Span> },

    /// The dialect cannot express the requested regular expression.
    RegexUnsupported { pattern_kind: String, at: Option<Span> },

    /// A field or table name fails length or character policy.
    InvalidIdentifier { name: String, at: Option<Span> },

    /// AST recursion depth exceeded `max_depth`.
    DepthExceeded { limit: usize, at: Option<Span> },

    /// Emitted SQL length exceeded `max_output_length`.
    OutputTooLarge { limit: usize },

    /// Comprehension nesting exceeded `max_comprehension_nesting`.
    ComprehensionTooDeep { limit: usize, at: Option<Span> },

    /// A `matches()` pattern literal exceeded `max_pattern_length`.
    PatternTooLong { limit: usize, at: Option<Span> },

    /// A bytes literal exceeded `max_bytes_literal`.
    BytesTooLarge { limit: usize, at: Option<Span> },

    /// An invariant was violated; this should never occur in correct input.
    Internal { detail: String, at: Option<Span> },
}

impl TranslateErrorKind {
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::ParseRejected { at, .. }
            | Self::UnsupportedFeature { at, .. }
            | Self::UnresolvedIdentifier { at, .. }
            | Self::TypeMismatch { at, .. }
            | Self::AmbiguousSize { at }
            | Self::NonJSONPath { at, .. }
            | Self::RegexUnsupported { at, .. }
            | Self::InvalidIdentifier { at, .. }
            | Self::DepthExceeded { at, .. }
            | Self::ComprehensionTooDeep { at, .. }
            | Self::PatternTooLong { at, .. }
            | Self::BytesTooLarge { at, .. }
            | Self::Internal { at, .. } => *at,
            Self::OutputTooLarge { .. } => None,
        }
    }

    /// Safe to surface to end users: names, limits, and kind only, never a
    /// fragment of the offending literal or an internal node dump.
    pub fn public_message(&self) -> String {
        match self {
            Self::ParseRejected { .. } => "the expression is not well-formed".to_string(),
            Self::UnsupportedFeature { feature, .. } => {
                format!("unsupported expression feature: {feature}")
            }
            Self::UnresolvedIdentifier { .. } => "unresolved identifier".to_string(),
            Self::TypeMismatch { operator, .. } => {
                format!("type mismatch for operator '{operator}'")
            }
            Self::AmbiguousSize { .. } => "size() could not be resolved for this receiver".to_string(),
            Self::NonJSONPath { .. } => "field access is not valid on a non-JSON field".to_string(),
            Self::RegexUnsupported { .. } => "pattern is not supported by this dialect".to_string(),
            Self::InvalidIdentifier { .. } => "invalid identifier".to_string(),
            Self::DepthExceeded { limit, .. } => format!("expression exceeds maximum depth of {limit}"),
            Self::OutputTooLarge { limit } => format!("output exceeds maximum length of {limit} bytes"),
            Self::ComprehensionTooDeep { limit, .. } => {
                format!("comprehension nesting exceeds maximum of {limit}")
            }
            Self::PatternTooLong { limit, .. } => format!("pattern exceeds maximum length of {limit}"),
            Self::BytesTooLarge { limit, .. } => format!("bytes literal exceeds maximum length of {limit}"),
            Self::Internal { .. } => "internal translation error".to_string(),
        }
    }

    /// Adds span and, where available, the offending node's identifying data.
    /// Never surfaced to end users directly.
    pub fn diagnostic_message(&self) -> String {
        let span = self
            .span()
            .map(|s| format!(" at {}..{}", s.start, s.end))
            .unwrap_or_default();
        match self {
            Self::ParseRejected { reason, .. } => format!("parse rejected: {reason}{span}"),
            Self::UnsupportedFeature { feature, .. } => {
                format!("unsupported feature '{feature}'{span}")
            }
            Self::UnresolvedIdentifier { name, .. } => {
                format!("identifier '{name}' not found in registry and no dialect fallback applies{span}")
            }
            Self::TypeMismatch {
                operator,
                expected,
                found,
                ..
            } => format!(
                "operator '{operator}' expected {expected}, found {found}{span}"
            ),
            Self::AmbiguousSize { .. } => format!("size() receiver type unresolvable{span}"),
            Self::NonJSONPath { field, .. } => {
                format!("field '{field}' continues a path past a non-JSON field{span}")
            }
            Self::RegexUnsupported { pattern_kind, .. } => {
                format!("dialect cannot express regex construct '{pattern_kind}'{span}")
            }
            Self::InvalidIdentifier { name, .. } => format!("identifier '{name}' is invalid{span}"),
            Self::DepthExceeded { limit, .. } => format!("depth exceeded limit {limit}{span}"),
            Self::OutputTooLarge { limit } => format!("output exceeded limit {limit} bytes"),
            Self::ComprehensionTooDeep { limit, .. } => {
                format!("comprehension nesting exceeded limit {limit}{span}")
            }
            Self::PatternTooLong { limit, .. } => format!("pattern exceeded limit {limit} chars{span}"),
            Self::BytesTooLarge { limit, .. } => format!("bytes literal exceeded limit {limit} bytes{span}"),
            Self::Internal { detail, .. } => format!("internal error: {detail}{span}"),
        }
    }
}

/// Public-facing error. `Display` renders only the public message; callers
/// needing the diagnostic call [`TranslateError::diagnostic_message`] explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateError {
    pub kind: TranslateErrorKind,
}

impl TranslateError {
    pub fn new(kind: TranslateErrorKind) -> Self {
        Self { kind }
    }

    pub fn diagnostic_message(&self) -> String {
        self.kind.diagnostic_message()
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.public_message())
    }
}

impl std::error::Error for TranslateError {}

impl From<TranslateErrorKind> for TranslateError {
    fn from(kind: TranslateErrorKind) -> Self {
        Self::new(kind)
    }
}
