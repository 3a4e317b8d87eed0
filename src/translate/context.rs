//! Context hints propagated down the tree during dispatch (§4.6.1). The
//! translator infers operand types locally rather than running a full
//! type-check pass; the hint records the *position* an expression is being
//! emitted in, which disambiguates overloaded operators and enables
//! JSON-to-numeric coercion.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Predicate position: the enclosing SQL expects a boolean.
    Boolean,
    /// Numeric position: enables JSON-extracted-value-to-number coercion.
    Numeric,
    /// String position.
    String,
    /// No positional expectation.
    Any,
}

/// Best-effort local type inference used to resolve CEL's overloaded
/// operators (§4.6.2). This is not a full type-check pass: it looks at the
/// immediate shape of an expression node, not its transitive semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferredType {
    Temporal,
    String,
    Numeric,
    Json,
    Array,
    Unknown,
}

use crate::ast::{Callee, Expr, Literal};

/// Infers a shallow type for operator-overload resolution. Only looks at the
/// node itself (and, for calls, the callee name) — exactly the "no full
/// type-check pass" compromise described in the design notes.
pub fn infer_type(expr: &Expr) -> InferredType {
    match expr {
        Expr::Literal { value, .. } => match value {
            Literal::Timestamp(_) | Literal::Duration(_) => InferredType::Temporal,
            Literal::String(_) => InferredType::String,
            Literal::Int(_) | Literal::UInt(_) | Literal::Double(_) => InferredType::Numeric,
            _ => InferredType::Unknown,
        },
        Expr::Call { callee: Callee::Function(name), .. } => match name.as_str() {
            "timestamp" | "duration" => InferredType::Temporal,
            "string" => InferredType::String,
            "int" | "uint" | "double" => InferredType::Numeric,
            _ => InferredType::Unknown,
        },
        Expr::ListLiteral { .. } => InferredType::Array,
        _ => InferredType::Unknown,
    }
}

pub fn is_temporal(expr: &Expr) -> bool {
    matches!(infer_type(expr), InferredType::Temporal)
}

pub fn is_string_like(expr: &Expr) -> bool {
    matches!(infer_type(expr), InferredType::String)
}
