//! Index Advisor (C7). A second, independent walk over the same AST the
//! translator consumed, producing static index advice. Never touches the
//! Output Buffer, the dialect, or the database; it only reads the schema
//! registry to confirm a referenced field is a plain scalar column.
//!
//! Heuristic, not a cost model: every comparison or range predicate whose
//! column side resolves against the registry contributes a single-column
//! recommendation, and predicates conjoined by `&&` against the same table
//! additionally contribute one composite recommendation, equality columns
//! ordered before range columns (a composite index serves a range scan best
//! when its equality columns lead).

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ast::{BinaryOperator, Callee, Expr};
use crate::schema::{FieldKind, SchemaRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndexPriority {
    Equality,
    Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecommendation {
    pub table: String,
    pub columns: Vec<String>,
    pub operator: BinaryOperator,
    pub priority: IndexPriority,
}

#[derive(Debug, Clone)]
struct Predicate {
    table: String,
    column: String,
    op: BinaryOperator,
}

/// Entry point. Returns recommendations in a deterministic order (P1):
/// tables sorted by name, single-column recommendations before the
/// composite for that table.
pub fn recommend_indexes(ast: &Expr, registry: &SchemaRegistry) -> Vec<IndexRecommendation> {
    let mut recs = Vec::new();
    walk_conjunction(ast, registry, &mut Vec::new(), &mut recs);
    recs
}

fn is_indexable(op: BinaryOperator) -> bool {
    matches!(
        op,
        BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Lt
            | BinaryOperator::Le
            | BinaryOperator::Gt
            | BinaryOperator::Ge
            | BinaryOperator::In
    )
}

fn is_equality(op: BinaryOperator) -> bool {
    matches!(op, BinaryOperator::Eq | BinaryOperator::In)
}

/// Flattens a run of `&&`-joined predicates into one group so composite
/// recommendations can span all of them, then recurses into every other
/// child as an independent group (an `||` branch or a nested scope doesn't
/// co-occur with its siblings, so it never contributes to their composite).
fn walk_conjunction(expr: &Expr, registry: &SchemaRegistry, group: &mut Vec<Predicate>, recs: &mut Vec<IndexRecommendation>) {
    match expr {
        Expr::Binary { op: BinaryOperator::And, lhs, rhs, .. } => {
            walk_conjunction(lhs, registry, group, recs);
            walk_conjunction(rhs, registry, group, recs);
        }
        Expr::Binary { op, lhs, rhs, .. } if is_indexable(*op) => {
            match predicate_from(registry, *op, lhs, rhs) {
                Some(p) => group.push(p),
                None => {
                    walk_standalone(lhs, registry, recs);
                    walk_standalone(rhs, registry, recs);
                }
            }
        }
        other => walk_children(other, registry, recs),
    }
}

/// Starts a fresh predicate group for `expr`, finalizes it, then returns.
fn walk_standalone(expr: &Expr, registry: &SchemaRegistry, recs: &mut Vec<IndexRecommendation>) {
    let mut group = Vec::new();
    walk_conjunction(expr, registry, &mut group, recs);
    finalize_group(group, recs);
}

fn walk_children(expr: &Expr, registry: &SchemaRegistry, recs: &mut Vec<IndexRecommendation>) {
    match expr {
        Expr::Binary { lhs, rhs, .. } => {
            walk_standalone(lhs, registry, recs);
            walk_standalone(rhs, registry, recs);
        }
        Expr::Unary { operand, .. } => walk_standalone(operand, registry, recs),
        Expr::Conditional { cond, then_branch, else_branch, .. } => {
            walk_standalone(cond, registry, recs);
            walk_standalone(then_branch, registry, recs);
            walk_standalone(else_branch, registry, recs);
        }
        Expr::Call { callee, args, .. } => {
            if let Callee::Method { receiver, .. } = callee {
                walk_standalone(receiver, registry, recs);
            }
            for arg in args {
                walk_standalone(arg, registry, recs);
            }
        }
        Expr::Comprehension(c) => {
            walk_standalone(&c.iter_range, registry, recs);
            walk_standalone(&c.step, registry, recs);
        }
        Expr::ListLiteral { elements, .. } => {
            for e in elements {
                walk_standalone(e, registry, recs);
            }
        }
        Expr::MapLiteral { entries, .. } | Expr::StructLiteral { entries, .. } => {
            for entry in entries {
                walk_standalone(&entry.key, registry, recs);
                walk_standalone(&entry.value, registry, recs);
            }
        }
        Expr::FieldSelect { receiver, .. } => walk_standalone(receiver, registry, recs),
        Expr::Index { receiver, index, .. } => {
            walk_standalone(receiver, registry, recs);
            walk_standalone(index, registry, recs);
        }
        Expr::Literal { .. } | Expr::Identifier { .. } => {}
    }
}

/// A predicate is indexable when one side resolves to a scalar column
/// against the registry and the other side is a literal. JSON and array
/// fields need a functional or GIN index rather than a plain btree one, so
/// they're left to the operator rather than guessed at here.
fn predicate_from(registry: &SchemaRegistry, op: BinaryOperator, lhs: &Expr, rhs: &Expr) -> Option<Predicate> {
    if let Some((table, column)) = resolve_scalar_column(registry, lhs) {
        if matches!(rhs, Expr::Literal { .. }) {
            return Some(Predicate { table, column, op });
        }
    }
    if let Some((table, column)) = resolve_scalar_column(registry, rhs) {
        if matches!(lhs, Expr::Literal { .. }) {
            return Some(Predicate { table, column, op });
        }
    }
    None
}

fn resolve_scalar_column(registry: &SchemaRegistry, expr: &Expr) -> Option<(String, String)> {
    let Expr::FieldSelect { receiver, field, .. } = expr else {
        return None;
    };
    let Expr::Identifier { name: table, .. } = receiver.as_ref() else {
        return None;
    };
    let schema = registry.table(table)?;
    match schema.field(field)?.kind {
        FieldKind::Scalar(_) => Some((table.clone(), field.clone())),
        FieldKind::Json { .. } | FieldKind::Array { .. } => None,
    }
}

fn finalize_group(group: Vec<Predicate>, recs: &mut Vec<IndexRecommendation>) {
    let mut by_table: BTreeMap<String, Vec<Predicate>> = BTreeMap::new();
    for p in group {
        by_table.entry(p.table.clone()).or_default().push(p);
    }

    for (table, mut preds) in by_table {
        preds.sort_by_key(|p| if is_equality(p.op) { 0 } else { 1 });

        let mut seen = HashSet::new();
        let deduped: Vec<Predicate> = preds.into_iter().filter(|p| seen.insert(p.column.clone())).collect();

        for p in &deduped {
            recs.push(IndexRecommendation {
                table: table.clone(),
                columns: vec![p.column.clone()],
                operator: p.op,
                priority: if is_equality(p.op) { IndexPriority::Equality } else { IndexPriority::Range },
            });
        }

        if deduped.len() > 1 {
            let leading = &deduped[0];
            recs.push(IndexRecommendation {
                table,
                columns: deduped.iter().map(|p| p.column.clone()).collect(),
                operator: leading.op,
                priority: if is_equality(leading.op) { IndexPriority::Equality } else { IndexPriority::Range },
            });
        }
    }
}
