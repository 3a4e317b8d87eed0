//! Translator (C6): the context-sensitive recursive-descent walker. This is
//! the core of the kernel — §4.6 in full.
//!
//! The output buffer is threaded through every method as an explicit
//! parameter rather than held as a `Translator` field. Dialect capabilities
//! that wrap a sub-expression need an emit-thunk that recursively calls back
//! into `Translator::translate_expr`, which itself needs `&mut self`; keeping
//! the buffer external avoids a self-referential double-borrow between "the
//! buffer passed to the dialect call" and "the buffer the recursive thunk
//! would reach through `&mut self`".

pub mod context;

use crate::ast::{BinaryOperator, Callee, Comprehension, ComprehensionKind, Entry, Expr, Literal, Span, UnaryOperator};
use crate::binder::{BoundValue, ParameterBinder};
use crate::buffer::{LimitGuard, OutputBuffer};
use crate::config::TranslateConfig;
use crate::dialect::{CastType, CelDialect, Dialect, JsonExtractMode, TemporalComponent, Thunk};
use crate::error::{TranslateError, TranslateErrorKind, TranslateResult};
use crate::schema::{FieldKind, ScalarType};

pub use context::Context;

/// The translation artifact (§3.3 / §6.3).
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutput {
    pub sql: String,
    pub parameters: Vec<BoundValue>,
    pub recommendations: Option<Vec<crate::advisor::IndexRecommendation>>,
}

/// Public entry point. A pure function of `(ast, schemas, config)` (§5, §9).
pub fn translate(
    ast: &Expr,
    registry: &crate::schema::SchemaRegistry,
    config: &TranslateConfig,
) -> TranslateResult<TranslationOutput> {
    let dialect = config.dialect.0;
    let mut translator = Translator {
        registry,
        dialect,
        config,
        limits: LimitGuard::new(config.max_depth, config.max_comprehension_nesting),
        binder: ParameterBinder::new(config.mode, dialect, config.max_bytes_literal),
        scope: Vec::new(),
        gensym: 0,
    };
    let mut buf = OutputBuffer::new(config.max_output_length);
    translator.translate_expr(&mut buf, ast, Context::Boolean)?;

    let recommendations = if config.recommend_indexes {
        Some(crate::advisor::recommend_indexes(ast, registry))
    } else {
        None
    };

    Ok(TranslationOutput {
        sql: buf.into_string(),
        parameters: translator.binder.into_values(),
        recommendations,
    })
}

/// Shallow classification of what a sub-expression resolves to, used to pick
/// operator overloads and `size()`'s dispatch without a full type-check pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReceiverKind {
    Scalar(ScalarType),
    Json,
    Array(ScalarType),
    Unknown,
}

struct Translator<'a> {
    registry: &'a crate::schema::SchemaRegistry,
    dialect: Dialect,
    config: &'a TranslateConfig,
    limits: LimitGuard,
    binder: ParameterBinder,
    /// Bound comprehension iteration variables, innermost last: (original CEL
    /// name, possibly-renamed SQL alias). Renaming only diverges from the
    /// original name when a nested macro shadows an outer iteration variable.
    scope: Vec<(String, String)>,
    /// Counter for synthesizing unique names when nested macros shadow a variable.
    gensym: u32,
}

impl<'a> Translator<'a> {
    /// Checks and bumps the AST depth counter, dispatches to the node's
    /// translation, then restores the counter — the check-increment-recurse-
    /// decrement never holds a borrow of `self.limits` across the recursive
    /// call, since every step here is its own statement.
    fn translate_expr(&mut self, buf: &mut OutputBuffer, expr: &Expr, ctx: Context) -> TranslateResult<()> {
        self.limits.enter_depth().map_err(|e| self.with_span(e, expr.span()))?;
        let result = self.translate_expr_kind(buf, expr, ctx);
        self.limits.leave_depth();
        result
    }

    fn translate_expr_kind(&mut self, buf: &mut OutputBuffer, expr: &Expr, ctx: Context) -> TranslateResult<()> {
        match expr {
            Expr::Literal { value, .. } => self.binder.write_literal(buf, value),
            Expr::Identifier { name, span } => self.translate_identifier(buf, name, *span),
            Expr::FieldSelect { .. } => self.translate_field_chain(buf, expr, false),
            Expr::Index { receiver, index, span } => self.translate_index(buf, receiver, index, *span),
            Expr::Call { callee, args, span } => self.translate_call(buf, callee, args, *span, ctx),
            Expr::Unary { op, operand, span } => self.translate_unary(buf, *op, operand, ctx, *span),
            Expr::Binary { op, lhs, rhs, span } => self.translate_binary(buf, *op, lhs, rhs, ctx, *span),
            Expr::Conditional { cond, then_branch, else_branch, .. } => {
                self.translate_conditional(buf, cond, then_branch, else_branch, ctx)
            }
            Expr::ListLiteral { elements, .. } => self.translate_list_literal(buf, elements),
            Expr::MapLiteral { span, .. } => Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                feature: "map literal".to_string(),
                at: *span,
            })),
            Expr::StructLiteral { span, .. } => Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                feature: "struct literal".to_string(),
                at: *span,
            })),
            Expr::Comprehension(comp) => self.translate_comprehension(buf, comp),
        }
    }

    fn with_span(&self, err: TranslateError, span: Option<Span>) -> TranslateError {
        match &err.kind {
            TranslateErrorKind::DepthExceeded { limit, at: None } => TranslateError::new(TranslateErrorKind::DepthExceeded {
                limit: *limit,
                at: span,
            }),
            _ => err,
        }
    }

    fn render_to_string(&mut self, expr: &Expr, ctx: Context) -> TranslateResult<String> {
        let mut tmp = OutputBuffer::new(self.config.max_output_length);
        self.translate_expr(&mut tmp, expr, ctx)?;
        Ok(tmp.into_string())
    }

    // ---- identifiers & field chains --------------------------------------

    fn write_identifier(&self, buf: &mut OutputBuffer, name: &str) -> TranslateResult<()> {
        if name.len() > self.config.max_identifier_length {
            return Err(TranslateError::new(TranslateErrorKind::InvalidIdentifier {
                name: name.to_string(),
                at: None,
            }));
        }
        buf.push_str(&self.dialect.quote_identifier(name))
    }

    fn write_qualified(&self, buf: &mut OutputBuffer, table: &str, field: &str) -> TranslateResult<()> {
        self.write_identifier(buf, table)?;
        buf.push_char('.')?;
        self.write_identifier(buf, field)
    }

    fn translate_identifier(&mut self, buf: &mut OutputBuffer, name: &str, span: Option<Span>) -> TranslateResult<()> {
        if let Some(alias) = self.scope_alias(name) {
            return buf.push_str(&self.dialect.iter_var_ref(&alias));
        }
        if self.registry.table(name).is_some() {
            return Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                feature: "bare table reference".to_string(),
                at: span,
            }));
        }
        self.write_identifier(buf, name)
    }

    /// Innermost-first lookup of a CEL identifier against the bound
    /// comprehension scope, returning the (possibly renamed) SQL alias it
    /// should resolve to.
    fn scope_alias(&self, name: &str) -> Option<String> {
        self.scope.iter().rev().find(|(orig, _)| orig == name).map(|(_, alias)| alias.clone())
    }

    fn flatten_field_chain<'e>(expr: &'e Expr) -> (&'e Expr, Vec<(&'e str, Option<Span>)>) {
        let mut segments = Vec::new();
        let mut cur = expr;
        while let Expr::FieldSelect { receiver, field, span } = cur {
            segments.push((field.as_str(), *span));
            cur = receiver;
        }
        segments.reverse();
        (cur, segments)
    }

    /// `as_receiver` is true when the whole chain is itself going to be
    /// indexed or key-tested further by the caller (reserved for future
    /// callers; current call sites all consume the chain as a value).
    fn translate_field_chain(&mut self, buf: &mut OutputBuffer, expr: &Expr, as_receiver: bool) -> TranslateResult<()> {
        let _ = as_receiver;
        let (root, segments) = Self::flatten_field_chain(expr);
        if segments.is_empty() {
            return self.translate_expr(buf, root, Context::Any);
        }

        match root {
            Expr::Identifier { name, span } if self.scope_alias(name).is_some() => {
                Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                    feature: "field access on a comprehension variable".to_string(),
                    at: *span,
                }))
            }
            Expr::Identifier { name, .. } if self.registry.table(name).is_some() => {
                self.translate_table_field_chain(buf, name, &segments)
            }
            Expr::Identifier { name, .. } => {
                // Unregistered root: degrade to a plain dotted reference (P7).
                self.write_identifier(buf, name)?;
                for (seg, _) in &segments {
                    buf.push_char('.')?;
                    self.write_identifier(buf, seg)?;
                }
                Ok(())
            }
            _ => {
                // Non-identifier root: no schema to consult. Translate the
                // root, then walk remaining segments as a best-effort JSON path.
                let dialect = self.dialect;
                let root_rendered = self.render_to_string(root, Context::Any)?;
                let names: Vec<&str> = segments.iter().map(|(s, _)| *s).collect();
                emit_json_path_rendered(dialect, buf, &root_rendered, &names, true)
            }
        }
    }

    fn translate_table_field_chain(&mut self, buf: &mut OutputBuffer, table: &str, segments: &[(&str, Option<Span>)]) -> TranslateResult<()> {
        let schema = self.registry.table(table).expect("checked by caller");
        let (first, first_span) = segments[0];
        let rest = &segments[1..];
        match schema.field(first) {
            None => {
                self.write_qualified(buf, table, first)?;
                if let Some((seg, span)) = rest.first() {
                    return Err(TranslateError::new(TranslateErrorKind::NonJSONPath {
                        field: seg.to_string(),
                        at: *span,
                    }));
                }
                Ok(())
            }
            Some(f) => match f.kind {
                FieldKind::Scalar(_) => {
                    self.write_qualified(buf, table, first)?;
                    if let Some((seg, span)) = rest.first() {
                        return Err(TranslateError::new(TranslateErrorKind::NonJSONPath {
                            field: seg.to_string(),
                            at: *span,
                        }));
                    }
                    Ok(())
                }
                FieldKind::Array { .. } => {
                    self.write_qualified(buf, table, first)?;
                    if let Some((seg, span)) = rest.first() {
                        return Err(TranslateError::new(TranslateErrorKind::NonJSONPath {
                            field: seg.to_string(),
                            at: *span,
                        }));
                    }
                    Ok(())
                }
                FieldKind::Json { .. } => {
                    if rest.is_empty() {
                        return self.write_qualified(buf, table, first);
                    }
                    let dialect = self.dialect;
                    let names: Vec<&str> = rest.iter().map(|(s, _)| *s).collect();
                    emit_json_path(dialect, buf, table, first, &names, true)
                }
            },
        }
        .map_err(|e| if matches!(e.kind, TranslateErrorKind::NonJSONPath { .. }) { e } else { self.with_span(e, first_span) })
    }

    // ---- index ------------------------------------------------------------

    fn translate_index(&mut self, buf: &mut OutputBuffer, receiver: &Expr, index: &Expr, span: Option<Span>) -> TranslateResult<()> {
        let idx = match index {
            Expr::Literal { value: Literal::Int(i), .. } => *i,
            Expr::Literal { value: Literal::UInt(u), .. } => *u as i64,
            _ => {
                return Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                    feature: "non-literal index".to_string(),
                    at: span,
                }))
            }
        };
        let kind = self.infer_receiver_kind(receiver);
        let dialect = self.dialect;
        match kind {
            ReceiverKind::Json => {
                let (root, segments) = Self::flatten_field_chain(receiver);
                if let Expr::Identifier { name, .. } = root {
                    if self.registry.table(name).is_some() {
                        let table = name.clone();
                        let idx_str = idx.to_string();
                        let mut owned: Vec<&str> = segments.iter().map(|(s, _)| *s).collect();
                        owned.push(&idx_str);
                        return emit_json_path(dialect, buf, &table, owned[0], &owned[1..], true);
                    }
                }
                Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                    feature: "index on unresolvable JSON receiver".to_string(),
                    at: span,
                }))
            }
            ReceiverKind::Array(_) => {
                let receiver_rendered = self.render_to_string(receiver, Context::Any)?;
                buf.push_str(&receiver_rendered)?;
                buf.push_char('[')?;
                match dialect {
                    Dialect::BigQuery => {
                        buf.push_str("OFFSET(")?;
                        buf.push_str(&idx.to_string())?;
                        buf.push_char(')')?;
                    }
                    _ => {
                        buf.push_str(&(idx + 1).to_string())?;
                    }
                }
                buf.push_char(']')
            }
            _ => Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                feature: "index on a non-array, non-JSON receiver".to_string(),
                at: span,
            })),
        }
    }

    fn infer_receiver_kind(&self, expr: &Expr) -> ReceiverKind {
        let (root, segments) = Self::flatten_field_chain(expr);
        match root {
            Expr::Identifier { name, .. } => {
                if self.scope_alias(name).is_some() {
                    return ReceiverKind::Unknown;
                }
                let Some(schema) = self.registry.table(name) else {
                    return ReceiverKind::Unknown;
                };
                if segments.is_empty() {
                    return ReceiverKind::Unknown;
                }
                let (first, _) = segments[0];
                match schema.field(first).map(|f| f.kind) {
                    Some(FieldKind::Scalar(t)) if segments.len() == 1 => ReceiverKind::Scalar(t),
                    Some(FieldKind::Array { element }) if segments.len() == 1 => ReceiverKind::Array(element),
                    Some(FieldKind::Json { .. }) => ReceiverKind::Json,
                    _ => ReceiverKind::Unknown,
                }
            }
            Expr::ListLiteral { .. } => ReceiverKind::Array(ScalarType::String),
            _ => ReceiverKind::Unknown,
        }
    }

    // ---- has() --------------------------------------------------------

    fn translate_has(&mut self, buf: &mut OutputBuffer, arg: &Expr, span: Option<Span>) -> TranslateResult<()> {
        let Expr::FieldSelect { .. } = arg else {
            return Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                feature: "has() requires a field-select argument".to_string(),
                at: span,
            }));
        };
        let (root, segments) = Self::flatten_field_chain(arg);
        let Expr::Identifier { name, .. } = root else {
            return Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                feature: "has() on a non-identifier root".to_string(),
                at: span,
            }));
        };
        let Some(schema) = self.registry.table(name) else {
            self.write_identifier(buf, name)?;
            for (seg, _) in &segments {
                buf.push_char('.')?;
                self.write_identifier(buf, seg)?;
            }
            return buf.push_str(" IS NOT NULL");
        };
        if segments.is_empty() {
            return Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                feature: "has() on a bare table reference".to_string(),
                at: span,
            }));
        }
        let (first, _) = segments[0];
        let rest = &segments[1..];
        match schema.field(first).map(|f| f.kind) {
            Some(FieldKind::Json { binary }) if !rest.is_empty() => {
                let dialect = self.dialect;
                let names: Vec<&str> = rest.iter().map(|(s, _)| *s).collect();
                emit_json_key_exists(dialect, buf, name, first, &names, binary)
            }
            _ => {
                self.write_qualified(buf, name, first)?;
                if let Some((seg, s)) = rest.first() {
                    return Err(TranslateError::new(TranslateErrorKind::NonJSONPath {
                        field: seg.to_string(),
                        at: *s,
                    }));
                }
                buf.push_str(" IS NOT NULL")
            }
        }
    }

    // ---- calls --------------------------------------------------------

    fn translate_call(&mut self, buf: &mut OutputBuffer, callee: &Callee, args: &[Expr], span: Option<Span>, ctx: Context) -> TranslateResult<()> {
        match callee {
            Callee::Function(name) => match name.as_str() {
                "has" => {
                    if args.len() != 1 {
                        return Err(TranslateError::new(TranslateErrorKind::ParseRejected {
                            reason: "has() takes exactly one argument".to_string(),
                            at: span,
                        }));
                    }
                    self.translate_has(buf, &args[0], span)
                }
                "matches" => self.translate_matches(buf, args, span),
                "int" | "uint" | "double" | "string" | "bool" | "bytes" | "timestamp" | "duration" => {
                    self.translate_cast(buf, name, args, span)
                }
                _ => Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                    feature: name.clone(),
                    at: span,
                })),
            },
            Callee::Method { receiver, name } => match name.as_str() {
                "contains" => self.translate_dual_string_call(buf, receiver, &args[0], ctx, |d, b, s, n| d.write_contains(b, s, n)),
                "startsWith" => self.translate_dual_string_call(buf, receiver, &args[0], ctx, |d, b, s, n| d.write_starts_with(b, s, n)),
                "endsWith" => self.translate_dual_string_call(buf, receiver, &args[0], ctx, |d, b, s, n| d.write_ends_with(b, s, n)),
                "split" => self.translate_dual_string_call(buf, receiver, &args[0], ctx, |d, b, s, n| d.write_split(b, s, n)),
                "join" => self.translate_dual_string_call(buf, receiver, &args[0], ctx, |d, b, s, n| d.write_join(b, s, n)),
                "size" => self.translate_size(buf, receiver, span),
                "getFullYear" => self.translate_temporal_component(buf, receiver, TemporalComponent::FullYear),
                "getMonth" => self.translate_temporal_component(buf, receiver, TemporalComponent::Month),
                "getDayOfMonth" => self.translate_temporal_component(buf, receiver, TemporalComponent::DayOfMonth),
                "getHours" => self.translate_temporal_component(buf, receiver, TemporalComponent::Hours),
                "getMinutes" => self.translate_temporal_component(buf, receiver, TemporalComponent::Minutes),
                "getSeconds" => self.translate_temporal_component(buf, receiver, TemporalComponent::Seconds),
                _ => Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                    feature: name.clone(),
                    at: span,
                })),
            },
        }
    }

    fn translate_dual_string_call(
        &mut self,
        buf: &mut OutputBuffer,
        subject: &Expr,
        other: &Expr,
        ctx: Context,
        f: impl FnOnce(Dialect, &mut OutputBuffer, &mut Thunk, &mut Thunk) -> TranslateResult<()>,
    ) -> TranslateResult<()> {
        let subject_rendered = self.render_to_string(subject, Context::String)?;
        let dialect = self.dialect;
        let mut subject_thunk = move |b: &mut OutputBuffer| b.push_str(&subject_rendered);
        let mut other_thunk = |b: &mut OutputBuffer| self.translate_expr(b, other, ctx);
        f(dialect, buf, &mut subject_thunk, &mut other_thunk)
    }

    fn translate_size(&mut self, buf: &mut OutputBuffer, receiver: &Expr, span: Option<Span>) -> TranslateResult<()> {
        let kind = self.infer_receiver_kind(receiver);
        let dialect = self.dialect;
        match kind {
            ReceiverKind::Scalar(ScalarType::String) => {
                let mut thunk = |b: &mut OutputBuffer| self.translate_expr(b, receiver, Context::String);
                dialect.write_string_length(buf, &mut thunk)
            }
            ReceiverKind::Array(_) => {
                let mut thunk = |b: &mut OutputBuffer| self.translate_expr(b, receiver, Context::Any);
                dialect.write_array_length(buf, &mut thunk)
            }
            ReceiverKind::Json => {
                // JSON array length: reuse array-length primitive over the
                // subtree-extracted value.
                let mut thunk = |b: &mut OutputBuffer| self.translate_expr(b, receiver, Context::Any);
                dialect.write_array_length(buf, &mut thunk)
            }
            ReceiverKind::Scalar(_) | ReceiverKind::Unknown => match context::infer_type(receiver) {
                context::InferredType::String => {
                    let mut thunk = |b: &mut OutputBuffer| self.translate_expr(b, receiver, Context::String);
                    dialect.write_string_length(buf, &mut thunk)
                }
                context::InferredType::Array => {
                    let mut thunk = |b: &mut OutputBuffer| self.translate_expr(b, receiver, Context::Any);
                    dialect.write_array_length(buf, &mut thunk)
                }
                _ => Err(TranslateError::new(TranslateErrorKind::AmbiguousSize { at: span })),
            },
        }
    }

    fn translate_matches(&mut self, buf: &mut OutputBuffer, args: &[Expr], span: Option<Span>) -> TranslateResult<()> {
        if args.len() != 2 {
            return Err(TranslateError::new(TranslateErrorKind::ParseRejected {
                reason: "matches() takes exactly two arguments".to_string(),
                at: span,
            }));
        }
        let pattern = match &args[1] {
            Expr::Literal { value: Literal::String(s), .. } => s.clone(),
            _ => {
                return Err(TranslateError::new(TranslateErrorKind::TypeMismatch {
                    operator: "matches".to_string(),
                    expected: "string literal".to_string(),
                    found: "non-literal expression".to_string(),
                    at: args[1].span(),
                }))
            }
        };
        if pattern.len() > self.config.max_pattern_length {
            return Err(TranslateError::new(TranslateErrorKind::PatternTooLong {
                limit: self.config.max_pattern_length,
                at: args[1].span(),
            }));
        }
        if !self.dialect.supports_native_regex() {
            validate_regex_subset(&pattern).map_err(|reason| {
                TranslateError::new(TranslateErrorKind::RegexUnsupported {
                    pattern_kind: reason,
                    at: args[1].span(),
                })
            })?;
        }
        let dialect = self.dialect;
        let mut subject_thunk = |b: &mut OutputBuffer| self.translate_expr(b, &args[0], Context::String);
        dialect.write_matches(buf, &mut subject_thunk, &pattern, false)
    }

    fn translate_cast(&mut self, buf: &mut OutputBuffer, name: &str, args: &[Expr], span: Option<Span>) -> TranslateResult<()> {
        if args.len() != 1 {
            return Err(TranslateError::new(TranslateErrorKind::ParseRejected {
                reason: format!("{name}() takes exactly one argument"),
                at: span,
            }));
        }
        let target = match name {
            "int" => CastType::Int,
            "uint" => CastType::UInt,
            "double" => CastType::Double,
            "string" => CastType::String,
            "bool" => CastType::Bool,
            "bytes" => CastType::Bytes,
            "timestamp" => CastType::Timestamp,
            "duration" => CastType::Duration,
            _ => unreachable!("dispatched only for cast names"),
        };
        let ctx = match target {
            CastType::String => Context::String,
            CastType::Int | CastType::UInt | CastType::Double => Context::Numeric,
            _ => Context::Any,
        };
        let dialect = self.dialect;
        let mut thunk = |b: &mut OutputBuffer| self.translate_expr(b, &args[0], ctx);
        dialect.write_cast(buf, &mut thunk, target)
    }

    fn translate_temporal_component(&mut self, buf: &mut OutputBuffer, receiver: &Expr, component: TemporalComponent) -> TranslateResult<()> {
        let dialect = self.dialect;
        let mut thunk = |b: &mut OutputBuffer| self.translate_expr(b, receiver, Context::Any);
        dialect.write_temporal_component(buf, &mut thunk, component)
    }

    // ---- unary / binary -------------------------------------------------

    fn translate_unary(&mut self, buf: &mut OutputBuffer, op: UnaryOperator, operand: &Expr, ctx: Context, _span: Option<Span>) -> TranslateResult<()> {
        match op {
            UnaryOperator::Not => {
                buf.push_str("NOT (")?;
                self.translate_expr(buf, operand, Context::Boolean)?;
                buf.push_char(')')
            }
            UnaryOperator::Neg => {
                buf.push_str("-(")?;
                self.translate_expr(buf, operand, ctx)?;
                buf.push_char(')')
            }
        }
    }

    fn translate_binary(&mut self, buf: &mut OutputBuffer, op: BinaryOperator, lhs: &Expr, rhs: &Expr, ctx: Context, span: Option<Span>) -> TranslateResult<()> {
        match op {
            BinaryOperator::And => self.translate_logical(buf, " AND ", lhs, rhs),
            BinaryOperator::Or => self.translate_logical(buf, " OR ", lhs, rhs),
            BinaryOperator::In => self.translate_in(buf, lhs, rhs, span),
            BinaryOperator::Add => self.translate_overloaded_add(buf, lhs, rhs),
            BinaryOperator::Sub => self.translate_overloaded_sub(buf, lhs, rhs),
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Rem => {
                self.translate_arithmetic(buf, op, lhs, rhs)
            }
            BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Lt
            | BinaryOperator::Le
            | BinaryOperator::Gt
            | BinaryOperator::Ge => self.translate_comparison(buf, op, lhs, rhs, ctx),
        }
    }

    fn translate_logical(&mut self, buf: &mut OutputBuffer, joiner: &str, lhs: &Expr, rhs: &Expr) -> TranslateResult<()> {
        buf.push_char('(')?;
        self.translate_expr(buf, lhs, Context::Boolean)?;
        buf.push_str(joiner)?;
        self.translate_expr(buf, rhs, Context::Boolean)?;
        buf.push_char(')')
    }

    fn translate_arithmetic(&mut self, buf: &mut OutputBuffer, op: BinaryOperator, lhs: &Expr, rhs: &Expr) -> TranslateResult<()> {
        let symbol = match op {
            BinaryOperator::Mul => " * ",
            BinaryOperator::Div => " / ",
            BinaryOperator::Rem => " % ",
            _ => unreachable!("dispatched only for Mul/Div/Rem"),
        };
        buf.push_char('(')?;
        self.translate_expr(buf, lhs, Context::Numeric)?;
        buf.push_str(symbol)?;
        self.translate_expr(buf, rhs, Context::Numeric)?;
        buf.push_char(')')
    }

    /// Operator-overload resolution for `+` (§4.6.2): temporal before
    /// string-concat before numeric, since `timestamp(...) + duration(...)`
    /// matches both the temporal and (superficially) non-numeric shape.
    fn translate_overloaded_add(&mut self, buf: &mut OutputBuffer, lhs: &Expr, rhs: &Expr) -> TranslateResult<()> {
        if context::is_temporal(lhs) || context::is_temporal(rhs) {
            return self.translate_dual_generic(buf, lhs, rhs, Context::Any, |d, b, l, r| d.write_temporal_add(b, l, r));
        }
        if context::is_string_like(lhs) || context::is_string_like(rhs) || self.resolves_string_field(lhs) || self.resolves_string_field(rhs) {
            return self.translate_dual_generic(buf, lhs, rhs, Context::String, |d, b, l, r| d.write_concat(b, l, r));
        }
        self.translate_arithmetic_add(buf, lhs, rhs)
    }

    fn translate_overloaded_sub(&mut self, buf: &mut OutputBuffer, lhs: &Expr, rhs: &Expr) -> TranslateResult<()> {
        if context::is_temporal(lhs) || context::is_temporal(rhs) {
            return self.translate_dual_generic(buf, lhs, rhs, Context::Any, |d, b, l, r| d.write_temporal_sub(b, l, r));
        }
        self.translate_arithmetic_add(buf, lhs, rhs)
    }

    fn translate_arithmetic_add(&mut self, buf: &mut OutputBuffer, lhs: &Expr, rhs: &Expr) -> TranslateResult<()> {
        buf.push_char('(')?;
        self.translate_expr(buf, lhs, Context::Numeric)?;
        buf.push_str(" + ")?;
        self.translate_expr(buf, rhs, Context::Numeric)?;
        buf.push_char(')')
    }

    fn resolves_string_field(&self, expr: &Expr) -> bool {
        matches!(self.infer_receiver_kind(expr), ReceiverKind::Scalar(ScalarType::String))
    }

    fn translate_dual_generic(
        &mut self,
        buf: &mut OutputBuffer,
        lhs: &Expr,
        rhs: &Expr,
        ctx: Context,
        f: impl FnOnce(Dialect, &mut OutputBuffer, &mut Thunk, &mut Thunk) -> TranslateResult<()>,
    ) -> TranslateResult<()> {
        let lhs_rendered = self.render_to_string(lhs, ctx)?;
        let dialect = self.dialect;
        let mut lhs_thunk = move |b: &mut OutputBuffer| b.push_str(&lhs_rendered);
        let mut rhs_thunk = |b: &mut OutputBuffer| self.translate_expr(b, rhs, ctx);
        f(dialect, buf, &mut lhs_thunk, &mut rhs_thunk)
    }

    fn translate_comparison(&mut self, buf: &mut OutputBuffer, op: BinaryOperator, lhs: &Expr, rhs: &Expr, _ctx: Context) -> TranslateResult<()> {
        let symbol = match op {
            BinaryOperator::Eq => " = ",
            BinaryOperator::Ne => " != ",
            BinaryOperator::Lt => " < ",
            BinaryOperator::Le => " <= ",
            BinaryOperator::Gt => " > ",
            BinaryOperator::Ge => " >= ",
            _ => unreachable!("dispatched only for comparison operators"),
        };

        // JSON-extracted operands coerce to numeric only when compared
        // directly against a numeric literal on the other side (§4.6.2).
        let other_is_numeric_literal = |e: &Expr| {
            matches!(e, Expr::Literal { value: Literal::Int(_) | Literal::UInt(_) | Literal::Double(_), .. })
        };
        let lhs_needs_cast = matches!(self.infer_receiver_kind(lhs), ReceiverKind::Json) && other_is_numeric_literal(rhs);
        let rhs_needs_cast = matches!(self.infer_receiver_kind(rhs), ReceiverKind::Json) && other_is_numeric_literal(lhs);

        // Comparisons bind tighter than AND/OR in every target dialect, so
        // unlike the logical and arithmetic wrappers, no parens are needed here.
        if lhs_needs_cast {
            let dialect = self.dialect;
            let mut thunk = |b: &mut OutputBuffer| self.translate_expr(b, lhs, Context::Any);
            dialect.write_json_numeric_cast(buf, &mut thunk)?;
        } else {
            self.translate_expr(buf, lhs, Context::Any)?;
        }
        buf.push_str(symbol)?;
        if rhs_needs_cast {
            let dialect = self.dialect;
            let mut thunk = |b: &mut OutputBuffer| self.translate_expr(b, rhs, Context::Any);
            dialect.write_json_numeric_cast(buf, &mut thunk)?;
        } else {
            self.translate_expr(buf, rhs, Context::Any)?;
        }
        Ok(())
    }

    fn translate_in(&mut self, buf: &mut OutputBuffer, lhs: &Expr, rhs: &Expr, span: Option<Span>) -> TranslateResult<()> {
        let rhs_kind = self.infer_receiver_kind(rhs);
        match (rhs, rhs_kind) {
            (Expr::ListLiteral { .. }, _) | (_, ReceiverKind::Array(_)) => {
                self.translate_dual_generic(buf, lhs, rhs, Context::Any, |d, b, n, a| d.write_in_array(b, n, a))
            }
            (_, ReceiverKind::Json) => Err(TranslateError::new(TranslateErrorKind::UnsupportedFeature {
                feature: "`in` against a JSON-typed array is under-specified".to_string(),
                at: span,
            })),
            _ => Err(TranslateError::new(TranslateErrorKind::TypeMismatch {
                operator: "in".to_string(),
                expected: "array".to_string(),
                found: "non-array operand".to_string(),
                at: span,
            })),
        }
    }

    // ---- conditional / collections --------------------------------------

    fn translate_conditional(&mut self, buf: &mut OutputBuffer, cond: &Expr, then_branch: &Expr, else_branch: &Expr, ctx: Context) -> TranslateResult<()> {
        buf.push_str("CASE WHEN ")?;
        self.translate_expr(buf, cond, Context::Boolean)?;
        buf.push_str(" THEN ")?;
        self.translate_expr(buf, then_branch, ctx)?;
        buf.push_str(" ELSE ")?;
        self.translate_expr(buf, else_branch, ctx)?;
        buf.push_str(" END")
    }

    fn translate_list_literal(&mut self, buf: &mut OutputBuffer, elements: &[Expr]) -> TranslateResult<()> {
        let dialect = self.dialect;
        buf.push_str(dialect.array_literal_open())?;
        for (i, el) in elements.iter().enumerate() {
            if i > 0 {
                buf.push_str(dialect.array_literal_separator())?;
            }
            self.translate_expr(buf, el, Context::Any)?;
        }
        buf.push_str(dialect.array_literal_close())
    }

    // ---- comprehensions (macro expansion, §4.6.5) ------------------------

    fn translate_comprehension(&mut self, buf: &mut OutputBuffer, comp: &Comprehension) -> TranslateResult<()> {
        self.limits.enter_comprehension().map_err(|e| self.with_span(e, comp.span))?;
        let result = self.translate_comprehension_body(buf, comp);
        self.limits.leave_comprehension();
        result
    }

    fn translate_comprehension_body(&mut self, buf: &mut OutputBuffer, comp: &Comprehension) -> TranslateResult<()> {
        let alias = if self.scope.iter().any(|(orig, _)| orig == &comp.iter_var) {
            self.gensym += 1;
            format!("{}_{}", comp.iter_var, self.gensym)
        } else {
            comp.iter_var.clone()
        };

        let range_rendered = self.render_to_string(&comp.iter_range, Context::Any)?;
        let dialect = self.dialect;

        self.scope.push((comp.iter_var.clone(), alias.clone()));
        let step_result = self.render_to_string(&comp.step, match comp.kind {
            ComprehensionKind::Map => Context::Any,
            _ => Context::Boolean,
        });
        self.scope.pop();
        let step_rendered = step_result?;

        match comp.kind {
            ComprehensionKind::Exists => {
                buf.push_str("EXISTS (SELECT 1 FROM ")?;
                emit_unnest(dialect, buf, &range_rendered, &alias)?;
                buf.push_str(" WHERE ")?;
                buf.push_str(&step_rendered)?;
                buf.push_char(')')
            }
            ComprehensionKind::All => {
                buf.push_str("NOT EXISTS (SELECT 1 FROM ")?;
                emit_unnest(dialect, buf, &range_rendered, &alias)?;
                buf.push_str(" WHERE NOT (")?;
                buf.push_str(&step_rendered)?;
                buf.push_str("))")
            }
            ComprehensionKind::ExistsOne => {
                buf.push_str("(SELECT COUNT(*) FROM ")?;
                emit_unnest(dialect, buf, &range_rendered, &alias)?;
                buf.push_str(" WHERE ")?;
                buf.push_str(&step_rendered)?;
                buf.push_str(") = 1")
            }
            ComprehensionKind::Filter => {
                buf.push_str("ARRAY(SELECT ")?;
                buf.push_str(&dialect.iter_var_ref(&alias))?;
                buf.push_str(" FROM ")?;
                emit_unnest(dialect, buf, &range_rendered, &alias)?;
                buf.push_str(" WHERE ")?;
                buf.push_str(&step_rendered)?;
                buf.push_char(')')
            }
            ComprehensionKind::Map => {
                buf.push_str("ARRAY(SELECT ")?;
                buf.push_str(&step_rendered)?;
                buf.push_str(" FROM ")?;
                emit_unnest(dialect, buf, &range_rendered, &alias)?;
                buf.push_char(')')
            }
        }
    }
}

fn emit_unnest(dialect: Dialect, buf: &mut OutputBuffer, range_rendered: &str, alias: &str) -> TranslateResult<()> {
    let mut thunk = move |b: &mut OutputBuffer| b.push_str(range_rendered);
    dialect.write_unnest(buf, &mut thunk, alias)
}

/// Receiver, up through `segments[..upto]` applied as subtree-extract steps,
/// rooted at `table.field`.
fn emit_receiver_upto(dialect: Dialect, buf: &mut OutputBuffer, table: &str, field: &str, segments: &[&str], upto: usize) -> TranslateResult<()> {
    if upto == 0 {
        buf.push_str(&dialect.quote_identifier(table))?;
        buf.push_char('.')?;
        return buf.push_str(&dialect.quote_identifier(field));
    }
    let mut inner = |b: &mut OutputBuffer| emit_receiver_upto(dialect, b, table, field, segments, upto - 1);
    dialect.write_json_path_step(buf, &mut inner, segments[upto - 1], JsonExtractMode::Subtree)
}

fn emit_json_path(dialect: Dialect, buf: &mut OutputBuffer, table: &str, field: &str, segments: &[&str], as_value: bool) -> TranslateResult<()> {
    let n = segments.len();
    if n == 0 {
        return emit_receiver_upto(dialect, buf, table, field, segments, 0);
    }
    let mut inner = |b: &mut OutputBuffer| emit_receiver_upto(dialect, b, table, field, segments, n - 1);
    let mode = if as_value { JsonExtractMode::Scalar } else { JsonExtractMode::Subtree };
    dialect.write_json_path_step(buf, &mut inner, segments[n - 1], mode)
}

fn emit_json_key_exists(dialect: Dialect, buf: &mut OutputBuffer, table: &str, field: &str, rest: &[&str], binary: bool) -> TranslateResult<()> {
    let n = rest.len();
    let mut inner = |b: &mut OutputBuffer| emit_receiver_upto(dialect, b, table, field, rest, n - 1);
    dialect.write_json_key_exists(buf, &mut inner, rest[n - 1], binary)
}

/// Same shape as [`emit_json_path`], but rooted at an already-rendered SQL
/// fragment rather than a schema-known `table.field` pair (used when a
/// `FieldSelect` chain's root isn't an identifier resolvable against the
/// registry).
fn emit_json_path_rendered(dialect: Dialect, buf: &mut OutputBuffer, root_rendered: &str, segments: &[&str], as_value: bool) -> TranslateResult<()> {
    fn receiver_upto(dialect: Dialect, buf: &mut OutputBuffer, root_rendered: &str, segments: &[&str], upto: usize) -> TranslateResult<()> {
        if upto == 0 {
            return buf.push_str(root_rendered);
        }
        let mut inner = |b: &mut OutputBuffer| receiver_upto(dialect, b, root_rendered, segments, upto - 1);
        dialect.write_json_path_step(buf, &mut inner, segments[upto - 1], JsonExtractMode::Subtree)
    }
    let n = segments.len();
    if n == 0 {
        return buf.push_str(root_rendered);
    }
    let mut inner = |b: &mut OutputBuffer| receiver_upto(dialect, b, root_rendered, segments, n - 1);
    let mode = if as_value { JsonExtractMode::Scalar } else { JsonExtractMode::Subtree };
    dialect.write_json_path_step(buf, &mut inner, segments[n - 1], mode)
}

/// Best-effort validation that a pattern avoids RE2 constructs this kernel
/// won't attempt to translate for non-native-regex dialects: backreferences,
/// lookaround, and possessive/atomic quantifiers. Not exhaustive (§9 open
/// question c) — unrecognized risky constructs are rejected rather than guessed.
fn validate_regex_subset(pattern: &str) -> Result<(), String> {
    let bytes = pattern.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            let next = bytes[i + 1];
            if next.is_ascii_digit() {
                return Err("backreference".to_string());
            }
            i += 2;
            continue;
        }
        if bytes[i] == b'(' && i + 2 < bytes.len() && bytes[i + 1] == b'?' {
            match bytes[i + 2] {
                b'=' | b'!' => return Err("lookahead".to_string()),
                b'<' if i + 3 < bytes.len() && (bytes[i + 3] == b'=' || bytes[i + 3] == b'!') => {
                    return Err("lookbehind".to_string())
                }
                _ => {}
            }
        }
        i += 1;
    }
    Ok(())
}
