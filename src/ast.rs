//! Canonical CEL AST. Produced upstream by a pluggable parser; the kernel only
//! walks it. Macro constructs (`exists`, `all`, `exists_one`, `map`, `filter`)
//! arrive already lowered to [`Expr::Comprehension`].

use serde::{Deserialize, Serialize};

/// Source-position metadata, threaded through for diagnostics and
/// resource-limit error sites. Byte offsets into the original CEL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// A literal's kind and typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    /// ISO-8601 duration text, e.g. `"1h30m"`.
    Duration(String),
    /// RFC-3339 timestamp text.
    Timestamp(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    In,
}

/// A function/method callee: either a free function name, or a method with an
/// explicit receiver expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Callee {
    Function(String),
    Method {
        receiver: Box<Expr>,
        name: String,
    },
}

/// A map or struct entry: a key expression and a value expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub key: Expr,
    pub value: Expr,
}

/// The lowered form of a CEL macro (`exists`, `all`, `exists_one`, `map`,
/// `filter`). `kind` names which macro this comprehension realizes; the
/// remaining fields mirror CEL's canonical comprehension desugaring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comprehension {
    pub kind: ComprehensionKind,
    /// The expression being iterated (an array/list-typed expression).
    pub iter_range: Box<Expr>,
    /// The bound iteration variable name.
    pub iter_var: String,
    /// Loop predicate / transform body, referencing `iter_var`.
    pub step: Box<Expr>,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComprehensionKind {
    Exists,
    All,
    ExistsOne,
    Map,
    Filter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal {
        value: Literal,
        span: Option<Span>,
    },
    Identifier {
        name: String,
        span: Option<Span>,
    },
    FieldSelect {
        receiver: Box<Expr>,
        field: String,
        span: Option<Span>,
    },
    Index {
        receiver: Box<Expr>,
        index: Box<Expr>,
        span: Option<Span>,
    },
    Call {
        callee: Callee,
        args: Vec<Expr>,
        span: Option<Span>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
        span: Option<Span>,
    },
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Option<Span>,
    },
    Conditional {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        span: Option<Span>,
    },
    ListLiteral {
        elements: Vec<Expr>,
        span: Option<Span>,
    },
    MapLiteral {
        entries: Vec<Entry>,
        span: Option<Span>,
    },
    StructLiteral {
        type_name: String,
        entries: Vec<Entry>,
        span: Option<Span>,
    },
    Comprehension(Comprehension),
}

impl Expr {
    pub fn span(&self) -> Option<Span> {
        match self {
            Expr::Literal { span, .. }
            | Expr::Identifier { span, .. }
            | Expr::FieldSelect { span, .. }
            | Expr::Index { span, .. }
            | Expr::Call { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Conditional { span, .. }
            | Expr::ListLiteral { span, .. }
            | Expr::MapLiteral { span, .. }
            | Expr::StructLiteral { span, .. } => *span,
            Expr::Comprehension(c) => c.span,
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier {
            name: name.into(),
            span: None,
        }
    }

    pub fn field(receiver: Expr, field: impl Into<String>) -> Self {
        Expr::FieldSelect {
            receiver: Box::new(receiver),
            field: field.into(),
            span: None,
        }
    }

    pub fn lit(value: Literal) -> Self {
        Expr::Literal { value, span: None }
    }

    pub fn binary(op: BinaryOperator, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span: None,
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Callee::Function(name.into()),
            args,
            span: None,
        }
    }

    pub fn method(receiver: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Callee::Method {
                receiver: Box::new(receiver),
                name: name.into(),
            },
            args,
            span: None,
        }
    }
}
