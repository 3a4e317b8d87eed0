//! Parameter Binder (C4): writes literals either as escaped inline SQL
//! tokens, or as an ordinal placeholder plus an entry appended to the bound
//! values list. No de-duplication — each occurrence gets its own ordinal.

use serde::{Deserialize, Serialize};

use crate::ast::Literal;
use crate::config::OutputMode;
use crate::dialect::{CelDialect, Dialect};
use crate::buffer::OutputBuffer;
use crate::error::{TranslateError, TranslateErrorKind, TranslateResult};

/// A typed value bound into parameterized-mode output, in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoundValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Duration(String),
    Timestamp(String),
}

impl From<&Literal> for BoundValue {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Null => BoundValue::Null,
            Literal::Bool(b) => BoundValue::Bool(*b),
            Literal::Int(i) => BoundValue::Int(*i),
            Literal::UInt(u) => BoundValue::UInt(*u),
            Literal::Double(d) => BoundValue::Double(*d),
            Literal::String(s) => BoundValue::String(s.clone()),
            Literal::Bytes(b) => BoundValue::Bytes(b.clone()),
            Literal::Duration(d) => BoundValue::Duration(d.clone()),
            Literal::Timestamp(t) => BoundValue::Timestamp(t.clone()),
        }
    }
}

pub struct ParameterBinder {
    mode: OutputMode,
    dialect: Dialect,
    values: Vec<BoundValue>,
    max_bytes_literal: usize,
}

impl ParameterBinder {
    pub fn new(mode: OutputMode, dialect: Dialect, max_bytes_literal: usize) -> Self {
        Self {
            mode,
            dialect,
            values: Vec::new(),
            max_bytes_literal,
        }
    }

    /// Writes one literal per the active mode: escaped inline text, or a
    /// placeholder with the value appended to the bound list.
    pub fn write_literal(&mut self, buf: &mut OutputBuffer, lit: &Literal) -> TranslateResult<()> {
        if let Literal::Bytes(bytes) = lit {
            if bytes.len() > self.max_bytes_literal {
                return Err(TranslateError::new(TranslateErrorKind::BytesTooLarge {
                    limit: self.max_bytes_literal,
                    at: None,
                }));
            }
        }
        match self.mode {
            OutputMode::Inline => self.write_inline(buf, lit),
            OutputMode::Parameterized => {
                self.values.push(BoundValue::from(lit));
                let ordinal = self.values.len();
                self.dialect.write_placeholder(buf, ordinal)
            }
        }
    }

    fn write_inline(&self, buf: &mut OutputBuffer, lit: &Literal) -> TranslateResult<()> {
        match lit {
            Literal::Null => buf.push_str(&self.dialect.format_null()),
            Literal::Bool(b) => buf.push_str(&self.dialect.format_bool(*b)),
            Literal::Int(i) => buf.push_str(&i.to_string()),
            Literal::UInt(u) => buf.push_str(&u.to_string()),
            Literal::Double(d) => {
                let mut ryu_buf = ryu::Buffer::new();
                buf.push_str(ryu_buf.format(*d))
            }
            Literal::String(s) => buf.push_str(&self.dialect.quote_string(s)),
            Literal::Bytes(b) => buf.push_str(&self.dialect.format_bytes(b)),
            Literal::Duration(d) => buf.push_str(&self.dialect.quote_string(d)),
            Literal::Timestamp(t) => buf.push_str(&self.dialect.quote_string(t)),
        }
    }

    pub fn into_values(self) -> Vec<BoundValue> {
        self.values
    }

    pub fn values(&self) -> &[BoundValue] {
        &self.values
    }
}
