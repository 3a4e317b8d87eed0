//! Append-only output writer plus the three resource counters that guard
//! every recursive descent: output length, AST depth, and comprehension
//! nesting. All three are checked before a node's first write, never after.

use crate::error::{TranslateError, TranslateErrorKind, TranslateResult};

/// The append-only SQL text being built for one translation call.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    text: String,
    max_output_length: usize,
}

impl OutputBuffer {
    pub fn new(max_output_length: usize) -> Self {
        Self {
            text: String::new(),
            max_output_length,
        }
    }

    pub fn push_str(&mut self, s: &str) -> TranslateResult<()> {
        if self.text.len() + s.len() > self.max_output_length {
            return Err(TranslateError::new(TranslateErrorKind::OutputTooLarge {
                limit: self.max_output_length,
            }));
        }
        self.text.push_str(s);
        Ok(())
    }

    pub fn push_char(&mut self, c: char) -> TranslateResult<()> {
        if self.text.len() + c.len_utf8() > self.max_output_length {
            return Err(TranslateError::new(TranslateErrorKind::OutputTooLarge {
                limit: self.max_output_length,
            }));
        }
        self.text.push(c);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Tracks current AST depth and comprehension nesting across a translation.
/// Counters are plain integers; callers bracket a recursive descent with
/// `enter_*`/`leave_*` by hand rather than through an RAII guard, since a
/// guard type would need to borrow the counter for the whole descent and
/// that borrow would collide with the `&mut self` recursive calls the
/// translator makes while the guard is still alive.
#[derive(Debug)]
pub struct LimitGuard {
    depth: usize,
    comprehension_depth: usize,
    max_depth: usize,
    max_comprehension_nesting: usize,
}

impl LimitGuard {
    pub fn new(max_depth: usize, max_comprehension_nesting: usize) -> Self {
        Self {
            depth: 0,
            comprehension_depth: 0,
            max_depth,
            max_comprehension_nesting,
        }
    }

    /// Checks depth before allowing descent into a node, then increments it.
    /// Pair every successful call with [`Self::leave_depth`] once the
    /// descent returns, regardless of whether it succeeded.
    pub fn enter_depth(&mut self) -> TranslateResult<()> {
        if self.depth >= self.max_depth {
            return Err(TranslateError::new(TranslateErrorKind::DepthExceeded {
                limit: self.max_depth,
                at: None,
            }));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave_depth(&mut self) {
        self.depth -= 1;
    }

    /// Checks comprehension nesting before allowing descent into a
    /// `Comprehension` node's step, then increments it. Pair with
    /// [`Self::leave_comprehension`] the same way as [`Self::enter_depth`].
    pub fn enter_comprehension(&mut self) -> TranslateResult<()> {
        if self.comprehension_depth >= self.max_comprehension_nesting {
            return Err(TranslateError::new(TranslateErrorKind::ComprehensionTooDeep {
                limit: self.max_comprehension_nesting,
                at: None,
            }));
        }
        self.comprehension_depth += 1;
        Ok(())
    }

    pub fn leave_comprehension(&mut self) {
        self.comprehension_depth -= 1;
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn comprehension_depth(&self) -> usize {
        self.comprehension_depth
    }
}
