//! Expression evaluation errors.

use thiserror::Error;

/// Why a derived expression produced no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The template is not a well-formed expression.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// A `${…}` placeholder names neither an alias nor a parent id.
    #[error("unknown placeholder ${{{0}}}")]
    UnknownPlaceholder(String),

    /// A string operand of `-`, `*` or `/` is not a number.
    #[error("'{0}' is not a number")]
    NotNumeric(String),

    /// The result is infinite or NaN, e.g. a division by zero.
    #[error("result is not a finite number")]
    NonFinite,
}

impl EvalError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}
