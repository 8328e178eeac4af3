//! Runtime values of the expression language.

use std::fmt;

use serde_json::Value;

use crate::error::EvalError;

/// Largest integer an `f64` represents exactly (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// A literal bound to a placeholder or produced by evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Scalar {
    /// Numeric view for `- * /` and unary sign. Booleans count as 1/0 and
    /// blank text as 0.
    pub(crate) fn to_number(&self) -> Result<f64, EvalError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(0.0);
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|_| EvalError::NotNumeric(s.clone()))
            }
        }
    }

    /// Convert an evaluation result into a field value.
    ///
    /// # Errors
    ///
    /// `EvalError::NonFinite` for infinite or NaN numbers.
    pub fn into_value(self) -> Result<Value, EvalError> {
        match self {
            Self::Number(n) if !n.is_finite() => Err(EvalError::NonFinite),
            Self::Number(n) => Ok(number_value(n)),
            Self::Text(s) => Ok(Value::String(s)),
            Self::Bool(b) => Ok(Value::Bool(b)),
        }
    }
}

/// Integral results become JSON integers (`30`, not `30.0`).
#[allow(clippy::cast_possible_truncation)]
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.is_finite() => match number_value(*n) {
                Value::Number(num) => write!(f, "{num}"),
                _ => write!(f, "{n}"),
            },
            Self::Number(n) if n.is_nan() => f.write_str("NaN"),
            Self::Number(n) if *n > 0.0 => f.write_str("Infinity"),
            Self::Number(_) => f.write_str("-Infinity"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}
