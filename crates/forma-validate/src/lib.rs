//! # forma-validate
//!
//! Per-field validation for Forma.
//!
//! [`validate`] is a pure function from a field and a candidate value to at
//! most one [`ErrorCode`]. Rules run in a fixed order and the first failure
//! wins:
//!
//! ```text
//! required → min_length → max_length → pattern → custom_password
//! ```
//!
//! An optional field with no value never fails. [`validate_all`] applies
//! `validate` to every field of a schema and always returns a complete map,
//! possibly empty; blocking a submit is the caller's decision.

use std::collections::BTreeMap;

use forma_core::values::{is_blank, to_text};
use forma_core::{ErrorCode, Field, FieldValues, FormSchema, ValidationRules};
use regex::Regex;
use serde_json::Value;

/// Minimum length for `customPassword`.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Field id → the error code that field failed with.
pub type ValidationErrors = BTreeMap<String, ErrorCode>;

/// Validate one value against a field's rules.
#[must_use]
pub fn validate(field: &Field, value: Option<&Value>) -> Option<ErrorCode> {
    if is_blank(value) {
        return field.required.then_some(ErrorCode::Required);
    }

    let rules = field.validation.as_ref()?;
    let text = value.and_then(Value::as_str);

    if let (Some(min), Some(s)) = (rules.min_length, text) {
        if s.chars().count() < min {
            return Some(ErrorCode::TooShort);
        }
    }
    if let (Some(max), Some(s)) = (rules.max_length, text) {
        if s.chars().count() > max {
            return Some(ErrorCode::TooLong);
        }
    }
    if let Some(re) = compile_pattern(field, rules) {
        if !re.is_match(&to_text(value)) {
            return Some(ErrorCode::InvalidFormat);
        }
    }
    if rules.custom_password {
        if let Some(s) = text {
            if s.chars().count() < PASSWORD_MIN_CHARS || !s.chars().any(|c| c.is_ascii_digit()) {
                return Some(ErrorCode::WeakPassword);
            }
        }
    }

    None
}

/// Validate every field of `schema` against `values`.
///
/// Pass the values returned by a recompute so derived fields are checked
/// with their computed value.
#[must_use]
pub fn validate_all(schema: &FormSchema, values: &FieldValues) -> ValidationErrors {
    schema
        .fields
        .iter()
        .filter_map(|field| {
            validate(field, values.get(&field.id)).map(|code| (field.id.clone(), code))
        })
        .collect()
}

/// A malformed pattern is no constraint.
fn compile_pattern(field: &Field, rules: &ValidationRules) -> Option<Regex> {
    let source = rules.pattern.as_deref().filter(|p| !p.is_empty())?;
    match Regex::new(source) {
        Ok(re) => Some(re),
        Err(error) => {
            tracing::warn!(field_id = %field.id, pattern = source, %error, "ignoring malformed pattern");
            None
        }
    }
}
