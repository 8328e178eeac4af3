//! Field value maps.
//!
//! Values are plain JSON: strings, numbers, booleans, arrays (multi-choice)
//! or null. The map is ordered so diagnostics and serialized output are stable.

use std::collections::BTreeMap;

use serde_json::Value;

/// Current values keyed by field id.
pub type FieldValues = BTreeMap<String, Value>;

/// Absent, null, empty string, or empty sequence.
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Render a value as the text a pattern rule is matched against.
///
/// Absent and null render as the empty string; arrays join their elements
/// with commas.
#[must_use]
pub fn to_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| to_text(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(object @ Value::Object(_)) => object.to_string(),
    }
}
