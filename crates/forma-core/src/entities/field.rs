use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::FieldType;
use crate::ids::{PREFIX_FIELD, PREFIX_OPTION, generate_id};

/// One entry of a choice field's option set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FieldOption {
    pub id: String,
    pub label: String,
    pub value: String,
}

impl FieldOption {
    /// Create an option with a freshly generated id.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: generate_id(PREFIX_OPTION),
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Per-field validation rules. Every rule is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub custom_password: bool,
}

/// How a derived field computes its value.
///
/// `parents[0]` binds to alias `a`, `parents[1]` to `b`, and so on.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DerivedSpec {
    pub parents: Vec<String>,
    /// Template such as `${a} * ${b}`.
    pub expression: String,
}

/// A single form field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    /// Ignored while `derived` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived: Option<DerivedSpec>,
}

impl Field {
    /// Create an optional, rule-free input field with a generated id.
    pub fn new(field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: generate_id(PREFIX_FIELD),
            field_type,
            label: label.into(),
            required: false,
            default_value: None,
            validation: None,
            options: Vec::new(),
            derived: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_validation(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_derived(mut self, parents: Vec<String>, expression: impl Into<String>) -> Self {
        self.derived = Some(DerivedSpec {
            parents,
            expression: expression.into(),
        });
        self
    }

    #[must_use]
    pub const fn is_derived(&self) -> bool {
        self.derived.is_some()
    }

    /// Parent ids of a derived field, empty for input fields.
    #[must_use]
    pub fn parents(&self) -> &[String] {
        self.derived.as_ref().map_or(&[], |d| d.parents.as_slice())
    }
}
