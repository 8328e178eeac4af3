//! Field types and validation error codes.
//!
//! Both enums serialize as lowercase / `snake_case` strings. `FieldType` parses
//! through [`FieldType::parse`] so a blank or unknown type is reported as an
//! invalid field instead of a bare serde error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SchemaError;

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// The kind of input a field collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum FieldType {
    Date,
    Number,
    Text,
    Textarea,
    Select,
    Radio,
    Checkbox,
}

impl FieldType {
    pub const ALL: [Self; 7] = [
        Self::Date,
        Self::Number,
        Self::Text,
        Self::Textarea,
        Self::Select,
        Self::Radio,
        Self::Checkbox,
    ];

    /// Parse a type name as written in persisted records and editor input.
    ///
    /// Case and inner whitespace are ignored, so the editor's `"text area"`
    /// label reads as [`FieldType::Textarea`].
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidField` for a blank or unknown name.
    pub fn parse(name: &str) -> Result<Self, SchemaError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SchemaError::invalid_field("field type is required"));
        }
        let compact: String = name.split_whitespace().collect();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(&compact))
            .ok_or_else(|| SchemaError::invalid_field(format!("unknown field type '{name}'")))
    }

    /// Whether the field picks from a fixed option set.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Number => "number",
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl std::str::FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ErrorCode
// ---------------------------------------------------------------------------

/// Outcome of a failed validation rule. Data, not an error.
///
/// ```text
/// required → min_length → max_length → pattern → custom_password
/// ```
///
/// The first rule that fails decides the code for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Required,
    TooShort,
    TooLong,
    InvalidFormat,
    WeakPassword,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::InvalidFormat => "invalid_format",
            Self::WeakPassword => "weak_password",
        }
    }

    /// Message shown next to the offending field.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Required => "Required",
            Self::TooShort => "Too short",
            Self::TooLong => "Too long",
            Self::InvalidFormat => "Invalid format",
            Self::WeakPassword => "Password must be >=8 chars and contain a number",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
