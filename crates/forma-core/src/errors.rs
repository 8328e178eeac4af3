//! Structural schema errors.
//!
//! Raised synchronously by schema mutations and by the derived-field
//! evaluator. A mutation that returns one of these leaves the schema exactly as
//! it was. Store-level errors (`StoreError`, `PersistenceError`) live in
//! `forma-store`; the CLI converges everything into `anyhow`.

use thiserror::Error;

use crate::enums::FieldType;

/// Most parents a derived field may list: one per alias letter `a`..=`z`.
pub const MAX_PARENTS: usize = 26;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field failed a structural check (label, type, options, id).
    #[error("Invalid field: {reason}")]
    InvalidField { reason: String },

    /// No field with this id exists in the schema.
    #[error("Field not found: {id}")]
    NotFound { id: String },

    /// The derived-field dependency graph would contain a cycle through `id`.
    #[error("Dependency cycle involving field {id}")]
    Cycle { id: String },

    /// A derived field lists a parent of a different type.
    #[error("Type mismatch: field {field_id} is {expected} but parent {parent_id} is {found}")]
    TypeMismatch {
        field_id: String,
        parent_id: String,
        expected: FieldType,
        found: FieldType,
    },

    /// A derived field lists more parents than there are aliases.
    #[error("Derived field {field_id} has {count} parents, at most 26 are supported")]
    TooManyParents { field_id: String, count: usize },
}

impl SchemaError {
    pub fn invalid_field(reason: impl Into<String>) -> Self {
        Self::InvalidField {
            reason: reason.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}
