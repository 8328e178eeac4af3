//! Error types for forma-store.

use std::path::PathBuf;

use forma_core::SchemaError;
use forma_validate::ValidationErrors;
use thiserror::Error;

/// Failures of the saved-forms backend.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The collection file exists but is not a JSON array of forms.
    #[error("malformed saved-forms collection {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The temporary file could not be moved over the collection.
    #[error("failed to replace {}: {source}", path.display())]
    Rename {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backend-specific failure.
    #[error("{0}")]
    Backend(String),
}

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Saving an empty draft requires a name.
    #[error("form name must not be blank when the form has no fields")]
    EmptyName,

    #[error("saved form not found: {id}")]
    NotFound { id: String },

    /// A writer acted on a revision the draft has moved past.
    #[error("stale revision: expected {expected}, draft is at {actual}")]
    Conflict { expected: u64, actual: u64 },

    /// Submit found invalid field values; the map holds every failure.
    #[error("validation failed for {} field(s)", .0.len())]
    ValidationFailed(ValidationErrors),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
