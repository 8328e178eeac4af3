//! Persisted form entities.
//!
//! Field names serialize in camelCase (`defaultValue`, `createdAt`,
//! `minLength`) and every optional member defaults when absent, so older
//! saved collections keep loading.

mod field;
mod form;

pub use field::{DerivedSpec, Field, FieldOption, ValidationRules};
pub use form::{FormSchema, FormSummary};
