//! # forma-core
//!
//! Core types, ID generation, and error types for Forma.
//!
//! This crate provides the foundational types shared across all Forma crates:
//! - Form schema entities (`FormSchema`, `Field`, `FieldOption`, rule sets)
//! - Field type and validation error code enums
//! - ID prefix constants and generation
//! - Structural schema errors
//! - The field value map passed between the evaluator, validator and store

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod values;

pub use entities::{DerivedSpec, Field, FieldOption, FormSchema, FormSummary, ValidationRules};
pub use enums::{ErrorCode, FieldType};
pub use errors::SchemaError;
pub use values::FieldValues;
