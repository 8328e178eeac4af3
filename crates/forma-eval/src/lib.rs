//! # forma-eval
//!
//! Derived-field evaluation for Forma.
//!
//! Derived fields carry a template such as `${a} * ${b}`. This crate parses
//! templates into a small operator tree (`+ - * /`, unary sign, parentheses,
//! number/string/boolean literals and `${…}` placeholders) and evaluates it
//! against the coerced values of a field's parents. Nothing else is in scope
//! during evaluation: no ambient variables, no calls, no I/O.
//!
//! [`recompute`] runs every derived field of a schema in dependency order.
//! Expression failures never escape as errors; the field gets an empty value
//! and a [`Diagnostic`] explains why.

pub mod error;
pub mod expr;
pub mod recompute;

pub use error::EvalError;
pub use expr::{Scalar, Template};
pub use recompute::{Diagnostic, DiagnosticKind, Recomputation, recompute, recompute_in_order};
