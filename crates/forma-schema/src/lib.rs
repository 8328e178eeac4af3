//! # forma-schema
//!
//! Form schema mutation, structural checks, and the derived-field dependency
//! graph for Forma.
//!
//! This crate provides:
//! - `WorkingForm`: the draft form with every editor operation (add, update,
//!   remove, reorder field; set and clear derived specs) and a cached
//!   evaluation order
//! - `DependencyGraph`: parent → derived edges, topological order, cycle detection
//! - `check_invariants`: full structural audit of a schema, used when saved
//!   forms are loaded
//!
//! Every mutation either applies completely or returns a `SchemaError` and
//! leaves the schema untouched.

pub mod checks;
pub mod graph;
pub mod working;

pub use checks::{Violation, check_invariants};
pub use graph::DependencyGraph;
pub use working::{Removal, WorkingForm};
