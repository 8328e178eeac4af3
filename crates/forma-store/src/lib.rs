//! # forma-store
//!
//! Owns the lifecycle of one working form (the draft) and the collection of
//! saved forms.
//!
//! The saved collection is loaded once through a [`SavedFormsBackend`] when
//! the store is opened and written back in full after every save or delete.
//! A failed write leaves the in-memory collection untouched.

pub mod backend;
pub mod error;
pub mod store;

pub use backend::{DEFAULT_COLLECTION, JsonFileBackend, MemoryBackend, SavedFormsBackend};
pub use error::{PersistenceError, StoreError};
pub use store::FormStore;
