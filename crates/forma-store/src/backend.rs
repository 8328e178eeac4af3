//! Persistence backends for the saved-forms collection.
//!
//! The store treats a backend as a blob store for one ordered collection:
//! load it all at startup, replace it all after each save or delete.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use forma_core::FormSchema;

use crate::error::PersistenceError;

/// Collection name used when none is configured.
pub const DEFAULT_COLLECTION: &str = "forms";

/// Where saved forms live between runs.
pub trait SavedFormsBackend {
    /// Load the whole collection. An absent collection is empty.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the collection exists but cannot be read
    /// or decoded.
    fn load_saved_forms(&self) -> Result<Vec<FormSchema>, PersistenceError>;

    /// Replace the whole collection. Either every form is written or the
    /// previous collection is kept.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the write fails.
    fn persist_saved_forms(&mut self, forms: &[FormSchema]) -> Result<(), PersistenceError>;
}

/// Keeps the collection in memory. Used by tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    forms: Vec<FormSchema>,
    writes: usize,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_forms(forms: Vec<FormSchema>) -> Self {
        Self { forms, writes: 0 }
    }

    #[must_use]
    pub fn forms(&self) -> &[FormSchema] {
        &self.forms
    }

    /// Number of successful `persist_saved_forms` calls.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl SavedFormsBackend for MemoryBackend {
    fn load_saved_forms(&self) -> Result<Vec<FormSchema>, PersistenceError> {
        Ok(self.forms.clone())
    }

    fn persist_saved_forms(&mut self, forms: &[FormSchema]) -> Result<(), PersistenceError> {
        self.forms = forms.to_vec();
        self.writes += 1;
        Ok(())
    }
}

/// Stores the collection as a pretty-printed JSON array at
/// `<dir>/<collection>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
    collection: String,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>, collection: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            collection: collection.into(),
        }
    }

    /// Backend for the default `forms` collection under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, DEFAULT_COLLECTION)
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.collection))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SavedFormsBackend for JsonFileBackend {
    fn load_saved_forms(&self) -> Result<Vec<FormSchema>, PersistenceError> {
        let path = self.path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no saved-forms collection yet");
                return Ok(Vec::new());
            }
            Err(source) => return Err(PersistenceError::Read { path, source }),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|source| PersistenceError::Json { path, source })
    }

    fn persist_saved_forms(&mut self, forms: &[FormSchema]) -> Result<(), PersistenceError> {
        let path = self.path();
        fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let body = serde_json::to_vec_pretty(forms).map_err(|source| PersistenceError::Json {
            path: path.clone(),
            source,
        })?;

        let write_err = |source| PersistenceError::Write {
            path: path.clone(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(&body).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| PersistenceError::Rename {
            path: path.clone(),
            source: e.error,
        })?;

        tracing::info!(path = %path.display(), forms = forms.len(), "saved forms persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let backend = JsonFileBackend::in_dir(tmp.path().join("nested"));
        assert!(backend.load_saved_forms().unwrap().is_empty());
    }

    #[test]
    fn path_uses_collection_name() {
        let backend = JsonFileBackend::new("/data", "drafts");
        assert_eq!(backend.path(), PathBuf::from("/data/drafts.json"));
        assert_eq!(
            JsonFileBackend::in_dir("/data").path(),
            PathBuf::from("/data/forms.json")
        );
    }

    #[test]
    fn persist_creates_directory_and_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("store");
        let mut backend = JsonFileBackend::in_dir(&dir);

        backend.persist_saved_forms(&[FormSchema::empty()]).unwrap();

        let entries: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["forms.json".to_string()]);
    }

    #[test]
    fn malformed_collection_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("forms.json"), "{not json").unwrap();
        let backend = JsonFileBackend::in_dir(tmp.path());
        assert!(matches!(
            backend.load_saved_forms(),
            Err(PersistenceError::Json { .. })
        ));
    }

    #[test]
    fn memory_backend_counts_writes() {
        let mut backend = MemoryBackend::new();
        backend.persist_saved_forms(&[FormSchema::empty()]).unwrap();
        assert_eq!(backend.writes(), 1);
        assert_eq!(backend.forms().len(), 1);
    }
}
