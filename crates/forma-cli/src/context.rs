use std::path::PathBuf;

use anyhow::Context;
use forma_config::FormaConfig;
use forma_store::{FormStore, JsonFileBackend};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub store: FormStore<JsonFileBackend>,
}

impl AppContext {
    /// Open the saved-forms store, preferring `--data-dir` over config.
    pub fn init(config: &FormaConfig, data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let dir = data_dir.unwrap_or_else(|| config.storage.resolved_dir());
        let backend = JsonFileBackend::new(dir.clone(), config.storage.collection.as_str());
        tracing::debug!(path = %backend.path().display(), "opening saved forms");

        let store = FormStore::open(backend)
            .with_context(|| format!("failed to open saved forms in {}", dir.display()))?;
        Ok(Self { store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_flag_overrides_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut config = FormaConfig::default();
        config.storage.dir = "/nonexistent/forma".into();
        config.storage.collection = "cli".into();

        let ctx = AppContext::init(&config, Some(tmp.path().to_path_buf())).unwrap();

        assert_eq!(ctx.store.backend().path(), tmp.path().join("cli.json"));
        assert!(ctx.store.saved_forms().is_empty());
    }
}
