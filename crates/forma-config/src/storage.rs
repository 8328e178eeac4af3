//! Where saved forms are stored.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_collection() -> String {
    "forms".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding collection files. Empty means the platform data
    /// directory (`~/.local/share/forma` on Linux).
    #[serde(default)]
    pub dir: String,

    /// Collection name; forms are stored in `<dir>/<collection>.json`.
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            collection: default_collection(),
        }
    }
}

impl StorageConfig {
    /// The configured directory, or the platform default.
    #[must_use]
    pub fn resolved_dir(&self) -> PathBuf {
        if !self.dir.trim().is_empty() {
            return PathBuf::from(&self.dir);
        }
        dirs::data_dir().map_or_else(|| PathBuf::from(".forma"), |d| d.join("forma"))
    }
}
