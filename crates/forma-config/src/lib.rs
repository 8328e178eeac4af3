//! # forma-config
//!
//! Layered configuration loading for Forma using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FORMA_*` prefix, `__` as separator)
//! 2. Project-level `.forma/config.toml`
//! 3. User-level `~/.config/forma/config.toml`
//! 4. Built-in defaults
//!
//! `FORMA_STORAGE__DIR` maps to `storage.dir`, `FORMA_GENERAL__OUTPUT_FORMAT`
//! to `general.output_format`.
//!
//! # Usage
//!
//! ```no_run
//! use forma_config::FormaConfig;
//!
//! let config = FormaConfig::load_with_dotenv().expect("config");
//! println!("forms live in {}", config.storage.resolved_dir().display());
//! ```

mod error;
mod general;
mod storage;

pub use error::ConfigError;
pub use general::{GeneralConfig, OUTPUT_FORMATS};
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FormaConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl FormaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`FormaConfig::load_with_dotenv`] for
    /// `.env` loading.
    ///
    /// # Errors
    ///
    /// `ConfigError::Source` if a source cannot be parsed,
    /// `ConfigError::Collection` or `ConfigError::OutputFormat` for a value
    /// the rest of Forma cannot use.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading the nearest `.env` into the process
    /// environment.
    ///
    /// The file is searched for in the working directory and its ancestors.
    /// Variables already set in the environment keep their values. A missing
    /// file is not an error.
    ///
    /// # Errors
    ///
    /// `ConfigError::Dotenv` if a `.env` exists but cannot be read or parsed,
    /// otherwise as for [`FormaConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(error) if error.not_found() => {}
            Err(error) => return Err(error.into()),
        }
        Self::load()
    }

    /// Extract and check a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// As for [`FormaConfig::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".forma/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("FORMA_").split("__"))
    }

    /// Reject values the rest of the system cannot use.
    ///
    /// # Errors
    ///
    /// `ConfigError::Collection` for a blank collection or one that would
    /// leave the storage directory, `ConfigError::OutputFormat` for an
    /// unknown format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let collection = self.storage.collection.trim();
        if collection.is_empty() {
            return Err(self.bad_collection("must not be blank"));
        }
        if collection.contains(['/', '\\']) || collection.starts_with('.') {
            return Err(self.bad_collection("must be a plain file name without path separators"));
        }
        if !OUTPUT_FORMATS.contains(&self.general.output_format.as_str()) {
            return Err(ConfigError::OutputFormat {
                format: self.general.output_format.clone(),
            });
        }
        Ok(())
    }

    fn bad_collection(&self, reason: &'static str) -> ConfigError {
        ConfigError::Collection {
            collection: self.storage.collection.clone(),
            reason,
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("forma").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FormaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.collection, "forms");
        assert_eq!(config.general.output_format, "json");
    }

    #[test]
    fn figment_builds_without_files() {
        let config: FormaConfig = FormaConfig::figment()
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.storage.collection, "forms");
    }

    #[test]
    fn collection_must_be_a_plain_name() {
        let mut config = FormaConfig::default();
        config.storage.collection = "../escape".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Collection { collection, .. }) if collection == "../escape"
        ));
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        let mut config = FormaConfig::default();
        config.general.output_format = "yaml".into();
        let error = config.validate().unwrap_err();
        assert_eq!(
            error.to_string(),
            "general.output_format 'yaml' is not one of json, raw"
        );
    }
}
