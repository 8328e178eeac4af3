//! Why Forma could not assemble its configuration.

use thiserror::Error;

use crate::general::OUTPUT_FORMATS;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `FORMA_*` variable could not be read into the config.
    #[error("cannot read forma configuration: {0}")]
    Source(#[from] figment::Error),

    /// A `.env` file was found but is not a list of `KEY=value` lines.
    #[error("cannot load .env: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// `storage.collection` cannot name a file inside the storage directory.
    #[error("storage.collection '{collection}' {reason}")]
    Collection {
        collection: String,
        reason: &'static str,
    },

    /// `general.output_format` is not a format the CLI renders.
    #[error("general.output_format '{format}' is not one of {}", OUTPUT_FORMATS.join(", "))]
    OutputFormat { format: String },
}
