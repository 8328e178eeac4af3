//! `.env` handling. Kept apart from the layering tests: variables loaded
//! from a `.env` stay in this process's environment after the jail closes.

use figment::Jail;
use forma_config::{ConfigError, FormaConfig};
use pretty_assertions::assert_eq;

#[test]
fn dotenv_in_working_directory_feeds_env_layer() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "FORMA_STORAGE__COLLECTION=from_dotenv\n")?;

        let config = FormaConfig::load_with_dotenv().expect("config loads");
        assert_eq!(config.storage.collection, "from_dotenv");
        Ok(())
    });
}

#[test]
fn malformed_dotenv_is_reported() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "storage collection = surveys\n")?;

        let error = FormaConfig::load_with_dotenv().expect_err("not KEY=value");
        assert!(matches!(error, ConfigError::Dotenv(_)));
        assert!(error.to_string().starts_with("cannot load .env"));
        Ok(())
    });
}

#[test]
fn missing_dotenv_is_fine() {
    Jail::expect_with(|_| {
        assert!(FormaConfig::load_with_dotenv().is_ok());
        Ok(())
    });
}
