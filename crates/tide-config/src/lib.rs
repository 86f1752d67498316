//! # tide-config
//!
//! Layered configuration loading for tidepool using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TIDEPOOL_*` prefix, `__` as separator)
//! 2. Project-level `.tidepool/config.toml`
//! 3. User-level `~/.config/tidepool/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TIDEPOOL_MODEL__API_KEY` -> `model.api_key`,
//! `TIDEPOOL_STORE__DB_PATH` -> `store.db_path`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use tide_config::TideConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = TideConfig::load_with_dotenv().expect("config");
//!
//! if config.model.is_configured() {
//!     println!("model: {}", config.model.model);
//! }
//! ```

mod error;
mod general;
mod model;
mod store;

pub use error::ConfigError;
pub use general::{ClassifierStrategy, GeneralConfig};
pub use model::ModelConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TideConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TideConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source fails to parse or merge.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the working directory (or
    /// a parent) before building the figment. This is the typical entry point
    /// for the CLI and tests; the original deployment supplied its API key
    /// this way.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source fails to parse or merge.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can layer additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".tidepool/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("TIDEPOOL_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tidepool").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_loads() {
        let config = TideConfig::default();
        assert!(!config.model.is_configured());
        assert_eq!(config.store.max_rows, 500);
        assert_eq!(config.general.classifier, ClassifierStrategy::Keyword);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: TideConfig = TideConfig::figment().extract().expect("extract defaults");
            assert!(!config.model.is_configured());
            assert_eq!(config.model.max_attempts, 4);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_nested_fields() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TIDEPOOL_MODEL__API_KEY", "sk-test");
            jail.set_env("TIDEPOOL_STORE__MAX_ROWS", "25");
            let config: TideConfig = TideConfig::figment().extract()?;
            assert_eq!(config.model.api_key, "sk-test");
            assert_eq!(config.store.max_rows, 25);
            assert!(config.model.is_configured());
            Ok(())
        });
    }

    #[test]
    fn project_toml_layer_applies() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir(".tidepool")?;
            jail.create_file(
                ".tidepool/config.toml",
                r#"
                [general]
                classifier = "model"
                narrative_sample_rows = 40
                "#,
            )?;
            let config: TideConfig = TideConfig::figment().extract()?;
            assert_eq!(config.general.classifier, ClassifierStrategy::Model);
            assert_eq!(config.general.narrative_sample_rows, 40);
            Ok(())
        });
    }
}
