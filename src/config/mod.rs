//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `THERAMIND` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment loads.
//!
//! # Example
//!
//! ```no_run
//! use theramind_questionnaire::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod catalog;
mod engine;
mod error;
mod storage;
mod telemetry;

pub use catalog::{CatalogConfig, CatalogSource};
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use storage::{StorageBackend, StorageConfig};
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Question catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Answer and record storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Navigation engine switches
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `THERAMIND` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `THERAMIND__STORAGE__BACKEND=file` -> `storage.backend = file`
    /// - `THERAMIND__ENGINE__ROLLBACK_SCORES_ON_BACK=false`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("THERAMIND")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when a file source or backend lacks its path.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.catalog.validate()?;
        self.storage.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
