//! Application configuration module
//!
//! Configuration is read from environment variables using the `config` and
//! `dotenvy` crates. Variables carry the `CARE_SHERPA` prefix and nested
//! values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use care_sherpa::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Assessing with {}", config.oracle.complex_model);
//! ```

mod engine;
mod error;
mod logging;
mod media;
mod oracle;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use media::MediaConfig;
pub use oracle::OracleConfig;

use serde::Deserialize;

use crate::domain::patient::Language;

/// Root application configuration
///
/// Every section has defaults; only `oracle.api_key` must be supplied
/// for [`AppConfig::validate`] to pass.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Gemini oracle (models, key, timeouts)
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Interview limits and lookup defaults
    #[serde(default)]
    pub engine: EngineConfig,

    /// Image normalization
    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present
    /// 2. Reads variables with the `CARE_SHERPA` prefix
    /// 3. Splits nested keys on `__`
    ///
    /// - `CARE_SHERPA__ORACLE__API_KEY=...` -> `oracle.api_key`
    /// - `CARE_SHERPA__ENGINE__LANGUAGE=es` -> `engine.language`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CARE_SHERPA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all sections
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.oracle.validate()?;
        self.engine.validate()?;
        self.media.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Interface language; unknown codes fall back to English
    pub fn language(&self) -> Language {
        Language::resolve(&self.engine.language)
    }
}
