//! Engine configuration module
//!
//! Provides type-safe configuration loading from environment variables using
//! the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TANDEM_` prefix and nested values use double underscores as separators
//! (e.g. `TANDEM_STREAM__REPLAY_ON_SUBSCRIBE=true`).
//!
//! # Example
//!
//! ```no_run
//! use tandem::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod stream;

pub use error::{ConfigError, ValidationError};
pub use stream::StreamConfig;

use serde::Deserialize;

/// Root engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Fact stream behavior
    #[serde(default)]
    pub stream: StreamConfig,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl EngineConfig {
    /// Loads configuration from the environment (and a `.env` file if
    /// present).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("TANDEM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.log_level.trim().is_empty() {
            return Err(ValidationError::EmptyLogLevel);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stream: StreamConfig::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info,tandem=debug".to_string()
}
