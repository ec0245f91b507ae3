//! Configuration management for fetchqueue
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use fetchqueue::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Downloading into: {}", config.scheduler.destination_root.display());
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `FETCHQUEUE__<section>__<key>`
//!
//! Examples:
//! - `FETCHQUEUE__SCHEDULER__PARALLELISM=8`
//! - `FETCHQUEUE__HTTP__PROXY=http://proxy.internal:3128`
//! - `FETCHQUEUE__RETRY__BACKOFF_MS=1000`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/fetchqueue.toml`.
//! This can be overridden using the `FETCHQUEUE_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{Config, HttpSettings, RetrySettings, SchedulerConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Failed to render configuration: {0}")]
    RenderError(#[from] toml::ser::Error),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or
    /// validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path (plus environment overrides)
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Re-check invariants, e.g. after CLI overrides were applied
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[scheduler]
destination_root = "mirror"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(
            config.scheduler.destination_root,
            std::path::PathBuf::from("mirror")
        );
        assert_eq!(config.scheduler.parallelism, 4);
    }

    #[test]
    fn test_validation_catches_zero_parallelism() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[scheduler]
parallelism = 0
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::InvalidParallelism)
        ));
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[scheduler\nparallelism = ").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(result.unwrap_err(), ConfigError::LoadError(_)));
    }

    #[test]
    fn test_to_toml_round_trips_through_loader() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("rendered.toml");

        let mut config = Config::default();
        config.scheduler.parallelism = 6;
        config.scheduler.ignore_missing_assets = true;
        config.http.proxy = Some("socks5://127.0.0.1:1080".to_string());

        fs::write(&config_path, config.to_toml().unwrap()).unwrap();

        let loaded = Config::load_from_path(config_path).unwrap();
        assert_eq!(loaded.scheduler.parallelism, 6);
        assert!(loaded.scheduler.ignore_missing_assets);
        assert_eq!(loaded.http.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
    }
}
