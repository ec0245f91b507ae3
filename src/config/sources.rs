use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "FETCHQUEUE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/fetchqueue.toml";
const ENV_PREFIX: &str = "FETCHQUEUE";
const ENV_SEPARATOR: &str = "__";

/// Path of the configuration file: `FETCHQUEUE_CONFIG` or the default
pub fn default_path() -> PathBuf {
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    load_from_sources(default_path())
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // FETCHQUEUE__SCHEDULER__PARALLELISM -> scheduler.parallelism
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[scheduler]
destination_root = "/srv/mirror"
parallelism = 8
ignore_missing_assets = true

[http]
timeout_secs = 10
proxy = "http://proxy.internal:3128"
user_agent = "mirror-bot/2.0"

[retry]
max_attempts = 5
backoff_ms = 250
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();

        assert_eq!(config.scheduler.destination_root, PathBuf::from("/srv/mirror"));
        assert_eq!(config.scheduler.parallelism, 8);
        assert!(config.scheduler.ignore_missing_assets);
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(
            config.http.proxy.as_deref(),
            Some("http://proxy.internal:3128")
        );
        assert_eq!(config.http.user_agent, "mirror-bot/2.0");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.backoff_ms, 250);
    }

    // Environment overrides are not exercised here: env::set_var is unsafe
    // in edition 2024 and would race with parallel tests.
}
