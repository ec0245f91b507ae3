use crate::fetcher::HttpConfig;
use crate::fetcher::http::DEFAULT_USER_AGENT;
use crate::worker::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Scheduler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Root directory every work item path is resolved against
    #[serde(default = "default_destination_root")]
    pub destination_root: PathBuf,
    /// Number of concurrent worker lanes
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Treat HTTP 404 as a skippable missing asset instead of a failure
    #[serde(default)]
    pub ignore_missing_assets: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            destination_root: default_destination_root(),
            parallelism: default_parallelism(),
            ignore_missing_assets: false,
        }
    }
}

fn default_destination_root() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_parallelism() -> usize {
    4
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            proxy: None,
            user_agent: default_user_agent(),
        }
    }
}

impl HttpSettings {
    pub fn to_http_config(&self) -> HttpConfig {
        HttpConfig {
            request_timeout: Duration::from_secs(self.timeout_secs),
            proxy: self.proxy.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Retry configuration for transient network failures
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrySettings {
    /// Total attempts per item, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl RetrySettings {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.scheduler.destination_root, PathBuf::from("downloads"));
        assert_eq!(config.scheduler.parallelism, 4);
        assert!(!config.scheduler.ignore_missing_assets);
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http.proxy.is_none());
        assert_eq!(config.retry.to_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_http_settings_conversion() {
        let settings = HttpSettings {
            timeout_secs: 7,
            proxy: Some("http://proxy:3128".to_string()),
            user_agent: "mirror/1.0".to_string(),
        };

        let http = settings.to_http_config();
        assert_eq!(http.request_timeout, Duration::from_secs(7));
        assert_eq!(http.proxy.as_deref(), Some("http://proxy:3128"));
        assert_eq!(http.user_agent, "mirror/1.0");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[scheduler]
parallelism = 2

[retry]
backoff_ms = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.scheduler.parallelism, 2);
        assert_eq!(config.scheduler.destination_root, PathBuf::from("downloads"));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff_ms, 100);
    }
}
