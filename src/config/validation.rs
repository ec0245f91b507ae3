use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("parallelism must be at least 1")]
    InvalidParallelism,

    #[error("timeout_secs must be positive")]
    InvalidTimeout,

    #[error("max_attempts must be at least 1")]
    InvalidMaxAttempts,

    #[error("Invalid proxy scheme in '{proxy}', expected http://, https:// or socks5://")]
    InvalidProxyScheme { proxy: String },

    #[error("user_agent must not be empty")]
    EmptyUserAgent,
}

const PROXY_SCHEMES: &[&str] = &["http://", "https://", "socks5://", "socks5h://"];

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_scheduler(config)?;
    validate_http(config)?;
    validate_retry(config)?;
    Ok(())
}

fn validate_scheduler(config: &Config) -> Result<(), ValidationError> {
    if config.scheduler.parallelism == 0 {
        return Err(ValidationError::InvalidParallelism);
    }
    Ok(())
}

fn validate_http(config: &Config) -> Result<(), ValidationError> {
    if config.http.timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout);
    }

    if config.http.user_agent.trim().is_empty() {
        return Err(ValidationError::EmptyUserAgent);
    }

    if let Some(proxy) = &config.http.proxy {
        let lower = proxy.to_ascii_lowercase();
        if !PROXY_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
            return Err(ValidationError::InvalidProxyScheme {
                proxy: proxy.clone(),
            });
        }
    }

    Ok(())
}

fn validate_retry(config: &Config) -> Result<(), ValidationError> {
    if config.retry.max_attempts == 0 {
        return Err(ValidationError::InvalidMaxAttempts);
    }
    Ok(())
}
