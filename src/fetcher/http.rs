//! reqwest-backed fetcher

use super::{Fetch, FetchError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Proxy, StatusCode};
use std::time::Duration;
use tracing::debug;

/// User-Agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_5) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub request_timeout: Duration,
    pub proxy: Option<String>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// HTTP fetcher sharing one connection pool across all lanes
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10));

        // Only the configured proxy is honoured, never the environment's
        match &config.proxy {
            Some(url) => {
                let proxy = Proxy::all(url)
                    .map_err(|e| FetchError::InvalidProxy(format!("{}: {}", url, e)))?;
                builder = builder.proxy(proxy);
            }
            None => {
                builder = builder.no_proxy();
            }
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        debug!(url, "Sending request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify(url, e))?;

        debug!(url, size = bytes.len(), "Response body received");

        Ok(bytes)
    }
}

fn classify(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_connect() {
        FetchError::Unreachable {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Request(format!("{}: {}", url, e))
    }
}
