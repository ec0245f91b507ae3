//! Single-attempt HTTP transport
//!
//! A fetcher performs exactly one GET per call and classifies the failure;
//! retry decisions belong to the worker.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::{HttpConfig, HttpFetcher};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Host unreachable for {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("Remote asset not found: {url}")]
    NotFound { url: String },

    #[error("Request timed out: {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// DNS or connection failures; worth another attempt after a pause.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Unreachable { .. })
    }

    /// The server answered 404.
    pub fn is_missing(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Transport used by the task runner
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the full body of `url` in one attempt
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}
