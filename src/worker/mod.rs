//! Per-item task execution
//!
//! A task walks one [`WorkItem`](crate::queue::WorkItem) through
//! check → fetch → write → commit, retrying transient network failures
//! according to a [`RetryPolicy`].

pub mod retry;
pub mod runner;

pub use retry::{RetryDecision, RetryPolicy};
pub use runner::TaskRunner;

use crate::fetcher::FetchError;
use crate::queue::ItemError;
use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Invalid work item: {0}")]
    InvalidItem(#[from] ItemError),

    #[error("Fetching {url} failed after {attempts} attempt(s): {source}")]
    Fetch {
        url: String,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, TaskError>;

/// How a task resolved without a fatal error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Content and marker already matched; nothing was fetched
    UpToDate,
    /// Content fetched, written and committed
    Downloaded { content: Bytes, attempts: u32 },
    /// Server answered 404 and missing assets are tolerated
    Missing,
}
