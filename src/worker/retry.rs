//! Retry decisions for a single work item

use crate::fetcher::FetchError;
use std::time::Duration;

/// What to do after a failed fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given delay, then fetch again
    Retry(Duration),
    /// The asset is absent and absence is tolerated; finish without writing
    SkipMissing,
    /// Give up on the item; the error is fatal for the run
    Abort,
}

/// Fixed-delay retry policy for transient network failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Decide the next step after `attempt` (1-based) failed with `error`.
    ///
    /// | failure     | condition                  | decision      |
    /// |-------------|----------------------------|---------------|
    /// | Unreachable | attempt < max_attempts     | `Retry`       |
    /// | Unreachable | attempt >= max_attempts    | `Abort`       |
    /// | NotFound    | missing assets tolerated   | `SkipMissing` |
    /// | NotFound    | not tolerated              | `Abort`       |
    /// | other       | any                        | `Abort`       |
    pub fn decide(&self, attempt: u32, error: &FetchError, ignore_missing: bool) -> RetryDecision {
        if error.is_transient() && attempt < self.max_attempts {
            RetryDecision::Retry(self.backoff)
        } else if error.is_missing() && ignore_missing {
            RetryDecision::SkipMissing
        } else {
            RetryDecision::Abort
        }
    }
}
