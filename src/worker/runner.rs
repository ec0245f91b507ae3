//! Task runner - processes individual work items

use super::retry::{RetryDecision, RetryPolicy};
use super::{Result, TaskError, TaskOutcome};
use crate::fetcher::Fetch;
use crate::observability::Metrics;
use crate::queue::WorkItem;
use crate::storage;
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs work items against one fetcher and one destination root
pub struct TaskRunner {
    fetcher: Arc<dyn Fetch>,
    destination_root: PathBuf,
    policy: RetryPolicy,
    ignore_missing_assets: bool,
    metrics: Arc<Metrics>,
}

impl TaskRunner {
    pub fn new(fetcher: Arc<dyn Fetch>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            destination_root: destination_root.into(),
            policy: RetryPolicy::default(),
            ignore_missing_assets: false,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn ignore_missing_assets(mut self, ignore: bool) -> Self {
        self.ignore_missing_assets = ignore;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Process one item to completion, including retries.
    ///
    /// Returns an error only for failures that must abort the run.
    pub async fn run(&self, item: &WorkItem) -> Result<TaskOutcome> {
        item.validate()?;

        let destination = item.resolve(&self.destination_root);

        if storage::is_up_to_date(&destination, &item.identifier).await {
            info!(file = %item.destination_path.display(), "File is already up-to-date");
            self.metrics.item_skipped();
            return Ok(TaskOutcome::UpToDate);
        }

        let Some((content, attempts)) = self.fetch_with_retry(item).await? else {
            warn!(
                file = %item.destination_path.display(),
                url = %item.source_url,
                "Missing asset, skipping"
            );
            self.metrics.asset_missing();
            return Ok(TaskOutcome::Missing);
        };

        info!(file = %item.destination_path.display(), size = content.len(), "Writing");
        storage::write_content(&destination, &content)
            .await
            .map_err(|source| TaskError::Filesystem {
                path: destination.clone(),
                source,
            })?;

        storage::commit(&destination, &item.identifier)
            .await
            .map_err(|source| TaskError::Filesystem {
                path: storage::marker_path(&destination),
                source,
            })?;

        self.metrics.item_fetched(content.len() as u64);

        Ok(TaskOutcome::Downloaded { content, attempts })
    }

    /// Fetch until success, a tolerated 404 (`None`), or a fatal decision
    async fn fetch_with_retry(&self, item: &WorkItem) -> Result<Option<(Bytes, u32)>> {
        let url = item.source_url.as_str();
        let mut attempt = 1;

        loop {
            info!(file = %item.destination_path.display(), url, attempt, "Fetching");

            let error = match self.fetcher.fetch(url).await {
                Ok(content) => return Ok(Some((content, attempt))),
                Err(e) => e,
            };

            match self.policy.decide(attempt, &error, self.ignore_missing_assets) {
                RetryDecision::Retry(delay) => {
                    warn!(
                        file = %item.destination_path.display(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Could not download, waiting before retrying"
                    );
                    self.metrics.fetch_retried();
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::SkipMissing => return Ok(None),
                RetryDecision::Abort => {
                    return Err(TaskError::Fetch {
                        url: url.to_string(),
                        attempts: attempt,
                        source: error,
                    });
                }
            }
        }
    }
}
