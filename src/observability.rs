//! Run counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every worker lane of a run
#[derive(Debug, Default)]
pub struct Metrics {
    items_fetched: AtomicU64,
    items_skipped: AtomicU64,
    assets_missing: AtomicU64,
    fetch_retries: AtomicU64,
    bytes_written: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_fetched(&self, bytes: u64) {
        self.items_fetched.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
        tracing::debug!(counter = "items_fetched", "Metric incremented");
    }

    pub fn item_skipped(&self) {
        self.items_skipped.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "items_skipped", "Metric incremented");
    }

    pub fn asset_missing(&self) {
        self.assets_missing.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "assets_missing", "Metric incremented");
    }

    pub fn fetch_retried(&self) {
        self.fetch_retries.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "fetch_retries", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            items_fetched: self.items_fetched.load(Ordering::Relaxed),
            items_skipped: self.items_skipped.load(Ordering::Relaxed),
            assets_missing: self.assets_missing.load(Ordering::Relaxed),
            fetch_retries: self.fetch_retries.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub items_fetched: u64,
    pub items_skipped: u64,
    pub assets_missing: u64,
    pub fetch_retries: u64,
    pub bytes_written: u64,
}

impl MetricsSnapshot {
    /// Items resolved without a fatal error
    pub fn items_resolved(&self) -> u64 {
        self.items_fetched + self.items_skipped + self.assets_missing
    }

    /// Counts accumulated after `earlier` was taken
    pub fn since(&self, earlier: &MetricsSnapshot) -> MetricsSnapshot {
        MetricsSnapshot {
            items_fetched: self.items_fetched.saturating_sub(earlier.items_fetched),
            items_skipped: self.items_skipped.saturating_sub(earlier.items_skipped),
            assets_missing: self.assets_missing.saturating_sub(earlier.assets_missing),
            fetch_retries: self.fetch_retries.saturating_sub(earlier.fetch_retries),
            bytes_written: self.bytes_written.saturating_sub(earlier.bytes_written),
        }
    }
}
