use super::item::WorkItem;
use async_trait::async_trait;
use bytes::Bytes;

/// Hook for fan-out during a run
///
/// Called by a worker lane after an item was freshly downloaded (not for
/// up-to-date or missing items). The returned items are appended to the
/// shared queue before the lane claims its next item.
#[async_trait]
pub trait Discoverer: Send + Sync {
    async fn discover(&self, item: &WorkItem, content: &Bytes) -> Vec<WorkItem>;
}
