use super::item::WorkItem;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Shared in-memory work queue
///
/// Cloning yields another handle to the same queue, so lanes (and code
/// running inside them) can push follow-up items while others pop.
/// `pop` is an atomic claim: an item is handed to exactly one caller.
#[derive(Debug, Clone, Default)]
pub struct WorkQueue {
    items: Arc<Mutex<VecDeque<WorkItem>>>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to the back of the queue
    pub async fn push(&self, item: WorkItem) {
        let mut items = self.items.lock().await;
        items.push_back(item);
        debug!(pending = items.len(), "Item enqueued");
    }

    /// Append several items, preserving their order
    pub async fn extend<I>(&self, new_items: I)
    where
        I: IntoIterator<Item = WorkItem>,
    {
        let mut items = self.items.lock().await;
        items.extend(new_items);
        debug!(pending = items.len(), "Items enqueued");
    }

    /// Claim the front item, if any
    pub async fn pop(&self) -> Option<WorkItem> {
        self.items.lock().await.pop_front()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}
