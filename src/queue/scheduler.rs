use super::discover::Discoverer;
use super::item::WorkItem;
use super::store::WorkQueue;
use crate::observability::MetricsSnapshot;
use crate::worker::{TaskError, TaskOutcome, TaskRunner};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Parallelism must be at least 1")]
    InvalidParallelism,

    #[error("Task for '{}' failed: {source}", .path.display())]
    Task {
        path: PathBuf,
        #[source]
        source: TaskError,
    },

    #[error("Worker lane panicked: {0}")]
    LanePanicked(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Scheduler drains a shared work queue with a fixed pool of worker lanes
///
/// Architecture:
/// 1. Caller seeds the queue with `enqueue`
/// 2. `start` spawns exactly `parallelism` lanes
/// 3. Each lane pops one item, runs it to completion (retries included),
///    hands fresh downloads to the optional [`Discoverer`], and loops
/// 4. A lane exits when it finds the queue empty; `start` joins them all
///
/// On a fatal task error the failing lane raises a shared abort flag. Other
/// lanes finish the item they hold but claim nothing further, and the first
/// error is returned from `start`. Unclaimed items stay queued.
pub struct Scheduler {
    queue: WorkQueue,
    runner: Arc<TaskRunner>,
    discoverer: Option<Arc<dyn Discoverer>>,
    parallelism: usize,
}

impl Scheduler {
    pub fn new(runner: TaskRunner, parallelism: usize) -> Result<Self> {
        if parallelism == 0 {
            return Err(SchedulerError::InvalidParallelism);
        }

        Ok(Self {
            queue: WorkQueue::new(),
            runner: Arc::new(runner),
            discoverer: None,
            parallelism,
        })
    }

    pub fn with_discoverer(mut self, discoverer: Arc<dyn Discoverer>) -> Self {
        self.discoverer = Some(discoverer);
        self
    }

    /// Append an item; safe to call while a run is in progress
    pub async fn enqueue(&self, item: WorkItem) {
        self.queue.push(item).await;
    }

    /// Handle to the shared queue, for pushing items from inside a run
    pub fn queue(&self) -> WorkQueue {
        self.queue.clone()
    }

    /// Run lanes until the queue is drained.
    ///
    /// Returns the counters of this run on success.
    pub async fn start(&self) -> Result<MetricsSnapshot> {
        let baseline = self.runner.metrics().snapshot();
        let abort = Arc::new(AtomicBool::new(false));
        let mut lanes = JoinSet::new();

        info!(
            parallelism = self.parallelism,
            pending = self.queue.len().await,
            "Starting worker lanes"
        );

        for lane_id in 0..self.parallelism {
            let lane = Lane {
                id: lane_id,
                queue: self.queue.clone(),
                runner: Arc::clone(&self.runner),
                discoverer: self.discoverer.clone(),
                abort: Arc::clone(&abort),
            };
            lanes.spawn(lane.run());
        }

        let mut first_error = None;
        while let Some(joined) = lanes.join_next().await {
            let result = joined.unwrap_or_else(|e| Err(SchedulerError::LanePanicked(e.to_string())));
            if let Err(e) = result {
                abort.store(true, Ordering::SeqCst);
                first_error.get_or_insert(e);
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let summary = self.runner.metrics().snapshot().since(&baseline);
        info!(
            fetched = summary.items_fetched,
            skipped = summary.items_skipped,
            missing = summary.assets_missing,
            retries = summary.fetch_retries,
            bytes = summary.bytes_written,
            "All lanes finished"
        );

        Ok(summary)
    }
}

struct Lane {
    id: usize,
    queue: WorkQueue,
    runner: Arc<TaskRunner>,
    discoverer: Option<Arc<dyn Discoverer>>,
    abort: Arc<AtomicBool>,
}

impl Lane {
    async fn run(self) -> Result<()> {
        let mut processed = 0usize;

        loop {
            if self.abort.load(Ordering::SeqCst) {
                debug!(lane = self.id, processed, "Abort requested, lane stopping");
                return Ok(());
            }

            let Some(item) = self.queue.pop().await else {
                break;
            };

            match self.runner.run(&item).await {
                Ok(TaskOutcome::Downloaded { content, .. }) => {
                    if let Some(discoverer) = &self.discoverer {
                        let follow_ups = discoverer.discover(&item, &content).await;
                        if !follow_ups.is_empty() {
                            debug!(
                                lane = self.id,
                                count = follow_ups.len(),
                                "Discovered follow-up items"
                            );
                            self.queue.extend(follow_ups).await;
                        }
                    }
                }
                Ok(TaskOutcome::UpToDate | TaskOutcome::Missing) => {}
                Err(source) => {
                    self.abort.store(true, Ordering::SeqCst);
                    error!(
                        lane = self.id,
                        file = %item.destination_path.display(),
                        error = %source,
                        "Task failed"
                    );
                    return Err(SchedulerError::Task {
                        path: item.destination_path,
                        source,
                    });
                }
            }

            processed += 1;
        }

        debug!(lane = self.id, processed, "Queue empty, lane finished");
        Ok(())
    }
}
