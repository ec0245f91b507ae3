pub mod discover;
pub mod item;
pub mod scheduler;
pub mod store;

pub use discover::Discoverer;
pub use item::{ItemError, WorkItem};
pub use scheduler::{Scheduler, SchedulerError};
pub use store::WorkQueue;
