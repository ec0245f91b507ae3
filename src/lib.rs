pub mod config;
pub mod fetcher;
pub mod manifest;
pub mod observability;
pub mod queue;
pub mod storage;
pub mod worker;
