//! Scripted fetcher for unit tests

use super::{Fetch, FetchError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    Body(&'static [u8]),
    Unreachable,
    NotFound,
    Status(u16),
}

/// Replies are consumed per URL in order; once a script runs out (or a URL
/// has none) the body is the URL itself.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn script(&self, url: &str, replies: Vec<Reply>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), replies.into());
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let reply = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(|replies| replies.pop_front());

        match reply {
            Some(Reply::Body(body)) => Ok(Bytes::from_static(body)),
            Some(Reply::Unreachable) => Err(FetchError::Unreachable {
                url: url.to_string(),
                message: "getaddrinfo ENOTFOUND".to_string(),
            }),
            Some(Reply::NotFound) => Err(FetchError::NotFound {
                url: url.to_string(),
            }),
            Some(Reply::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            None => Ok(Bytes::copy_from_slice(url.as_bytes())),
        }
    }
}
