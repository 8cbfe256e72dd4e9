//! Scheduler for bounding concurrency and pacing requests
//!
//! This module handles:
//! - The work items handed from the coordinator to fetch tasks
//! - Global concurrency limiting via a semaphore
//! - The randomized delay inserted before each request

use crate::config::{CrawlMode, CrawlerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// One outstanding (or retried) fetch of a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// 1-based listing page number
    pub page: u32,

    /// The URL to fetch
    pub url: Url,

    /// Attempt number, starting at 1
    pub attempt: u32,
}

impl WorkItem {
    /// First attempt at a page
    pub fn new(page: u32, url: Url) -> Self {
        Self {
            page,
            url,
            attempt: 1,
        }
    }

    /// The same page and URL, one attempt later
    pub fn next_attempt(&self) -> Self {
        Self {
            page: self.page,
            url: self.url.clone(),
            attempt: self.attempt + 1,
        }
    }
}

/// Right to issue one request; dropping it frees the concurrency slot
pub struct FetchSlot {
    _permit: Option<OwnedSemaphorePermit>,
}

/// Scheduler hands out fetch slots
///
/// In bounded mode at most `parallelism` slots exist at once, and each slot
/// is handed out after a uniform random delay in `[0, random_delay]`. In
/// unbounded mode slots are handed out immediately.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches (bounded mode only)
    semaphore: Option<Arc<Semaphore>>,

    /// Upper bound of the pre-request delay
    random_delay: Duration,
}

impl Scheduler {
    pub fn new(config: &CrawlerConfig) -> Self {
        match config.mode {
            CrawlMode::Bounded => Self {
                semaphore: Some(Arc::new(Semaphore::new(config.parallelism as usize))),
                random_delay: config.random_delay(),
            },
            CrawlMode::Unbounded => Self {
                semaphore: None,
                random_delay: Duration::ZERO,
            },
        }
    }

    /// Waits for a free slot, then for the random pre-request delay
    pub async fn acquire(&self) -> FetchSlot {
        let permit = match &self.semaphore {
            Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
            None => None,
        };

        let delay = self.jitter();
        if !delay.is_zero() {
            tracing::trace!("Delaying request by {:?}", delay);
            tokio::time::sleep(delay).await;
        }

        FetchSlot { _permit: permit }
    }

    /// Draws the next pre-request delay
    pub fn jitter(&self) -> Duration {
        let max_ms = self.random_delay.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::random_range(0..=max_ms))
    }

    /// Free slots right now, `None` when concurrency is unbounded
    pub fn available_slots(&self) -> Option<usize> {
        self.semaphore.as_ref().map(|s| s.available_permits())
    }

    pub fn is_bounded(&self) -> bool {
        self.semaphore.is_some()
    }
}
