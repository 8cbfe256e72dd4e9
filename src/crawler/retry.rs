//! Retry policy for failed page fetches
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 503 with attempts left | Retry after the configured backoff (3s default) |
//! | HTTP 503 on the last allowed attempt | Drop |
//! | Any other HTTP status | Drop |
//! | Network error / disallowed URL | Drop |

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::FetchResult;
use crate::crawler::scheduler::WorkItem;
use reqwest::StatusCode;
use std::time::Duration;

/// What to do with a failed work item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-dispatch the same URL once the delay has elapsed
    RetryAfter(Duration),

    /// Abandon the page
    Drop,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    retry_delay: Duration,
    /// 0 means no cap
    max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(retry_delay: Duration, max_attempts: u32) -> Self {
        Self {
            retry_delay,
            max_attempts,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.retry_delay(), config.max_attempts)
    }

    /// Returns true for failures worth retrying (service unavailable)
    pub fn is_transient(failure: &FetchResult) -> bool {
        matches!(
            failure,
            FetchResult::HttpError { status_code } if *status_code == StatusCode::SERVICE_UNAVAILABLE.as_u16()
        )
    }

    /// Decides the fate of a work item whose fetch did not succeed
    pub fn on_failure(&self, item: &WorkItem, failure: &FetchResult) -> RetryDecision {
        if Self::is_transient(failure) && self.has_attempts_left(item.attempt) {
            RetryDecision::RetryAfter(self.retry_delay)
        } else {
            RetryDecision::Drop
        }
    }

    fn has_attempts_left(&self, attempt: u32) -> bool {
        self.max_attempts == 0 || attempt < self.max_attempts
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn max_attempts(&self) -> Option<u32> {
        (self.max_attempts > 0).then_some(self.max_attempts)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}
