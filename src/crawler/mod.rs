//! Crawler module for listing page fetching and processing
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching restricted to the site's allow-list
//! - Concurrency limiting and randomized request pacing
//! - Record extraction from listing HTML
//! - Retry of transient failures
//! - Thread-safe aggregation and overall crawl coordination

mod aggregator;
mod coordinator;
mod extractor;
mod fetcher;
mod retry;
mod scheduler;

pub use aggregator::Aggregator;
pub use coordinator::{Coordinator, CrawlReport};
pub use extractor::{Record, RecordExtractor, ROW_SELECTOR, TITLE_LINK_SELECTOR};
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher};
pub use retry::{RetryDecision, RetryPolicy};
pub use scheduler::{FetchSlot, Scheduler, WorkItem};

use crate::config::Config;
use crate::url::Site;
use crate::HarvestError;

/// Runs a complete harvest of `page_count` listing pages
///
/// This is the main entry point for a crawl. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Build and check every page URL
/// 3. Fetch pages under the concurrency ceiling, retrying 503s
/// 4. Extract and aggregate records
///
/// # Example
///
/// ```no_run
/// use hn_harvest::config::Config;
/// use hn_harvest::crawler::harvest;
/// use hn_harvest::url::Site;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = harvest(Config::default(), Site::hacker_news()?, 2).await?;
/// println!("{} records", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn harvest(
    config: Config,
    site: Site,
    page_count: u32,
) -> Result<CrawlReport, HarvestError> {
    let coordinator = Coordinator::new(config, site)?;
    coordinator.run(page_count).await
}
