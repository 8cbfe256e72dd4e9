//! Crawler coordinator - main crawl orchestration logic
//!
//! This module turns a page count into a fetch/extract/aggregate pipeline:
//! - Building and checking every listing page URL up front
//! - Dispatching work items as tasks under the scheduler's ceiling
//! - Feeding fetched pages to the extractor and the aggregator
//! - Re-queueing transient failures according to the retry policy
//! - Waiting until every page is done or failed

use crate::config::{validate, Config};
use crate::crawler::aggregator::Aggregator;
use crate::crawler::extractor::{Record, RecordExtractor};
use crate::crawler::fetcher::{build_http_client, FetchResult, Fetcher};
use crate::crawler::retry::{RetryDecision, RetryPolicy};
use crate::crawler::scheduler::{Scheduler, WorkItem};
use crate::output::CrawlStatistics;
use crate::state::{PageState, PageTracker};
use crate::url::Site;
use crate::HarvestError;
use chrono::Utc;
use scraper::Html;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Everything a finished crawl run produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The drained result set, in arrival order
    pub records: Vec<Record>,

    pub stats: CrawlStatistics,
}

/// How one dispatched unit of work ended
#[derive(Debug)]
enum PageOutcome {
    /// Page fetched; its records are already in the aggregator
    Done {
        page: u32,
        attempt: u32,
        extracted: usize,
    },

    /// Transient failure; dispatch `item` again after `after`
    Retry { item: WorkItem, after: Duration },

    /// Page abandoned
    Failed { page: u32 },
}

/// Shared pieces every fetch task needs
struct Pipeline {
    fetcher: Fetcher,
    scheduler: Scheduler,
    extractor: RecordExtractor,
    retry_policy: RetryPolicy,
    aggregator: Aggregator,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    site: Site,
    fetcher: Fetcher,
    scheduler: Scheduler,
    extractor: RecordExtractor,
    retry_policy: RetryPolicy,
}

impl Coordinator {
    /// Creates a new coordinator for a site
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration (validated here)
    /// * `site` - Listing URL template and allow-list
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - Invalid config, selectors, or HTTP client
    pub fn new(config: Config, site: Site) -> Result<Self, HarvestError> {
        validate(&config)?;

        let client = build_http_client(&config.user_agent, site.requires_https())?;
        let fetcher = Fetcher::new(client, site.clone());
        let scheduler = Scheduler::new(&config.crawler);
        let retry_policy = RetryPolicy::from_config(&config.crawler);
        let extractor = RecordExtractor::new()?;

        Ok(Self {
            config: Arc::new(config),
            site,
            fetcher,
            scheduler,
            extractor,
            retry_policy,
        })
    }

    /// Builds the first-attempt work item of every page
    ///
    /// Fails before anything is dispatched if the page count is zero or a
    /// page URL falls outside the allow-list.
    pub fn work_items(&self, page_count: u32) -> Result<Vec<WorkItem>, HarvestError> {
        if page_count < 1 {
            return Err(HarvestError::InvalidPageCount(page_count));
        }

        (1..=page_count)
            .map(|page| {
                let url = self.site.page_url(page);
                if !self.site.is_allowed(&url) {
                    return Err(HarvestError::DomainNotAllowed {
                        url: url.to_string(),
                    });
                }
                Ok(WorkItem::new(page, url))
            })
            .collect()
    }

    /// Runs a crawl over pages `1..=page_count`
    ///
    /// Returns once every page is `Done` or `Failed`. Only validation and
    /// structural errors abort the run; fetch failures are handled per page.
    pub async fn run(&self, page_count: u32) -> Result<CrawlReport, HarvestError> {
        let items = self.work_items(page_count)?;
        let started_at = Utc::now();

        tracing::info!(
            "Starting crawl of {} page(s) from {} ({:?} mode)",
            page_count,
            self.site.listing_url(),
            self.config.crawler.mode
        );

        let pipeline = Arc::new(Pipeline {
            fetcher: self.fetcher.clone(),
            scheduler: self.scheduler.clone(),
            extractor: self.extractor.clone(),
            retry_policy: self.retry_policy.clone(),
            aggregator: Aggregator::new(),
        });

        let mut tracker = PageTracker::new(page_count);
        let mut queue: VecDeque<(WorkItem, Duration)> =
            items.into_iter().map(|item| (item, Duration::ZERO)).collect();
        let mut tasks = JoinSet::new();
        let mut retries = 0;

        loop {
            while let Some((item, backoff)) = queue.pop_front() {
                if item.attempt == 1 {
                    tracker.transition(item.page, PageState::InFlight { attempt: 1 })?;
                }
                tracing::debug!(
                    "Dispatching page {} (attempt {}): {}",
                    item.page,
                    item.attempt,
                    item.url
                );
                tasks.spawn(process_page(Arc::clone(&pipeline), item, backoff));
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };

            match joined? {
                PageOutcome::Done {
                    page,
                    attempt,
                    extracted,
                } => {
                    tracker.transition(page, PageState::Done)?;
                    if attempt > 1 {
                        tracing::info!("Successfully retried page {} on attempt {}", page, attempt);
                    }
                    tracing::debug!("Page {} yielded {} records", page, extracted);
                }
                PageOutcome::Retry { item, after } => {
                    tracker.transition(
                        item.page,
                        PageState::InFlight {
                            attempt: item.attempt,
                        },
                    )?;
                    retries += 1;
                    queue.push_back((item, after));
                }
                PageOutcome::Failed { page } => {
                    tracker.transition(page, PageState::Failed)?;
                }
            }
        }

        debug_assert!(tracker.is_complete());

        let records = pipeline.aggregator.drain();
        let stats = CrawlStatistics {
            pages_requested: page_count,
            pages_done: tracker.count(PageState::is_success) as u32,
            pages_failed: tracker.count(|s| *s == PageState::Failed) as u32,
            retries,
            records: records.len(),
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl completed: {} records from {} page(s), {} failed, {} retries in {}ms",
            stats.records,
            stats.pages_done,
            stats.pages_failed,
            stats.retries,
            stats.duration().num_milliseconds()
        );

        Ok(CrawlReport { records, stats })
    }
}

/// Processes one work item: backoff, slot, fetch, then extract or classify
async fn process_page(pipeline: Arc<Pipeline>, item: WorkItem, backoff: Duration) -> PageOutcome {
    if !backoff.is_zero() {
        tokio::time::sleep(backoff).await;
    }

    let _slot = pipeline.scheduler.acquire().await;
    let result = pipeline.fetcher.fetch(&item.url).await;

    match result {
        FetchResult::Success { body, .. } => {
            // Html is not Send; keep it out of any await
            let records: Vec<Record> = {
                let document = Html::parse_document(&body);
                pipeline.extractor.extract(&document).collect()
            };
            let extracted = records.len();
            pipeline.aggregator.extend(records);

            PageOutcome::Done {
                page: item.page,
                attempt: item.attempt,
                extracted,
            }
        }
        failure => match pipeline.retry_policy.on_failure(&item, &failure) {
            RetryDecision::RetryAfter(after) => {
                tracing::warn!(
                    "Service unavailable for {} (attempt {}), retrying in {:?}",
                    item.url,
                    item.attempt,
                    after
                );
                PageOutcome::Retry {
                    item: item.next_attempt(),
                    after,
                }
            }
            RetryDecision::Drop => {
                if RetryPolicy::is_transient(&failure) {
                    tracing::error!(
                        "Giving up on {} after {} attempts: {}",
                        item.url,
                        item.attempt,
                        failure
                    );
                } else {
                    tracing::error!("Failed to load {}: {}", item.url, failure);
                }
                PageOutcome::Failed { page: item.page }
            }
        },
    }
}
