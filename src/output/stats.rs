//! Crawl statistics
//!
//! Counters collected by the coordinator over one run, plus the summary
//! printed when the harvester finishes.

use chrono::{DateTime, Utc};
use std::path::Path;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of listing pages requested
    pub pages_requested: u32,

    /// Pages fetched and extracted
    pub pages_done: u32,

    /// Pages dropped after a permanent failure or exhausted retries
    pub pages_failed: u32,

    /// Number of re-dispatches after a transient failure
    pub retries: u32,

    /// Records in the final result set
    pub records: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlStatistics {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Every requested page resolved to done or failed
    pub fn is_complete(&self) -> bool {
        self.pages_done + self.pages_failed == self.pages_requested
    }

    /// One-line outcome shown to the operator
    pub fn summary_line(&self, output_path: &Path) -> String {
        format!(
            "Scraped {} items from {} page(s), saved to {}",
            self.records,
            self.pages_requested,
            output_path.display()
        )
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");
    println!("  Pages requested: {}", stats.pages_requested);
    println!("  Pages done:      {}", stats.pages_done);
    println!("  Pages failed:    {}", stats.pages_failed);
    println!("  Retries:         {}", stats.retries);
    println!("  Records:         {}", stats.records);
    println!(
        "  Duration:        {:.2}s",
        stats.duration().num_milliseconds() as f64 / 1000.0
    );
}
