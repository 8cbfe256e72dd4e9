//! Output module for persisting harvested records and reporting on a run
//!
//! This module handles:
//! - Writing the result set as a pretty-printed JSON array
//! - Reading a written result file back
//! - Summarizing crawl statistics

mod json;
pub mod stats;

pub use json::{load_records, write_records};
pub use stats::{print_statistics, CrawlStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
