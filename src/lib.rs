//! hn-harvest: a polite Hacker News front-page harvester
//!
//! This crate fetches a number of Hacker News listing pages under a bounded
//! concurrency budget, extracts `(title, link)` records from each page and
//! writes the aggregated result set as pretty-printed JSON.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for hn-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page count must be at least 1, got {0}")]
    InvalidPageCount(u32),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Domain not in allow-list: {url}")]
    DomainNotAllowed { url: String },

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid state transition for page {page}: {from:?} -> {to:?}")]
    InvalidTransition {
        page: u32,
        from: state::PageState,
        to: state::PageState,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for hn-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::crawler::{Coordinator, CrawlReport, Record};
pub use crate::state::PageState;
pub use crate::url::Site;
