//! Configuration module for hn-harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default matching the harvester's
//! built-in behavior, so an empty file (or no file at all) is valid.
//!
//! # Example
//!
//! ```no_run
//! use hn_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Parallelism: {}", config.crawler.parallelism);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlMode, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_OUTPUT_PATH,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
