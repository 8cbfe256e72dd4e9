//! hn-harvest main entry point
//!
//! This is the command-line interface for the Hacker News harvester.

use clap::Parser;
use hn_harvest::config::{load_config, Config, CrawlMode};
use hn_harvest::crawler::harvest;
use hn_harvest::output::{print_statistics, write_records};
use hn_harvest::url::Site;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// hn-harvest: a polite Hacker News front-page harvester
///
/// Fetches the requested number of listing pages concurrently, extracts
/// each entry's title and link, and saves them as a JSON array.
#[derive(Parser, Debug)]
#[command(name = "hn-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Harvest Hacker News listing pages into JSON", long_about = None)]
struct Cli {
    /// Number of Hacker News pages to scrape concurrently
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Output file (defaults to the config value, then hackernews.json)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Dispatch every page at once, without parallelism ceiling or delay
    #[arg(long)]
    unbounded: bool,

    /// Print crawl statistics after the summary line
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    let output_path = PathBuf::from(&config.output.path);

    let site = Site::hacker_news()?;

    let report = match harvest(config, site, cli.pages).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Scraping failed: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = write_records(&output_path, &report.records) {
        tracing::error!("Saving JSON failed: {}", e);
        return Err(e.into());
    }

    if !cli.quiet {
        println!("{}", report.stats.summary_line(&output_path));
        if cli.stats {
            println!();
            print_statistics(&report.stats);
        }
    }

    Ok(())
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }

    if cli.unbounded {
        config.crawler.mode = CrawlMode::Unbounded;
    }

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hn_harvest=info,warn"),
            1 => EnvFilter::new("hn_harvest=debug,info"),
            2 => EnvFilter::new("hn_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
