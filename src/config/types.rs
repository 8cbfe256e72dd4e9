use serde::Deserialize;
use std::time::Duration;

/// Default client identification string sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Default output file name
pub const DEFAULT_OUTPUT_PATH: &str = "hackernews.json";

/// Main configuration structure for hn-harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// How the coordinator dispatches page fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// Parallelism ceiling plus a random delay before each request
    #[default]
    Bounded,

    /// Every page is dispatched immediately, no ceiling and no delay
    Unbounded,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of fetches in flight at once (bounded mode only)
    pub parallelism: u32,

    /// Upper bound of the uniform random delay before each request (milliseconds)
    pub random_delay_ms: u64,

    /// Backoff before re-dispatching a page that answered 503 (milliseconds)
    pub retry_delay_ms: u64,

    /// Maximum attempts per page, 0 for unlimited
    pub max_attempts: u32,

    /// Dispatch mode
    pub mode: CrawlMode,
}

impl CrawlerConfig {
    pub fn random_delay(&self) -> Duration {
        Duration::from_millis(self.random_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            random_delay_ms: 1000,
            retry_delay_ms: 3000,
            max_attempts: 5,
            mode: CrawlMode::Bounded,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full `User-Agent` header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON file receiving the harvested records
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}
