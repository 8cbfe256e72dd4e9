//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client with the configured user agent string
//! - Refusing URLs outside the site's allow-list
//! - GET requests for listing pages
//! - Classifying failures so the retry policy can act on them

use crate::config::UserAgentConfig;
use crate::url::Site;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },

    /// URL is outside the allow-list; no request was made
    Disallowed {
        /// The refused URL
        url: String,
    },
}

impl FetchResult {
    /// HTTP status code of the response, if one was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success { status_code, .. } | Self::HttpError { status_code } => {
                Some(*status_code)
            }
            Self::NetworkError { .. } | Self::Disallowed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { status_code, body } => {
                write!(f, "HTTP {} ({} bytes)", status_code, body.len())
            }
            Self::HttpError { status_code } => write!(f, "HTTP {}", status_code),
            Self::NetworkError { error } => write!(f, "network error: {}", error),
            Self::Disallowed { url } => write!(f, "{} is not in the allow-list", url),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `https_only` - Refuse plain HTTP requests
///
/// # Example
///
/// ```no_run
/// use hn_harvest::config::UserAgentConfig;
/// use hn_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), true).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    https_only: bool,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.value.as_str())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .https_only(https_only)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | Success |
/// | Any other status | HttpError |
/// | Timeout / connect / body read failure | NetworkError |
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Page fetcher bound to one site
///
/// Every URL is checked against the site's allow-list before a request is
/// issued, so no other domain is ever contacted.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    site: Site,
}

impl Fetcher {
    pub fn new(client: Client, site: Site) -> Self {
        Self { client, site }
    }

    /// Fetches one page, or refuses it if its host is not allow-listed
    pub async fn fetch(&self, url: &Url) -> FetchResult {
        if !self.site.is_allowed(url) {
            return FetchResult::Disallowed {
                url: url.to_string(),
            };
        }

        tracing::trace!("GET {}", url);
        fetch_url(&self.client, url).await
    }

    pub fn site(&self) -> &Site {
        &self.site
    }
}
