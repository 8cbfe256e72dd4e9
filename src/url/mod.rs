//! URL handling module for hn-harvest
//!
//! This module knows the target site: how listing page URLs are built and
//! which hosts the harvester may contact.

mod allow_list;

use crate::{UrlError, UrlResult};
use url::Url;

pub use allow_list::AllowList;

/// Listing endpoint of the built-in target site
pub const HACKER_NEWS_LISTING: &str = "https://news.ycombinator.com/news";

/// Host the built-in target site is restricted to
pub const HACKER_NEWS_DOMAIN: &str = "news.ycombinator.com";

/// Query parameter carrying the 1-based page number
const PAGE_PARAM: &str = "p";

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use hn_harvest::url::extract_domain;
///
/// let url = Url::parse("https://News.YCombinator.com/news?p=1").unwrap();
/// assert_eq!(extract_domain(&url), Some("news.ycombinator.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// The site being harvested: a paginated listing URL and a domain allow-list
#[derive(Debug, Clone)]
pub struct Site {
    listing_url: Url,
    allow_list: AllowList,
}

impl Site {
    /// The Hacker News front page, restricted to `news.ycombinator.com`
    pub fn hacker_news() -> UrlResult<Self> {
        Self::new(HACKER_NEWS_LISTING, [HACKER_NEWS_DOMAIN])
    }

    /// Builds a site from a listing URL and allow-listed domain patterns
    ///
    /// The listing URL is not required to be allow-listed here; the
    /// coordinator refuses to dispatch page URLs that fall outside the list.
    pub fn new<I, S>(listing_url: &str, allowed_domains: I) -> UrlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let listing_url = Url::parse(listing_url)
            .map_err(|e| UrlError::Parse(format!("{}: {}", listing_url, e)))?;
        if listing_url.host_str().is_none() {
            return Err(UrlError::MissingDomain);
        }

        Ok(Self {
            listing_url,
            allow_list: AllowList::new(allowed_domains)?,
        })
    }

    /// Builds the URL of a 1-based listing page, e.g. `.../news?p=3`
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.listing_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair(PAGE_PARAM, &page.to_string());
        url
    }

    /// Returns true if the URL may be fetched
    pub fn is_allowed(&self, url: &Url) -> bool {
        self.allow_list.permits(url)
    }

    /// Returns true if the listing is served over HTTPS
    pub fn requires_https(&self) -> bool {
        self.listing_url.scheme() == "https"
    }

    pub fn listing_url(&self) -> &Url {
        &self.listing_url
    }
}
