use super::extract_domain;
use crate::{UrlError, UrlResult};
use url::Url;

/// Set of domain patterns the harvester is permitted to contact
///
/// Patterns are either exact hosts (`news.ycombinator.com`) or wildcards
/// (`*.ycombinator.com`), where a wildcard also covers the bare base domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    patterns: Vec<String>,
}

impl AllowList {
    /// Builds an allow-list from domain patterns
    ///
    /// Patterns are lowercased. An empty pattern is rejected since it would
    /// never match a real host.
    pub fn new<I, S>(patterns: I) -> UrlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collected = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim().to_lowercase();
            if pattern.is_empty() || pattern == "*." {
                return Err(UrlError::Parse(
                    "allow-list pattern cannot be empty".to_string(),
                ));
            }
            collected.push(pattern);
        }
        Ok(Self {
            patterns: collected,
        })
    }

    /// Returns true if the URL's host matches one of the patterns
    pub fn permits(&self, url: &Url) -> bool {
        match extract_domain(url) {
            Some(host) => self.permits_host(&host),
            None => false,
        }
    }

    /// Returns true if a lowercase host matches one of the patterns
    pub fn permits_host(&self, host: &str) -> bool {
        self.patterns.iter().any(|pattern| match pattern.strip_prefix("*.") {
            Some(base) => {
                host == base
                    || host
                        .strip_suffix(base)
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
            None => host == pattern,
        })
    }
}
