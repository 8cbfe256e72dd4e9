//! Record extraction from Hacker News listing pages
//!
//! A listing page is a table of `tr.athing` rows. Each row carries its title
//! anchor inside a `.titleline` span; the anchor's text is the title and its
//! `href` is the link.

use crate::HarvestError;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Selector for one listing row
pub const ROW_SELECTOR: &str = "tr.athing";

/// Selector (relative to a row) for the title anchor
pub const TITLE_LINK_SELECTOR: &str = ".titleline a";

/// One listing entry
///
/// Both fields are non-empty; values are kept exactly as found in the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct Record {
    title: String,
    link: String,
}

/// Unchecked wire form of a record; only converted through `Record::new`
#[derive(Deserialize)]
struct RawRecord {
    title: String,
    link: String,
}

impl TryFrom<RawRecord> for Record {
    type Error = String;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        Record::new(raw.title, raw.link)
            .ok_or_else(|| "record title and link must both be non-empty".to_string())
    }
}

impl Record {
    /// Creates a record, or `None` if either field is empty
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Option<Self> {
        let title = title.into();
        let link = link.into();
        if title.is_empty() || link.is_empty() {
            return None;
        }
        Some(Self { title, link })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &str {
        &self.link
    }
}

/// Pulls records out of parsed listing documents
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    row: Selector,
    title_link: Selector,
}

impl RecordExtractor {
    /// Extractor for the Hacker News listing markup
    pub fn new() -> Result<Self, HarvestError> {
        Self::with_selectors(ROW_SELECTOR, TITLE_LINK_SELECTOR)
    }

    /// Extractor for custom row/anchor selectors
    pub fn with_selectors(row: &str, title_link: &str) -> Result<Self, HarvestError> {
        Ok(Self {
            row: compile(row)?,
            title_link: compile(title_link)?,
        })
    }

    /// Lazily yields one record per row that has both a title and a link
    ///
    /// Only the first matching anchor of a row is used, so the site label
    /// link next to the title never leaks into the record.
    pub fn extract<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = Record> + 'a {
        document.select(&self.row).filter_map(move |row| {
            let anchor = row.select(&self.title_link).next()?;
            let title: String = anchor.text().collect();
            let link = anchor.value().attr("href").unwrap_or_default();
            Record::new(title, link)
        })
    }

    /// Parses an HTML string and collects its records
    pub fn extract_from_html(&self, html: &str) -> Vec<Record> {
        let document = Html::parse_document(html);
        self.extract(&document).collect()
    }
}

fn compile(selector: &str) -> Result<Selector, HarvestError> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
