//! Page state definitions for tracking crawl progress
use crate::HarvestError;
use std::collections::BTreeMap;
use std::fmt;

/// Represents the current state of a listing page in a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page is requested but not yet dispatched
    Pending,

    /// Page is being fetched (or waiting out a retry backoff)
    InFlight { attempt: u32 },

    // ===== Terminal States =====
    /// Page was fetched and its records extracted
    Done,

    /// Page was dropped after a permanent failure or exhausted retries
    Failed,
}

impl PageState {
    /// Returns true if no further processing will happen for this page
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// | From | To |
    /// |------|----|
    /// | Pending | InFlight(1) |
    /// | InFlight(n) | InFlight(n + 1), Done, Failed |
    pub fn can_transition_to(&self, next: &PageState) -> bool {
        match (self, next) {
            (Self::Pending, Self::InFlight { attempt }) => *attempt == 1,
            (Self::InFlight { attempt: current }, Self::InFlight { attempt }) => {
                *attempt == current + 1
            }
            (Self::InFlight { .. }, Self::Done | Self::Failed) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InFlight { .. } => "in_flight",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InFlight { attempt } => write!(f, "in_flight(attempt {})", attempt),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Per-page state for one crawl run, keyed by 1-based page number
#[derive(Debug, Clone, Default)]
pub struct PageTracker {
    pages: BTreeMap<u32, PageState>,
}

impl PageTracker {
    /// Creates a tracker with pages `1..=page_count` all `Pending`
    pub fn new(page_count: u32) -> Self {
        Self {
            pages: (1..=page_count).map(|p| (p, PageState::Pending)).collect(),
        }
    }

    /// Moves a page to a new state, enforcing the transition table
    pub fn transition(&mut self, page: u32, to: PageState) -> Result<(), HarvestError> {
        let from = self.state(page).unwrap_or(PageState::Pending);
        if !self.pages.contains_key(&page) || !from.can_transition_to(&to) {
            return Err(HarvestError::InvalidTransition { page, from, to });
        }
        self.pages.insert(page, to);
        Ok(())
    }

    pub fn state(&self, page: u32) -> Option<PageState> {
        self.pages.get(&page).copied()
    }

    /// Returns true once every page is `Done` or `Failed`
    pub fn is_complete(&self) -> bool {
        self.pages.values().all(PageState::is_terminal)
    }

    /// Number of pages currently in the given state category
    pub fn count(&self, predicate: impl Fn(&PageState) -> bool) -> usize {
        self.pages.values().filter(|s| predicate(*s)).count()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
