//! State module for tracking crawl progress
//!
//! Every requested listing page moves through `PageState` while the
//! coordinator works on it. `PageTracker` keeps the state of all pages of a
//! run and rejects transitions the state machine does not allow.

mod page_state;

// Re-export main types
pub use page_state::{PageState, PageTracker};
