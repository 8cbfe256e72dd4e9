//! Shared, append-only collection of extracted records
//!
//! Every fetch task appends through the same mutex, so concurrent appends
//! are serialized and none is lost. The collection only grows until the
//! coordinator drains it after the last task has finished.

use crate::crawler::extractor::Record;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    records: Arc<Mutex<Vec<Record>>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: Record) {
        self.lock().push(record);
    }

    /// Appends a page's records in one critical section
    ///
    /// Records of one page stay contiguous and in page order.
    pub fn extend<I>(&self, records: I)
    where
        I: IntoIterator<Item = Record>,
    {
        self.lock().extend(records);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes the accumulated records in arrival order
    ///
    /// Meant to be called once, after every writer has finished.
    pub fn drain(&self) -> Vec<Record> {
        std::mem::take(&mut *self.lock())
    }

    // A panicking writer cannot leave a half-pushed Vec behind, so the data
    // behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Vec<Record>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
