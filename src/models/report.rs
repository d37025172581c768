//! Per-record outcome accounting for a batch fetch.

use serde::{Deserialize, Serialize};

use crate::models::PaperRecord;

/// Why an individual record was dropped from a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFailure {
    /// PMID, when the payload carried one
    pub pmid: Option<String>,

    /// Position of the article within the fetched payload
    pub index: usize,

    /// Human-readable reason
    pub reason: String,
}

impl RecordFailure {
    /// Create a failure marker for the article at `index`
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            pmid: None,
            index,
            reason: reason.into(),
        }
    }

    /// Attach the PMID the payload carried
    pub fn pmid(mut self, pmid: impl Into<String>) -> Self {
        self.pmid = Some(pmid.into());
        self
    }
}

/// Outcome of fetching and parsing one batch of identifiers.
///
/// Per-record problems land in `failures` instead of aborting the batch;
/// `records` plus `failures` accounts for every article in the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchReport {
    /// Successfully parsed records, in payload order
    pub records: Vec<PaperRecord>,

    /// Articles that could not be parsed
    pub failures: Vec<RecordFailure>,
}

impl FetchReport {
    /// Create a report from parsed records and failure markers
    pub fn new(records: Vec<PaperRecord>, failures: Vec<RecordFailure>) -> Self {
        Self { records, failures }
    }

    /// Total number of articles accounted for
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }

    /// Whether every article in the batch parsed cleanly
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
