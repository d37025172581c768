//! Mock source for testing purposes.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::FetchReport;
use crate::source::{PaperSource, SourceError};

/// A mock source that returns predefined responses.
#[derive(Debug, Default)]
pub struct MockSource {
    search_response: Mutex<Option<Vec<String>>>,
    fetch_response: Mutex<Option<FetchReport>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifiers returned by `search`.
    pub fn set_search_response(&self, ids: Vec<String>) {
        let mut guard = self.search_response.lock().unwrap();
        *guard = Some(ids);
    }

    /// Set the report returned by `fetch`.
    pub fn set_fetch_response(&self, report: FetchReport) {
        let mut guard = self.fetch_response.lock().unwrap();
        *guard = Some(report);
    }

    /// Clear both configured responses.
    pub fn clear_responses(&self) {
        *self.search_response.lock().unwrap() = None;
        *self.fetch_response.lock().unwrap() = None;
    }
}

#[async_trait]
impl PaperSource for MockSource {
    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<String>, SourceError> {
        let guard = self.search_response.lock().unwrap();
        Ok(guard.clone().unwrap_or_default())
    }

    async fn fetch(&self, _ids: &[String]) -> Result<FetchReport, SourceError> {
        let guard = self.fetch_response.lock().unwrap();
        Ok(guard.clone().unwrap_or_default())
    }
}
