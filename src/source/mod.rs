//! PubMed access behind a small source trait.
//!
//! The [`PaperSource`] trait is the seam between the pipeline and the
//! network: the real implementation is [`PubMedClient`], and tests swap in
//! [`mock::MockSource`].

mod parse;
mod pubmed;

pub mod mock;

pub use mock::MockSource;
pub use parse::parse_fetch_response;
pub use pubmed::PubMedClient;

use async_trait::async_trait;

use crate::models::FetchReport;

/// Interface to a literature-metadata service.
#[async_trait]
pub trait PaperSource: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Resolve a free-text query to an ordered list of record identifiers.
    ///
    /// Returns at most `limit` identifiers, without duplicates. A blank query
    /// is rejected with [`SourceError::InvalidQuery`].
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SourceError>;

    /// Fetch and parse the records for the given identifiers.
    ///
    /// One unparseable record must not fail the batch; per-record problems
    /// are reported inside the returned [`FetchReport`].
    async fn fetch(&self, ids: &[String]) -> Result<FetchReport, SourceError>;
}

/// Errors that can occur while retrieving or exporting records
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The query was empty or all whitespace
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// API error from the service
    #[error("API error: {0}")]
    Api(String),

    /// Parsing error (XML, JSON, CSV)
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error (output destination)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<quick_xml::DeError> for SourceError {
    fn from(err: quick_xml::DeError) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(e) => SourceError::Io(e),
            other => SourceError::Parse(format!("CSV: {:?}", other)),
        }
    }
}
