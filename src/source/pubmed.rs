//! PubMed client using the NCBI E-utilities API.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::FetchReport;
use crate::source::{parse, PaperSource, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

/// PubMed E-utilities API base URLs
const PUBMED_ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
const PUBMED_EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// PubMed client
///
/// Resolves queries via `esearch` (JSON) and fetches record metadata via
/// `efetch` (XML), one batch request per run.
#[derive(Debug, Clone)]
pub struct PubMedClient {
    client: Arc<HttpClient>,
    esearch_url: String,
    efetch_url: String,
}

impl PubMedClient {
    /// Create a new PubMed client
    pub fn new() -> Self {
        Self {
            client: Arc::new(HttpClient::new()),
            esearch_url: PUBMED_ESEARCH_URL.to_string(),
            efetch_url: PUBMED_EFETCH_URL.to_string(),
        }
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            esearch_url: PUBMED_ESEARCH_URL.to_string(),
            efetch_url: PUBMED_EFETCH_URL.to_string(),
        }
    }

    /// Point the client at alternate endpoints (for testing against a stub server)
    pub fn with_base_urls(esearch_url: impl Into<String>, efetch_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(HttpClient::new()),
            esearch_url: esearch_url.into(),
            efetch_url: efetch_url.into(),
        }
    }

    /// Build the esearch URL for a query
    fn build_search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}?db=pubmed&term={}&retmode=json&retmax={}",
            self.esearch_url,
            urlencoding::encode(query),
            limit
        )
    }

    /// Build the efetch URL for a batch of PMIDs
    fn build_fetch_url(&self, ids: &[String]) -> String {
        format!(
            "{}?db=pubmed&id={}&retmode=xml",
            self.efetch_url,
            ids.join(",")
        )
    }

    /// Parse an esearch JSON response into identifiers
    fn parse_search_response(json: &str) -> Result<Vec<String>, SourceError> {
        #[derive(Debug, Deserialize)]
        struct ESearchResponse {
            esearchresult: ESearchResult,
        }

        #[derive(Debug, Deserialize)]
        struct ESearchResult {
            #[serde(default)]
            idlist: Vec<String>,
        }

        let response: ESearchResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Failed to parse esearch JSON: {}", e)))?;

        Ok(response.esearchresult.idlist)
    }

    /// GET a URL as text, retrying transient failures
    async fn get_text(&self, url: &str, endpoint: &str) -> Result<String, SourceError> {
        let client = Arc::clone(&self.client);
        let url = url.to_string();
        let endpoint = endpoint.to_string();

        with_retry(api_retry_config(), || {
            let client = Arc::clone(&client);
            let url = url.clone();
            let endpoint = endpoint.clone();
            async move {
                let response = client.get(&url).send().await.map_err(|e| {
                    SourceError::Network(format!("Failed to reach PubMed {}: {}", endpoint, e))
                })?;

                let status = response.status();
                if !status.is_success() {
                    // 5xx and 429 are worth another attempt; everything else is not
                    if status.is_server_error()
                        || status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    {
                        return Err(SourceError::Network(format!(
                            "PubMed {} returned status {}",
                            endpoint, status
                        )));
                    }
                    return Err(SourceError::Api(format!(
                        "PubMed {} returned status {}",
                        endpoint, status
                    )));
                }

                response.text().await.map_err(|e| {
                    SourceError::Network(format!(
                        "Failed to read PubMed {} response: {}",
                        endpoint, e
                    ))
                })
            }
        })
        .await
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaperSource for PubMedClient {
    fn name(&self) -> &str {
        "PubMed"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        if query.trim().is_empty() {
            return Err(SourceError::InvalidQuery(
                "query cannot be empty or whitespace".to_string(),
            ));
        }

        let url = self.build_search_url(query, limit);
        tracing::debug!(%query, limit, "searching PubMed");

        let json = self.get_text(&url, "search").await?;
        let mut ids = Self::parse_search_response(&json)?;

        // Drop duplicate identifiers, preserving order
        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));
        ids.truncate(limit);

        tracing::debug!(count = ids.len(), "resolved identifiers");
        Ok(ids)
    }

    async fn fetch(&self, ids: &[String]) -> Result<FetchReport, SourceError> {
        if ids.is_empty() {
            return Ok(FetchReport::default());
        }

        let url = self.build_fetch_url(ids);
        tracing::debug!(count = ids.len(), "fetching PubMed records");

        let xml = self.get_text(&url, "fetch").await?;
        let report = parse::parse_fetch_response(&xml)?;

        if report.total() != ids.len() {
            tracing::debug!(
                requested = ids.len(),
                returned = report.total(),
                "efetch returned a different number of articles than requested"
            );
        }

        Ok(report)
    }
}
