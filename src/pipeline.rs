//! Linear resolve -> fetch -> classify orchestration.

use crate::classify::{AffiliationClassifier, ClassifiedPaper};
use crate::export::OutputRow;
use crate::models::RecordFailure;
use crate::source::{PaperSource, SourceError};

/// Result of one pipeline run: classified papers ready for export plus the
/// records that were dropped along the way.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    /// Classified papers in retrieval order
    pub papers: Vec<ClassifiedPaper>,

    /// Records skipped because their payload could not be parsed
    pub failures: Vec<RecordFailure>,
}

impl PipelineOutput {
    /// Flatten the papers into exportable rows
    pub fn rows(&self) -> Vec<OutputRow> {
        self.papers.iter().map(OutputRow::from).collect()
    }
}

/// Run the full pipeline for one query.
///
/// Per-record failures are logged and collected in the output; only a blank
/// query, a search-stage failure, or a wholesale fetch failure aborts the
/// run.
pub async fn run(
    source: &dyn PaperSource,
    classifier: &AffiliationClassifier,
    query: &str,
    limit: usize,
) -> Result<PipelineOutput, SourceError> {
    if query.trim().is_empty() {
        return Err(SourceError::InvalidQuery(
            "query cannot be empty or whitespace".to_string(),
        ));
    }

    let ids = source.search(query, limit).await?;
    tracing::info!(count = ids.len(), source = source.name(), "resolved identifiers");

    let report = source.fetch(&ids).await?;
    for failure in &report.failures {
        tracing::warn!(
            pmid = failure.pmid.as_deref().unwrap_or("unknown"),
            index = failure.index,
            reason = %failure.reason,
            "skipping record"
        );
    }

    let papers: Vec<ClassifiedPaper> = report
        .records
        .into_iter()
        .map(|record| classifier.classify_record(record))
        .collect();

    for paper in &papers {
        if paper.has_industry_authors() {
            tracing::debug!(
                pmid = %paper.record.pmid,
                authors = %paper.industry_authors.join("; "),
                companies = %paper.companies.join("; "),
                "industry-affiliated authors"
            );
        }
    }

    Ok(PipelineOutput {
        papers,
        failures: report.failures,
    })
}
