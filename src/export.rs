//! CSV export of classified records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::classify::ClassifiedPaper;
use crate::source::SourceError;

/// Output column set, in order.
pub const CSV_HEADERS: [&str; 5] = [
    "identifier",
    "title",
    "publicationDate",
    "industryAffiliatedAuthors",
    "correspondingEmail",
];

/// One flattened output row per record. Industry-affiliated authors are
/// concatenated into a single field with "; ".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub identifier: String,
    pub title: String,
    pub publication_date: String,
    pub industry_affiliated_authors: String,
    pub corresponding_email: String,
}

impl From<&ClassifiedPaper> for OutputRow {
    fn from(paper: &ClassifiedPaper) -> Self {
        Self {
            identifier: paper.record.pmid.clone(),
            title: paper.record.title.clone(),
            publication_date: paper.record.publication_date.clone(),
            industry_affiliated_authors: paper.industry_authors.join("; "),
            corresponding_email: paper
                .record
                .corresponding_email
                .clone()
                .unwrap_or_default(),
        }
    }
}

/// Write a header row and one row per record to an arbitrary writer.
/// Quoting and escaping follow the CSV writer's RFC 4180 rules.
pub fn write_csv<W: Write>(writer: W, rows: &[OutputRow]) -> Result<(), SourceError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(CSV_HEADERS)?;
    for row in rows {
        csv_writer.write_record([
            row.identifier.as_str(),
            row.title.as_str(),
            row.publication_date.as_str(),
            row.industry_affiliated_authors.as_str(),
            row.corresponding_email.as_str(),
        ])?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Write rows to a file path. Fails with [`SourceError::Io`] when the
/// destination cannot be opened for writing.
pub fn write_csv_file(path: &Path, rows: &[OutputRow]) -> Result<(), SourceError> {
    let file = File::create(path)?;
    write_csv(file, rows)
}

/// Write rows to standard output.
pub fn write_csv_stdout(rows: &[OutputRow]) -> Result<(), SourceError> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), rows)
}
