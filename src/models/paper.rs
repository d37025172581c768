//! Paper record model for PubMed metadata.

use serde::{Deserialize, Serialize};

/// A single author as listed on a PubMed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name ("Last, Fore" or a collective name)
    pub name: String,

    /// Free-text institutional affiliation, when the record carries one
    pub affiliation: Option<String>,
}

impl Author {
    /// Create an author without affiliation text
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: None,
        }
    }

    /// Create an author with affiliation text
    pub fn with_affiliation(name: impl Into<String>, affiliation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: Some(affiliation.into()),
        }
    }
}

/// A parsed PubMed record.
///
/// This is the standardized shape every record takes once its efetch payload
/// has been parsed; missing optional metadata is represented as empty values,
/// not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// PubMed identifier (PMID)
    pub pmid: String,

    /// Paper title (empty when the record carries none)
    pub title: String,

    /// Best-effort normalized publication date ("2024/05/17", "2024/May",
    /// "2024", or empty)
    pub publication_date: String,

    /// Authors in record order
    pub authors: Vec<Author>,

    /// Corresponding-author email, when one appears in an affiliation
    pub corresponding_email: Option<String>,
}

impl PaperRecord {
    /// Create a record with only its identifier set
    pub fn new(pmid: impl Into<String>) -> Self {
        Self {
            pmid: pmid.into(),
            title: String::new(),
            publication_date: String::new(),
            authors: Vec::new(),
            corresponding_email: None,
        }
    }

    /// Landing page URL for this record
    pub fn url(&self) -> String {
        format!("https://pubmed.ncbi.nlm.nih.gov/{}/", self.pmid)
    }

    /// Returns the author names in record order
    pub fn author_names(&self) -> Vec<&str> {
        self.authors.iter().map(|a| a.name.as_str()).collect()
    }
}

/// Builder for constructing PaperRecord objects
#[derive(Debug, Clone)]
pub struct PaperRecordBuilder {
    record: PaperRecord,
}

impl PaperRecordBuilder {
    /// Create a new builder for the given PMID
    pub fn new(pmid: impl Into<String>) -> Self {
        Self {
            record: PaperRecord::new(pmid),
        }
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.record.title = title.into();
        self
    }

    /// Set the publication date
    pub fn publication_date(mut self, date: impl Into<String>) -> Self {
        self.record.publication_date = date.into();
        self
    }

    /// Append an author
    pub fn author(mut self, author: Author) -> Self {
        self.record.authors.push(author);
        self
    }

    /// Set the corresponding-author email
    pub fn corresponding_email(mut self, email: impl Into<String>) -> Self {
        self.record.corresponding_email = Some(email.into());
        self
    }

    /// Build the PaperRecord
    pub fn build(self) -> PaperRecord {
        self.record
    }
}
