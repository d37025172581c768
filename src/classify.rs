//! Affiliation keyword classifier.

use serde::{Deserialize, Serialize};

use crate::models::PaperRecord;

/// Default company keywords. Matching is case-insensitive.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "inc",
    "ltd",
    "corp",
    "corporation",
    "pharma",
    "biotech",
    "biopharma",
    "healthtech",
    "lab",
    "research institute",
    "company",
    "therapeutics",
    "healthcare",
];

/// Verdict for a single author's affiliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Affiliation text matched a company keyword
    Industry,
    /// Affiliation text present, no keyword matched
    Academic,
    /// No affiliation text to judge
    Unclassifiable,
}

impl Verdict {
    /// Whether this verdict counts as industry-affiliated
    pub fn is_industry(self) -> bool {
        matches!(self, Verdict::Industry)
    }
}

/// Flags authors as industry-affiliated from their affiliation text.
///
/// Matching is a case-insensitive substring check against the keyword list;
/// the verdict is a pure function of the affiliation text.
#[derive(Debug, Clone)]
pub struct AffiliationClassifier {
    keywords: Vec<String>,
}

impl Default for AffiliationClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied())
    }
}

impl AffiliationClassifier {
    /// Create a classifier from a keyword list. Keywords are lowercased;
    /// empty entries are discarded.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// The active keyword list
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Classify a single affiliation string.
    pub fn classify(&self, affiliation: Option<&str>) -> Verdict {
        let Some(text) = affiliation.map(str::trim).filter(|t| !t.is_empty()) else {
            return Verdict::Unclassifiable;
        };

        let lowered = text.to_lowercase();
        if self.keywords.iter().any(|k| lowered.contains(k.as_str())) {
            Verdict::Industry
        } else {
            Verdict::Academic
        }
    }

    /// Annotate a parsed record with per-author verdicts and the aggregated
    /// industry author/company lists.
    pub fn classify_record(&self, record: PaperRecord) -> ClassifiedPaper {
        let verdicts: Vec<Verdict> = record
            .authors
            .iter()
            .map(|a| self.classify(a.affiliation.as_deref()))
            .collect();

        let mut industry_authors = Vec::new();
        let mut companies = Vec::new();
        for (author, verdict) in record.authors.iter().zip(&verdicts) {
            if verdict.is_industry() {
                industry_authors.push(author.name.clone());
                if let Some(affiliation) = &author.affiliation {
                    companies.push(affiliation.clone());
                }
            }
        }

        ClassifiedPaper {
            record,
            verdicts,
            industry_authors,
            companies,
        }
    }
}

/// A record annotated with affiliation verdicts.
#[derive(Debug, Clone)]
pub struct ClassifiedPaper {
    /// The underlying parsed record
    pub record: PaperRecord,

    /// One verdict per author, in `record.authors` order
    pub verdicts: Vec<Verdict>,

    /// Names of industry-affiliated authors
    pub industry_authors: Vec<String>,

    /// Their affiliation strings
    pub companies: Vec<String>,
}

impl ClassifiedPaper {
    /// Whether any author was flagged as industry-affiliated
    pub fn has_industry_authors(&self) -> bool {
        !self.industry_authors.is_empty()
    }
}
