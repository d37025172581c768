//! Parsing of PubMed efetch XML payloads.

use std::sync::LazyLock;

use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;

use crate::models::{Author, FetchReport, PaperRecord, PaperRecordBuilder, RecordFailure};
use crate::source::SourceError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("email regex is valid"));

#[derive(Debug, Deserialize)]
struct PubmedArticleSet {
    #[serde(rename = "PubmedArticle", default)]
    articles: Vec<PubmedArticle>,
}

#[derive(Debug, Deserialize)]
struct PubmedArticle {
    #[serde(rename = "MedlineCitation")]
    medline_citation: Option<MedlineCitation>,
}

#[derive(Debug, Deserialize)]
struct MedlineCitation {
    #[serde(rename = "PMID")]
    pmid: Option<TextNode>,
    #[serde(rename = "Article")]
    article: Option<Article>,
}

/// Element whose text content is all we care about. PMID carries a Version
/// attribute and titles can hold inline markup, so the text is pulled out
/// explicitly instead of deserializing the element as a plain string.
#[derive(Debug, Deserialize)]
struct TextNode {
    #[serde(rename = "$text", default)]
    value: Option<String>,
}

impl TextNode {
    fn text(&self) -> Option<String> {
        self.value
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(rename = "ArticleTitle")]
    title: Option<TextNode>,
    #[serde(rename = "Journal")]
    journal: Option<Journal>,
    #[serde(rename = "AuthorList")]
    author_list: Option<AuthorList>,
}

#[derive(Debug, Deserialize)]
struct Journal {
    #[serde(rename = "JournalIssue")]
    journal_issue: Option<JournalIssue>,
}

#[derive(Debug, Deserialize)]
struct JournalIssue {
    #[serde(rename = "PubDate")]
    pub_date: Option<PubDate>,
}

#[derive(Debug, Deserialize)]
struct PubDate {
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Month")]
    month: Option<String>,
    #[serde(rename = "Day")]
    day: Option<String>,
    #[serde(rename = "MedlineDate")]
    medline_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorList {
    #[serde(rename = "Author", default)]
    authors: Vec<XmlAuthor>,
}

#[derive(Debug, Deserialize)]
struct XmlAuthor {
    #[serde(rename = "LastName")]
    last_name: Option<TextNode>,
    #[serde(rename = "ForeName")]
    fore_name: Option<TextNode>,
    #[serde(rename = "CollectiveName")]
    collective_name: Option<TextNode>,
    #[serde(rename = "AffiliationInfo", default)]
    affiliations: Vec<AffiliationInfo>,
}

#[derive(Debug, Deserialize)]
struct AffiliationInfo {
    #[serde(rename = "Affiliation")]
    affiliation: Option<TextNode>,
}

/// Parse an efetch response document into per-article outcomes.
///
/// A payload that is not well-formed XML fails wholesale; an article missing
/// its citation or PMID becomes a [`RecordFailure`] without affecting its
/// siblings.
pub fn parse_fetch_response(xml: &str) -> Result<FetchReport, SourceError> {
    let set: PubmedArticleSet = from_str(xml)
        .map_err(|e| SourceError::Parse(format!("Failed to parse efetch XML: {}", e)))?;

    let mut records = Vec::new();
    let mut failures = Vec::new();

    for (index, article) in set.articles.iter().enumerate() {
        match convert_article(article, index) {
            Ok(record) => records.push(record),
            Err(failure) => {
                tracing::debug!(index, reason = %failure.reason, "unparseable article");
                failures.push(failure);
            }
        }
    }

    Ok(FetchReport::new(records, failures))
}

fn convert_article(article: &PubmedArticle, index: usize) -> Result<PaperRecord, RecordFailure> {
    let citation = article
        .medline_citation
        .as_ref()
        .ok_or_else(|| RecordFailure::new(index, "article has no MedlineCitation"))?;

    let pmid = citation
        .pmid
        .as_ref()
        .and_then(TextNode::text)
        .ok_or_else(|| RecordFailure::new(index, "article has no PMID"))?;

    let mut builder = PaperRecordBuilder::new(pmid);

    if let Some(meta) = citation.article.as_ref() {
        if let Some(title) = meta.title.as_ref().and_then(TextNode::text) {
            builder = builder.title(title);
        }
        builder = builder.publication_date(format_pub_date(meta));

        let mut email = None;
        for xml_author in meta.author_list.iter().flat_map(|l| l.authors.iter()) {
            if let Some(author) = convert_author(xml_author) {
                if let Some(found) = author.affiliation.as_deref().and_then(find_email) {
                    email = Some(found);
                }
                builder = builder.author(author);
            }
        }
        if let Some(email) = email {
            builder = builder.corresponding_email(email);
        }
    }

    Ok(builder.build())
}

fn convert_author(author: &XmlAuthor) -> Option<Author> {
    let affiliation = author
        .affiliations
        .iter()
        .find_map(|a| a.affiliation.as_ref().and_then(TextNode::text));

    let name = if let Some(collective) = author.collective_name.as_ref().and_then(TextNode::text) {
        collective
    } else {
        let last = author.last_name.as_ref().and_then(TextNode::text);
        let fore = author.fore_name.as_ref().and_then(TextNode::text);
        match (last, fore) {
            (Some(last), Some(fore)) => format!("{}, {}", last, fore),
            (Some(last), None) => last,
            (None, Some(fore)) => fore,
            (None, None) => return None,
        }
    };

    Some(Author { name, affiliation })
}

/// Join the PubDate parts that are present ("2024/May/17", "2024/May",
/// "2024"), falling back to the free-form MedlineDate when the structured
/// fields are absent.
fn format_pub_date(article: &Article) -> String {
    let Some(pub_date) = article
        .journal
        .as_ref()
        .and_then(|j| j.journal_issue.as_ref())
        .and_then(|i| i.pub_date.as_ref())
    else {
        return String::new();
    };

    let parts: Vec<&str> = [
        pub_date.year.as_deref(),
        pub_date.month.as_deref(),
        pub_date.day.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .collect();

    if parts.is_empty() {
        pub_date
            .medline_date
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string()
    } else {
        parts.join("/")
    }
}

/// Extract an email address from affiliation text, if one is present.
/// Affiliations often end "Electronic address: x@y.org." with a trailing dot.
fn find_email(text: &str) -> Option<String> {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().trim_end_matches('.').to_string())
}
