//! Integration tests for the resolve -> fetch -> classify -> export pipeline.

use pubmed_papers::classify::{AffiliationClassifier, Verdict};
use pubmed_papers::export::{self, OutputRow, CSV_HEADERS};
use pubmed_papers::models::{Author, FetchReport, PaperRecordBuilder, RecordFailure};
use pubmed_papers::source::{MockSource, PaperSource, PubMedClient, SourceError};
use pubmed_papers::pipeline;

const ESEARCH_JSON: &str = r#"{"esearchresult": {"idlist": ["31452104", "31307181"]}}"#;

const EFETCH_XML: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID Version="1">31452104</PMID>
      <Article>
        <Journal>
          <JournalIssue>
            <PubDate><Year>2019</Year><Month>Aug</Month></PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>Targeted therapy outcomes.</ArticleTitle>
        <AuthorList>
          <Author>
            <LastName>Doe</LastName>
            <ForeName>John</ForeName>
            <AffiliationInfo>
              <Affiliation>Oncology Unit, Pharma Corp Ltd. john.doe@pharmacorp.com.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author>
            <LastName>Smith</LastName>
            <ForeName>Jane</ForeName>
            <AffiliationInfo>
              <Affiliation>Department of Medicine, State University</Affiliation>
            </AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <Article>
        <ArticleTitle>Article missing its identifier.</ArticleTitle>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

/// Scenario from the pipeline contract: one good record, one malformed
/// record, the batch still succeeds with a reduced result set.
#[tokio::test]
async fn test_partial_failure_is_partial_success() {
    let source = MockSource::new();
    source.set_search_response(vec!["1".to_string(), "2".to_string()]);
    source.set_fetch_response(FetchReport::new(
        vec![PaperRecordBuilder::new("1")
            .title("Good record")
            .publication_date("2024")
            .author(Author::with_affiliation("Doe, John", "Acme Biotech Inc"))
            .build()],
        vec![RecordFailure::new(1, "article has no PMID")],
    ));
    let classifier = AffiliationClassifier::default();

    let output = pipeline::run(&source, &classifier, "cancer research", 10)
        .await
        .unwrap();

    assert_eq!(output.papers.len(), 1);
    assert_eq!(output.failures.len(), 1);

    let rows = output.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].identifier, "1");
    assert_eq!(rows[0].industry_affiliated_authors, "Doe, John");
}

#[tokio::test]
async fn test_blank_query_is_a_validation_error() {
    let source = MockSource::new();
    let classifier = AffiliationClassifier::default();

    let err = pipeline::run(&source, &classifier, "   ", 10)
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::InvalidQuery(_)));
}

/// Zero matches is success: a header-only file, not an error.
#[tokio::test]
async fn test_empty_result_writes_header_only_file() {
    let source = MockSource::new();
    let classifier = AffiliationClassifier::default();

    let output = pipeline::run(&source, &classifier, "gibberish zzzz", 10)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    export::write_csv_file(&path, &output.rows()).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content.trim_end(),
        "identifier,title,publicationDate,industryAffiliatedAuthors,correspondingEmail"
    );
}

#[tokio::test]
async fn test_classifier_end_to_end_verdicts() {
    let source = MockSource::new();
    source.set_search_response(vec!["7".to_string()]);
    source.set_fetch_response(FetchReport::new(
        vec![PaperRecordBuilder::new("7")
            .author(Author::with_affiliation("Doe, John", "Dept. of Oncology, Pharma Corp Ltd"))
            .author(Author::with_affiliation(
                "Smith, Jane",
                "Department of Medicine, State University",
            ))
            .author(Author::new("Anon, A"))
            .build()],
        vec![],
    ));
    let classifier = AffiliationClassifier::default();

    let output = pipeline::run(&source, &classifier, "oncology", 10)
        .await
        .unwrap();
    let paper = &output.papers[0];

    assert_eq!(
        paper.verdicts,
        vec![Verdict::Industry, Verdict::Academic, Verdict::Unclassifiable]
    );
    assert_eq!(paper.industry_authors, vec!["Doe, John"]);
    assert_eq!(paper.companies, vec!["Dept. of Oncology, Pharma Corp Ltd"]);
}

/// Export then re-read: same row count, same field values, exact header.
#[test]
fn test_exporter_round_trip() {
    let classifier = AffiliationClassifier::default();
    let rows: Vec<OutputRow> = (0..10)
        .map(|i| {
            let record = PaperRecordBuilder::new(format!("{}", 1000 + i))
                .title(format!("Paper {}, with a comma and \"quotes\"", i))
                .publication_date("2023/Jan")
                .author(Author::with_affiliation("Doe, John", "Pharma Corp"))
                .corresponding_email("doe@corp.example")
                .build();
            OutputRow::from(&classifier.classify_record(record))
        })
        .collect();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("papers.csv");
    export::write_csv_file(&path, &rows).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADERS.to_vec());

    let read_back: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(read_back.len(), rows.len());
    for (record, row) in read_back.iter().zip(&rows) {
        assert_eq!(&record[0], row.identifier.as_str());
        assert_eq!(&record[1], row.title.as_str());
        assert_eq!(&record[2], row.publication_date.as_str());
        assert_eq!(&record[3], row.industry_affiliated_authors.as_str());
        assert_eq!(&record[4], row.corresponding_email.as_str());
    }
}

#[tokio::test]
async fn test_pubmed_client_search_against_stub_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/esearch.fcgi")
        .match_query(mockito::Matcher::UrlEncoded(
            "term".into(),
            "cancer research".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ESEARCH_JSON)
        .create_async()
        .await;

    let client = PubMedClient::with_base_urls(
        format!("{}/esearch.fcgi", server.url()),
        format!("{}/efetch.fcgi", server.url()),
    );

    let ids = client.search("cancer research", 10).await.unwrap();
    assert_eq!(ids, vec!["31452104", "31307181"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_pubmed_client_search_respects_limit_and_dedups() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/esearch.fcgi")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"esearchresult": {"idlist": ["1", "1", "2", "3"]}}"#)
        .create_async()
        .await;

    let client = PubMedClient::with_base_urls(
        format!("{}/esearch.fcgi", server.url()),
        format!("{}/efetch.fcgi", server.url()),
    );

    let ids = client.search("cancer research", 2).await.unwrap();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn test_pubmed_client_fetch_against_stub_server() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/efetch.fcgi")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(EFETCH_XML)
        .create_async()
        .await;

    let client = PubMedClient::with_base_urls(
        format!("{}/esearch.fcgi", server.url()),
        format!("{}/efetch.fcgi", server.url()),
    );

    let ids = vec!["31452104".to_string(), "31307181".to_string()];
    let report = client.fetch(&ids).await.unwrap();

    // One article parses, the PMID-less one is a per-record failure
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.total(), ids.len());

    let record = &report.records[0];
    assert_eq!(record.pmid, "31452104");
    assert_eq!(record.publication_date, "2019/Aug");
    assert_eq!(
        record.corresponding_email.as_deref(),
        Some("john.doe@pharmacorp.com")
    );
}

#[tokio::test]
async fn test_pubmed_client_surfaces_client_errors() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/esearch.fcgi")
        .match_query(mockito::Matcher::Any)
        .with_status(400)
        .with_body("bad request")
        .create_async()
        .await;

    let client = PubMedClient::with_base_urls(
        format!("{}/esearch.fcgi", server.url()),
        format!("{}/efetch.fcgi", server.url()),
    );

    let err = client.search("cancer", 10).await.unwrap_err();
    assert!(matches!(err, SourceError::Api(_)));
}

/// Full pipeline against the stub server, then export.
#[tokio::test]
async fn test_end_to_end_with_stub_server() {
    let mut server = mockito::Server::new_async().await;
    let _search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(ESEARCH_JSON)
        .create_async()
        .await;
    let _fetch = server
        .mock("GET", "/efetch.fcgi")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(EFETCH_XML)
        .create_async()
        .await;

    let client = PubMedClient::with_base_urls(
        format!("{}/esearch.fcgi", server.url()),
        format!("{}/efetch.fcgi", server.url()),
    );
    let classifier = AffiliationClassifier::default();

    let output = pipeline::run(&client, &classifier, "cancer research", 10)
        .await
        .unwrap();

    let rows = output.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(rows[0].identifier, "31452104");
    assert_eq!(rows[0].title, "Targeted therapy outcomes.");
    assert_eq!(rows[0].industry_affiliated_authors, "Doe, John");
    assert_eq!(rows[0].corresponding_email, "john.doe@pharmacorp.com");

    let mut buffer = Vec::new();
    export::write_csv(&mut buffer, &rows).unwrap();
    let written = String::from_utf8(buffer).unwrap();
    assert_eq!(written.lines().count(), 2);
    assert!(written.contains("31452104"));
}
