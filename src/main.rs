use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pubmed_papers::classify::AffiliationClassifier;
use pubmed_papers::config::{find_config_file, load_config, Config};
use pubmed_papers::source::PubMedClient;
use pubmed_papers::{export, pipeline};

/// Fetch research papers from PubMed and flag industry-affiliated authors
#[derive(Parser, Debug)]
#[command(name = "get-papers-list")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch PubMed papers for a query and flag industry-affiliated authors", long_about = None)]
struct Cli {
    /// PubMed query
    query: String,

    /// Write results to this CSV file instead of standard output
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Enable debug logging (repeat for trace: -d, -dd)
    #[arg(long, short, action = clap::ArgAction::Count)]
    debug: u8,

    /// Maximum number of results to fetch (overrides config)
    #[arg(long, short)]
    max_results: Option<usize>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.debug {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Logs go to stderr; stdout is reserved for CSV output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("pubmed_papers={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => match find_config_file() {
            Some(path) => {
                tracing::info!("Using config file: {}", path.display());
                load_config(&path)
                    .with_context(|| format!("failed to load config from {}", path.display()))?
            }
            None => Config::default(),
        },
    };

    let limit = cli.max_results.unwrap_or(config.search.max_results);
    let classifier = AffiliationClassifier::new(&config.classifier.keywords);
    let client = PubMedClient::new();

    let output = pipeline::run(&client, &classifier, &cli.query, limit).await?;
    if !output.failures.is_empty() {
        tracing::warn!(
            skipped = output.failures.len(),
            "some records could not be parsed and were excluded"
        );
    }

    let rows = output.rows();
    match &cli.file {
        Some(path) => {
            export::write_csv_file(path, &rows)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Results saved to {}", path.display());
        }
        None => export::write_csv_stdout(&rows)?,
    }

    Ok(())
}
