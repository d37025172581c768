//! # pubmed-papers
//!
//! Fetches PubMed records matching a search query, flags authors with
//! industry (pharma/biotech) affiliations, and writes the results as CSV.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (PaperRecord, Author, FetchReport)
//! - [`source`]: PubMed E-utilities client behind the [`source::PaperSource`] trait
//! - [`classify`]: Affiliation keyword classifier
//! - [`export`]: CSV output
//! - [`pipeline`]: Linear resolve -> fetch -> classify orchestration
//! - [`config`]: Configuration management
//! - [`utils`]: HTTP client and retry helpers

pub mod classify;
pub mod config;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod utils;

// Re-export commonly used types
pub use models::{Author, PaperRecord};
pub use source::{PaperSource, PubMedClient, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
