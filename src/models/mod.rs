//! Core data structures shared across the pipeline.

mod paper;
mod report;

pub use paper::{Author, PaperRecord, PaperRecordBuilder};
pub use report::{FetchReport, RecordFailure};
