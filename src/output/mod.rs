//! Output module for crawl results and run summaries
//!
//! This module handles:
//! - Writing one JSON artifact per seed (flat list or html/document split)
//! - Recording per-seed outcomes and printing the run summary

pub mod stats;
mod writer;

pub use stats::{print_run_report, RunReport, SeedOutcome};
pub use writer::ResultWriter;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing a seed's result
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
