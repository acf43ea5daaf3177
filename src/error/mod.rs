//! Error types for license-report.
//!
//! Per-module lookup failures are never errors here: they become
//! placeholder licenses in the report. `ReportError` covers the structural
//! failures that abort finalization or the command-line run.

mod context;

pub use context::IoOperation;

use crate::config::ConfigError;
use crate::output::SinkError;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-level error type.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A recorded entry carries neither a license nor a failure.
    #[error("Invariant violation for module {import}: {detail}")]
    InvariantViolation { import: String, detail: String },

    /// The report could not be encoded.
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The encoded report could not be written to its sink.
    #[error("Failed to write report: {0}")]
    Write(#[from] SinkError),

    /// Distinct module instances share an import path.
    #[error("Duplicate import path {import} recorded by {count} modules")]
    DuplicatePath { import: String, count: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed line in an outcomes file.
    #[error("Failed to parse {path} line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The audit worker pool could not be created.
    #[error("Failed to start audit workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// I/O operation failed outside of report writing.
    #[error("Failed to {operation} {path}: {source}")]
    Io {
        path: PathBuf,
        operation: IoOperation,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for operations using `ReportError`.
pub type Result<T> = std::result::Result<T, ReportError>;
