//! Configuration type definitions.

use crate::aggregator::DuplicatePolicy;
use crate::output::Indent;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for license-report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Report file path. Reports go to stdout when unset.
    pub output: Option<PathBuf>,
    /// Indentation: a width in spaces, or "tab".
    pub indent: Indent,
    /// Write to a temporary file and rename it over the report.
    pub atomic_write: bool,
    /// Handling of distinct modules sharing an import path: "warn" or "error".
    pub duplicate_paths: DuplicatePolicy,
    /// Show a progress bar on interactive terminals.
    pub progress: bool,
    /// Number of audit worker threads. Defaults to one per CPU.
    pub jobs: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: None,
            indent: Indent::default(),
            atomic_write: true,
            duplicate_paths: DuplicatePolicy::default(),
            progress: true,
            jobs: None,
        }
    }
}
