//! Concurrent-safe collection of per-module license audit outcomes and
//! deterministic JSON report generation.
//!
//! Audit workers report each module's outcome through [`ResultCollector`]
//! (directly or via the [`AuditOutput`] hooks). Once every worker has
//! finished, [`ResultCollector::finalize`] writes one report sorted by import
//! path to a [`ReportSink`].

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod output;
pub mod reporter;
pub mod run;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use aggregator::{DuplicatePolicy, PathCollision, Report, ResultCollector, Summary};
pub use cli::Cli;
pub use config::{ConfigError, EffectiveConfig, ReportConfig};
pub use error::{IoOperation, ReportError, Result};
pub use output::{FileSink, Indent, MemorySink, ReportSink, SinkError, StdoutSink, encode_report};
pub use reporter::{AuditOutput, multi::MultiOutput, progress::ProgressOutput};
pub use run::{AuditDriver, LicenseDetector, ManifestDetector};
pub use types::{AuditFailure, License, Module, ModuleKey, Outcome, StatusKind};
