//! Effective configuration: CLI flags layered over the config file.

use crate::aggregator::DuplicatePolicy;
use crate::cli::Cli;
use crate::config::ReportConfig;
use crate::output::Indent;
use std::path::PathBuf;

/// Settings for one run after merging CLI options with the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub output: Option<PathBuf>,
    pub indent: Indent,
    pub atomic_write: bool,
    pub duplicate_paths: DuplicatePolicy,
    pub progress: bool,
    pub ci: bool,
    pub jobs: Option<usize>,
}

impl EffectiveConfig {
    /// CLI flags win; boolean flags can only tighten the file's settings.
    pub fn from_cli_and_config(cli: &Cli, config: &ReportConfig) -> Self {
        Self {
            output: cli.output.clone().or_else(|| config.output.clone()),
            indent: cli.indent.unwrap_or(config.indent),
            atomic_write: config.atomic_write && !cli.no_atomic,
            duplicate_paths: if cli.strict_paths {
                DuplicatePolicy::Error
            } else {
                config.duplicate_paths
            },
            progress: config.progress && !cli.ci,
            ci: cli.ci,
            jobs: cli.jobs.map(usize::from).or(config.jobs),
        }
    }
}
