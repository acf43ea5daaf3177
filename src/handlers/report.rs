//! Report generation handler.

use crate::aggregator::{Report, ResultCollector};
use crate::cli::Cli;
use crate::config::{EffectiveConfig, ReportConfig};
use crate::error::Result;
use crate::output::{FileSink, StdoutSink};
use crate::reporter::multi::MultiOutput;
use crate::reporter::progress::ProgressOutput;
use crate::run::{AuditDriver, ManifestDetector};
use colored::Colorize;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

/// Handle a report run: replay outcomes, write the report, print a summary.
pub fn handle_report(cli: &Cli) -> ExitCode {
    let effective = match load_effective_config(cli) {
        Ok(effective) => effective,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            return ExitCode::from(2);
        }
    };

    let report = match run_report(cli, &effective) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            return ExitCode::from(2);
        }
    };

    for collision in report.collisions() {
        eprintln!(
            "{} {} was recorded by {} modules ({}); kept {}",
            "Warning:".yellow(),
            collision.import,
            collision.versions.len(),
            collision.versions.join(", "),
            collision.versions.last().map_or("", String::as_str)
        );
    }

    if let Some(ref output_path) = effective.output {
        println!(
            "{} License report written to {}",
            "✓".green(),
            output_path.display()
        );
        println!(
            "  {} modules, {} not found",
            report.len(),
            report.not_found_count()
        );
    }

    ExitCode::SUCCESS
}

/// Merge the CLI with an explicit config file, or the one found next to the input.
pub fn load_effective_config(cli: &Cli) -> Result<EffectiveConfig> {
    let config = match cli.config {
        Some(ref path) => ReportConfig::from_file(path)?,
        None => ReportConfig::load(Some(project_root(&cli.input))),
    };
    Ok(EffectiveConfig::from_cli_and_config(cli, &config))
}

/// Replay the outcomes file through the collector and write the report.
pub fn run_report(cli: &Cli, effective: &EffectiveConfig) -> Result<Report> {
    let detector = ManifestDetector::from_path(&cli.input)?;

    let collector = match effective.output {
        Some(ref path) => {
            ResultCollector::new(FileSink::new(path).with_atomic(effective.atomic_write))
        }
        None => ResultCollector::new(StdoutSink),
    };
    let collector = Arc::new(
        collector
            .with_indent(effective.indent)
            .with_duplicate_policy(effective.duplicate_paths),
    );

    let show_progress = effective.progress && std::io::stderr().is_terminal();
    let outputs = MultiOutput::new()
        .with(ProgressOutput::new(detector.len(), show_progress, effective.ci))
        .with(Arc::clone(&collector));

    let driver = AuditDriver::new(detector).with_jobs(effective.jobs);
    driver.run(driver.detector().modules(), &outputs)?;

    let report = collector.last_report().unwrap_or_default();
    debug!(records = report.len(), "Report run complete");
    Ok(report)
}

fn project_root(input: &Path) -> &Path {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
