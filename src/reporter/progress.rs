//! Progress bar for terminal output while modules are audited.
//!
//! Uses Braille pattern characters for a modern, high-density display.

use super::AuditOutput;
use crate::error::Result;
use crate::types::{AuditFailure, License, Module, StatusKind};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

/// Minimum number of modules to display progress bar
const MIN_MODULES_FOR_PROGRESS: usize = 10;

/// Progress bar output for audit runs.
pub struct ProgressOutput {
    bar: Option<ProgressBar>,
}

impl ProgressOutput {
    /// Create a new progress bar if conditions are met.
    ///
    /// Progress bar is only shown if:
    /// - Total modules >= 10
    /// - Running in TTY (interactive terminal)
    /// - Not in CI mode
    pub fn new(total_modules: usize, is_tty: bool, is_ci: bool) -> Self {
        let bar = if should_show_progress(total_modules, is_tty, is_ci) {
            Some(create_progress_bar(total_modules))
        } else {
            None
        };

        Self { bar }
    }

    /// Whether a bar is being drawn.
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}

impl AuditOutput for ProgressOutput {
    fn start(&self, module: &Arc<Module>) {
        if let Some(bar) = &self.bar {
            bar.set_message(module.path.clone());
        }
    }

    fn update(&self, module: &Arc<Module>, kind: StatusKind, message: &str) {
        // Normal updates are too chatty to print above the bar.
        if kind == StatusKind::Normal {
            return;
        }
        if let Some(bar) = &self.bar {
            bar.println(format!("{} {}: {}", kind, module, message));
        }
    }

    fn finish(&self, _module: &Arc<Module>, _license: Option<License>, _error: Option<AuditFailure>) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn close(&self) -> Result<()> {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        Ok(())
    }
}

/// Check if progress bar should be displayed.
fn should_show_progress(total_modules: usize, is_tty: bool, is_ci: bool) -> bool {
    total_modules >= MIN_MODULES_FOR_PROGRESS && is_tty && !is_ci
}

/// Create a progress bar with Braille pattern style.
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "Auditing {bar:40} {pos:>4}/{len:4} modules ({percent:>3}%) {wide_msg}",
        )
        .expect("Invalid progress bar template")
        .progress_chars("⣿⣀ "),
    );
    pb
}
