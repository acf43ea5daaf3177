//! CLI command handlers.
//!
//! Kept separate from main.rs to enable unit testing.

mod report;

pub use report::{handle_report, load_effective_config, run_report};
