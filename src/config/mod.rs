//! Configuration layer for license-report.
//!
//! ## Layers
//! - `types`: Configuration type definitions
//! - `loading`: File discovery and parsing
//! - `EffectiveConfig`: CLI + config merging (lives in run/config.rs)

mod error;
mod loading;
mod types;

pub use error::ConfigError;
pub use loading::CONFIG_FILE_NAMES;
pub use types::ReportConfig;

pub use crate::run::config::EffectiveConfig;
