//! Audit execution and orchestration.
//!
//! This module provides:
//! - Configuration merging (CLI + config file)
//! - The parallel audit driver and the detector seam
//! - Replay of pre-computed outcomes files

pub mod config;
mod driver;
mod manifest;

pub use config::EffectiveConfig;
pub use driver::{AuditDriver, LicenseDetector};
pub use manifest::ManifestDetector;
