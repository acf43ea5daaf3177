//! Domain types shared by collectors, outputs and drivers.

mod license;
mod module;

pub use license::{AuditFailure, License, NOT_FOUND_NAME, NOT_FOUND_SPDX, Outcome, StatusKind};
pub use module::{Module, ModuleKey};
