//! Audited module identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One audited dependency.
///
/// Modules are owned by the resolution step and shared with outputs as
/// `Arc<Module>`. Outputs key their state by the `Arc` allocation, so two
/// separately constructed modules with the same path are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Module {
    /// Import path, e.g. `github.com/foo/bar`.
    pub path: String,

    /// Resolved version string.
    pub version: String,
}

impl Module {
    /// Create a new module.
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }

    /// Create a new module wrapped for sharing across audit workers.
    pub fn shared(path: impl Into<String>, version: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(path, version))
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.version)
    }
}

/// Reference identity of a shared module.
///
/// Only valid while the `Arc` it was taken from is alive; holders must keep
/// the module alongside the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleKey(usize);

impl ModuleKey {
    /// Identity of the given module instance.
    pub fn of(module: &Arc<Module>) -> Self {
        Self(Arc::as_ptr(module) as usize)
    }
}
