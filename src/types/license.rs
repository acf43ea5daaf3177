//! License data and per-module audit outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Name used for modules whose license lookup failed.
pub const NOT_FOUND_NAME: &str = "not found";

/// SPDX sentinel used for modules whose license lookup failed.
pub const NOT_FOUND_SPDX: &str = "NOT-FOUND";

/// A detected license.
///
/// `name` and `spdx` always serialize first, in that order. Any other
/// attributes supplied by the detector are kept in `extra` and serialize
/// after them in ascending key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    /// Display name, e.g. "MIT License".
    pub name: String,

    /// SPDX identifier or a sentinel.
    pub spdx: String,

    /// Additional descriptive attributes carried through untouched.
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl License {
    /// Create a license with no extra attributes.
    pub fn new(name: impl Into<String>, spdx: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spdx: spdx.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Placeholder license reported for failed lookups.
    pub fn not_found() -> Self {
        Self::new(NOT_FOUND_NAME, NOT_FOUND_SPDX)
    }

    /// Attach an extra attribute.
    ///
    /// `name` and `spdx` are reserved and ignored here, since they would
    /// produce duplicate keys in the serialized record.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != "name" && key != "spdx" {
            self.extra.insert(key, value.into());
        }
        self
    }

    /// Check if this is exactly the failed-lookup placeholder.
    pub fn is_not_found(&self) -> bool {
        self.name == NOT_FOUND_NAME && self.spdx == NOT_FOUND_SPDX && self.extra.is_empty()
    }
}

/// Error detail for a failed license lookup.
///
/// Only its presence matters to reporting; the message is kept for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditFailure(String);

impl AuditFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl<E> From<E> for AuditFailure
where
    E: std::error::Error,
{
    fn from(err: E) -> Self {
        Self(err.to_string())
    }
}

impl fmt::Display for AuditFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal state of one module's audit.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The detector resolved a license.
    Found(License),
    /// The lookup failed for any reason.
    Failed(AuditFailure),
}

impl Outcome {
    /// License to report for this outcome.
    ///
    /// Failures always map to the placeholder; their detail is dropped.
    pub fn reported_license(&self) -> License {
        match self {
            Self::Found(license) => license.clone(),
            Self::Failed(_) => License::not_found(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Kind of an intermediate progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Normal,
    Warning,
    Error,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_key_order() {
        let license = License::new("MIT License", "MIT")
            .with_attribute("url", "https://opensource.org/licenses/MIT")
            .with_attribute("confidence", 0.98);
        let json = serde_json::to_string(&license).unwrap();
        assert_eq!(
            json,
            r#"{"name":"MIT License","spdx":"MIT","confidence":0.98,"url":"https://opensource.org/licenses/MIT"}"#
        );
    }

    #[test]
    fn test_license_reserved_attributes_ignored() {
        let license = License::new("MIT", "MIT").with_attribute("spdx", "Apache-2.0");
        assert!(license.extra.is_empty());
        assert_eq!(license.spdx, "MIT");
    }

    #[test]
    fn test_license_deserialize_keeps_extras() {
        let license: License =
            serde_json::from_str(r#"{"name":"BSD","spdx":"BSD-3-Clause","source":"LICENSE"}"#)
                .unwrap();
        assert_eq!(license.spdx, "BSD-3-Clause");
        assert_eq!(license.extra["source"], "LICENSE");
    }

    #[test]
    fn test_not_found_placeholder() {
        let license = License::not_found();
        assert_eq!(license.name, "not found");
        assert_eq!(license.spdx, "NOT-FOUND");
        assert!(license.is_not_found());
    }

    #[test]
    fn test_is_not_found_requires_whole_placeholder() {
        assert!(!License::new("Proprietary", NOT_FOUND_SPDX).is_not_found());
        assert!(!License::not_found().with_attribute("source", "vendor").is_not_found());
    }

    #[test]
    fn test_failed_outcome_drops_detail() {
        let outcome = Outcome::Failed(AuditFailure::new("ambiguous match: MIT or ISC"));
        assert!(outcome.is_failed());
        assert_eq!(outcome.reported_license(), License::not_found());
    }

    #[test]
    fn test_audit_failure_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no LICENSE file");
        let failure = AuditFailure::from(io);
        assert_eq!(failure.message(), "no LICENSE file");
    }

    #[test]
    fn test_status_kind_display() {
        assert_eq!(StatusKind::Normal.to_string(), "normal");
        assert_eq!(StatusKind::Warning.to_string(), "warning");
        assert_eq!(StatusKind::Error.to_string(), "error");
    }
}
