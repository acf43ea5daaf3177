//! Detector backed by a file of pre-computed audit outcomes.
//!
//! Each non-empty line that does not start with `#` is one JSON object:
//!
//! ```text
//! {"import": "github.com/pkg/errors", "version": "v0.9.1", "license": {"name": "BSD-2-Clause", "spdx": "BSD-2-Clause"}}
//! {"import": "example.com/private", "version": "v1.0.0", "error": "no license file found"}
//! ```

use super::driver::LicenseDetector;
use crate::error::{IoOperation, ReportError, Result};
use crate::types::{AuditFailure, License, Module, ModuleKey};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutcomeLine {
    import: String,
    version: String,
    #[serde(default)]
    license: Option<License>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
enum Answer {
    License(License),
    Error(String),
}

/// Answers detection requests from a parsed outcomes file.
///
/// Every line becomes its own module instance, so repeated import paths in
/// the file surface as path collisions at finalize.
#[derive(Debug, Default)]
pub struct ManifestDetector {
    modules: Vec<Arc<Module>>,
    answers: HashMap<ModuleKey, Answer>,
}

impl ManifestDetector {
    /// Parse an outcomes file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ReportError::Io {
            path: path.to_path_buf(),
            operation: IoOperation::Read,
            source: e,
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Parse outcomes from a reader; `origin` names the source in errors.
    pub fn from_reader(reader: impl BufRead, origin: &Path) -> Result<Self> {
        let mut detector = Self::default();

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| ReportError::Io {
                path: origin.to_path_buf(),
                operation: IoOperation::Read,
                source: e,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let parse_error = |message: String| ReportError::Parse {
                path: origin.to_path_buf(),
                line: line_no,
                message,
            };

            let parsed: OutcomeLine =
                serde_json::from_str(trimmed).map_err(|e| parse_error(e.to_string()))?;
            let answer = match (parsed.license, parsed.error) {
                (Some(license), None) => Answer::License(license),
                (None, Some(error)) => Answer::Error(error),
                _ => {
                    return Err(parse_error(
                        "expected exactly one of `license` or `error`".to_string(),
                    ));
                }
            };

            let module = Module::shared(parsed.import, parsed.version);
            detector.answers.insert(ModuleKey::of(&module), answer);
            detector.modules.push(module);
        }

        debug!(
            origin = %origin.display(),
            modules = detector.modules.len(),
            "Parsed audit outcomes"
        );
        Ok(detector)
    }

    /// Modules in file order.
    pub fn modules(&self) -> &[Arc<Module>] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl LicenseDetector for ManifestDetector {
    fn detect(&self, module: &Arc<Module>) -> std::result::Result<License, AuditFailure> {
        match self.answers.get(&ModuleKey::of(module)) {
            Some(Answer::License(license)) => Ok(license.clone()),
            Some(Answer::Error(message)) => Err(AuditFailure::new(message.clone())),
            None => Err(AuditFailure::new(format!(
                "no recorded outcome for {}",
                module
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<ManifestDetector> {
        ManifestDetector::from_reader(Cursor::new(content), Path::new("outcomes.jsonl"))
    }

    #[test]
    fn test_parse_found_and_failed() {
        let detector = parse(concat!(
            r#"{"import": "b/pkg", "version": "v1.0", "license": {"name": "MIT", "spdx": "MIT"}}"#,
            "\n",
            r#"{"import": "a/pkg", "version": "v2.0", "error": "not found"}"#,
            "\n",
        ))
        .unwrap();

        assert_eq!(detector.len(), 2);
        let b = &detector.modules()[0];
        let a = &detector.modules()[1];
        assert_eq!(b.path, "b/pkg");
        assert_eq!(detector.detect(b).unwrap(), License::new("MIT", "MIT"));
        assert_eq!(detector.detect(a).unwrap_err().message(), "not found");
    }

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        let detector = parse(
            "# generated by audit run\n\n   \n{\"import\": \"a\", \"version\": \"v1\", \"error\": \"x\"}\n",
        )
        .unwrap();
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_parse_keeps_license_extras() {
        let detector = parse(
            r#"{"import": "a", "version": "v1", "license": {"name": "MIT", "spdx": "MIT", "file": "LICENSE.md"}}"#,
        )
        .unwrap();
        let license = detector.detect(&detector.modules()[0]).unwrap();
        assert_eq!(license.extra["file"], "LICENSE.md");
    }

    #[test]
    fn test_parse_error_reports_line_number() {
        let err = parse("# header\n{\"import\": \"a\", \"version\": \"v1\", \"error\": \"x\"}\n{not json}\n")
            .unwrap_err();
        match err {
            ReportError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_both_or_neither() {
        assert!(matches!(
            parse(r#"{"import": "a", "version": "v1"}"#),
            Err(ReportError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse(r#"{"import": "a", "version": "v1", "error": "x", "license": {"name": "MIT", "spdx": "MIT"}}"#),
            Err(ReportError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        assert!(parse(r#"{"import": "a", "version": "v1", "error": "x", "path": "a"}"#).is_err());
    }

    #[test]
    fn test_duplicate_paths_are_distinct_modules() {
        let detector = parse(concat!(
            r#"{"import": "a", "version": "v1", "error": "x"}"#,
            "\n",
            r#"{"import": "a", "version": "v2", "error": "y"}"#,
        ))
        .unwrap();
        assert_eq!(detector.len(), 2);
        assert_eq!(detector.detect(&detector.modules()[1]).unwrap_err().message(), "y");
    }

    #[test]
    fn test_unknown_module_fails_detection() {
        let detector = parse("").unwrap();
        assert!(detector.is_empty());
        let err = detector.detect(&Module::shared("a", "v1")).unwrap_err();
        assert!(err.message().contains("no recorded outcome"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = ManifestDetector::from_path(&temp_dir.path().join("missing.jsonl")).unwrap_err();
        assert!(matches!(err, ReportError::Io { operation: IoOperation::Read, .. }));
    }

    #[test]
    fn test_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("outcomes.jsonl");
        fs::write(&path, "{\"import\": \"a\", \"version\": \"v1\", \"error\": \"x\"}\n").unwrap();

        assert_eq!(ManifestDetector::from_path(&path).unwrap().len(), 1);
    }
}
