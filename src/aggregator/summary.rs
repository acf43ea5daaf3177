//! Shaping of recorded outcomes into the path-ordered report.

use crate::error::{ReportError, Result};
use crate::types::{License, Module, Outcome};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

/// One report record.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub import: String,
    pub version: String,
    pub license: License,
}

/// Distinct module instances that shared one import path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCollision {
    pub import: String,
    /// Versions of every colliding instance, ending with the one kept.
    pub versions: Vec<String>,
}

/// What to do when distinct module instances share an import path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the highest version and report the collision.
    #[default]
    Warn,
    /// Abort finalization.
    Error,
}

/// Finalized report, sorted by import path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    summaries: Vec<Summary>,
    collisions: Vec<PathCollision>,
    not_found: usize,
}

impl Report {
    /// Build a report from records, sorting them by import path.
    pub fn new(mut summaries: Vec<Summary>) -> Self {
        summaries.sort_by(|a, b| a.import.cmp(&b.import));
        let not_found = summaries
            .iter()
            .filter(|s| s.license.is_not_found())
            .count();
        Self {
            summaries,
            collisions: Vec::new(),
            not_found,
        }
    }

    pub fn summaries(&self) -> &[Summary] {
        &self.summaries
    }

    /// Path collisions resolved while shaping.
    pub fn collisions(&self) -> &[PathCollision] {
        &self.collisions
    }

    /// Look up a record by import path.
    pub fn get(&self, import: &str) -> Option<&Summary> {
        self.summaries
            .binary_search_by(|s| s.import.as_str().cmp(import))
            .ok()
            .map(|idx| &self.summaries[idx])
    }

    pub fn imports(&self) -> Vec<&str> {
        self.summaries.iter().map(|s| s.import.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Number of records whose lookup failed.
    pub fn not_found_count(&self) -> usize {
        self.not_found
    }

    pub fn into_summaries(self) -> Vec<Summary> {
        self.summaries
    }
}

/// Terminal state held for one module instance.
#[derive(Debug, Clone)]
pub(crate) enum Recorded {
    Outcome(Outcome),
    /// Recorded with neither a license nor an error.
    Unclassified,
}

/// Snapshot of one accumulated entry.
#[derive(Debug, Clone)]
pub(crate) struct RecordedEntry {
    pub module: Arc<Module>,
    pub record: Recorded,
}

impl RecordedEntry {
    fn classify(&self) -> Result<&Outcome> {
        match &self.record {
            Recorded::Outcome(outcome) => Ok(outcome),
            Recorded::Unclassified => Err(ReportError::InvariantViolation {
                import: self.module.path.clone(),
                detail: format!(
                    "version {} was recorded with neither a license nor an error",
                    self.module.version
                ),
            }),
        }
    }
}

/// Candidate for one import path, with the key that ranks it.
struct Ranked<'a> {
    entry: &'a RecordedEntry,
    license: License,
    encoded: Vec<u8>,
    failed: bool,
}

impl Ranked<'_> {
    /// Greater wins: higher version (byte-wise), then greater encoded
    /// license, then a found license over a failure.
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.entry
            .module
            .version
            .cmp(&other.entry.module.version)
            .then_with(|| self.encoded.cmp(&other.encoded))
            .then_with(|| other.failed.cmp(&self.failed))
    }
}

/// Turn a snapshot into the path-ordered report.
///
/// Every entry is classified, including ones shadowed by a path collision,
/// so an unclassified record always aborts. Within a shared path the winner
/// is picked from the recorded values alone, so the output does not depend
/// on the order outcomes arrived in.
pub(crate) fn shape(mut entries: Vec<RecordedEntry>, policy: DuplicatePolicy) -> Result<Report> {
    entries.sort_by(|a, b| a.module.path.cmp(&b.module.path));

    let mut summaries = Vec::with_capacity(entries.len());
    let mut collisions = Vec::new();
    let mut not_found = 0;

    for group in entries.chunk_by(|a, b| a.module.path == b.module.path) {
        let mut ranked = Vec::with_capacity(group.len());
        for entry in group {
            let outcome = entry.classify()?;
            let license = outcome.reported_license();
            ranked.push(Ranked {
                entry,
                encoded: serde_json::to_vec(&license)?,
                license,
                failed: outcome.is_failed(),
            });
        }
        ranked.sort_by(|a, b| a.cmp_key(b));
        let Some(winner) = ranked.pop() else {
            continue;
        };

        if group.len() > 1 {
            let mut versions: Vec<String> = ranked
                .iter()
                .map(|r| r.entry.module.version.clone())
                .collect();
            versions.push(winner.entry.module.version.clone());
            let collision = PathCollision {
                import: winner.entry.module.path.clone(),
                versions,
            };
            match policy {
                DuplicatePolicy::Error => {
                    return Err(ReportError::DuplicatePath {
                        import: collision.import,
                        count: group.len(),
                    });
                }
                DuplicatePolicy::Warn => {
                    warn!(
                        import = %collision.import,
                        versions = ?collision.versions,
                        kept = %winner.entry.module.version,
                        "Distinct modules share an import path; keeping the highest version"
                    );
                    collisions.push(collision);
                }
            }
        }

        if winner.failed {
            not_found += 1;
        }
        summaries.push(Summary {
            import: winner.entry.module.path.clone(),
            version: winner.entry.module.version.clone(),
            license: winner.license,
        });
    }

    debug!(
        records = summaries.len(),
        collisions = collisions.len(),
        not_found,
        "Shaped report"
    );

    Ok(Report {
        summaries,
        collisions,
        not_found,
    })
}
