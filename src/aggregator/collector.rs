//! Thread-safe collector for per-module audit outcomes.

use super::summary::{DuplicatePolicy, Recorded, RecordedEntry, Report, shape};
use crate::error::Result;
use crate::output::{Indent, ReportSink, encode_report};
use crate::reporter::AuditOutput;
use crate::types::{AuditFailure, License, Module, ModuleKey, Outcome, StatusKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, trace, warn};

#[derive(Default)]
struct State {
    /// Created on the first recording.
    modules: Option<HashMap<ModuleKey, RecordedEntry>>,
    finalized: bool,
    last_report: Option<Report>,
}

/// Collects one outcome per audited module and writes the sorted report.
///
/// Recording may happen from any number of threads. Every recording must
/// happen-before `finalize`; the collector does not wait for in-flight
/// workers. Once `finalize` has begun, further recordings are dropped with a
/// warning.
///
/// Modules are keyed by `Arc` identity. Recording twice for the same
/// instance replaces the earlier outcome (last write wins); concurrent
/// recordings for one instance race with no ordering guarantee.
pub struct ResultCollector {
    state: Mutex<State>,
    sink: Box<dyn ReportSink>,
    indent: Indent,
    duplicate_policy: DuplicatePolicy,
}

impl ResultCollector {
    /// Create a collector writing its report to `sink`.
    pub fn new(sink: impl ReportSink + 'static) -> Self {
        Self {
            state: Mutex::new(State::default()),
            sink: Box::new(sink),
            indent: Indent::default(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    /// Set the report indentation.
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Set how import path collisions are handled at finalize.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    // Every critical section leaves the map consistent, so a panic in
    // another holder does not invalidate it.
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Notification that a module's audit has begun. Does not touch state.
    pub fn on_audit_start(&self, module: &Arc<Module>) {
        trace!(module = %module, "Audit started");
    }

    /// Intermediate progress notification. Does not touch state.
    pub fn on_audit_progress(&self, module: &Arc<Module>, kind: StatusKind, message: &str) {
        trace!(module = %module, %kind, status = message, "Audit progress");
    }

    /// Record a module's terminal outcome from a detector's raw result.
    ///
    /// Exactly one of `license` or `error` should be set. An error takes
    /// precedence if both are. If neither is, the module is stored as
    /// unclassified and `finalize` fails with an invariant violation.
    pub fn record_outcome(
        &self,
        module: &Arc<Module>,
        license: Option<License>,
        error: Option<AuditFailure>,
    ) {
        let record = match (license, error) {
            (Some(_), Some(err)) => {
                warn!(
                    module = %module,
                    error = %err,
                    "Both a license and an error were reported; recording the failure"
                );
                Recorded::Outcome(Outcome::Failed(err))
            }
            (None, Some(err)) => Recorded::Outcome(Outcome::Failed(err)),
            (Some(license), None) => Recorded::Outcome(Outcome::Found(license)),
            (None, None) => Recorded::Unclassified,
        };
        self.store(module, record);
    }

    /// Record an already classified outcome.
    pub fn record(&self, module: &Arc<Module>, outcome: Outcome) {
        self.store(module, Recorded::Outcome(outcome));
    }

    fn store(&self, module: &Arc<Module>, record: Recorded) {
        let mut state = self.lock_state();
        if state.finalized {
            drop(state);
            warn!(module = %module, "Ignoring outcome recorded after finalize");
            return;
        }

        let replaced = state
            .modules
            .get_or_insert_with(HashMap::new)
            .insert(
                ModuleKey::of(module),
                RecordedEntry {
                    module: Arc::clone(module),
                    record,
                },
            )
            .is_some();
        drop(state);

        debug!(module = %module, replaced, "Recorded outcome");
    }

    /// Shape, encode and write the report.
    ///
    /// Must not run concurrently with recording. Calling it again re-emits
    /// the same frozen snapshot, producing identical bytes.
    pub fn finalize(&self) -> Result<Report> {
        let entries: Vec<RecordedEntry> = {
            let mut state = self.lock_state();
            state.finalized = true;
            state
                .modules
                .as_ref()
                .map(|modules| modules.values().cloned().collect())
                .unwrap_or_default()
        };

        info!(modules = entries.len(), "Finalizing license report");

        let report = shape(entries, self.duplicate_policy)?;
        let bytes = encode_report(&report, self.indent)?;
        self.sink.write_report(&bytes)?;

        info!(
            sink = %self.sink.describe(),
            records = report.len(),
            not_found = report.not_found_count(),
            "License report written"
        );

        self.lock_state().last_report = Some(report.clone());
        Ok(report)
    }

    /// Report produced by the last successful `finalize`.
    pub fn last_report(&self) -> Option<Report> {
        self.lock_state().last_report.clone()
    }

    /// Number of module instances recorded so far.
    pub fn len(&self) -> usize {
        self.lock_state().modules.as_ref().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_finalized(&self) -> bool {
        self.lock_state().finalized
    }
}

impl fmt::Debug for ResultCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCollector")
            .field("sink", &self.sink.describe())
            .field("indent", &self.indent)
            .field("duplicate_policy", &self.duplicate_policy)
            .field("recorded", &self.len())
            .finish()
    }
}

impl AuditOutput for ResultCollector {
    fn start(&self, module: &Arc<Module>) {
        self.on_audit_start(module);
    }

    fn update(&self, module: &Arc<Module>, kind: StatusKind, message: &str) {
        self.on_audit_progress(module, kind, message);
    }

    fn finish(&self, module: &Arc<Module>, license: Option<License>, error: Option<AuditFailure>) {
        self.record_outcome(module, license, error);
    }

    fn close(&self) -> Result<()> {
        self.finalize().map(|_| ())
    }
}
