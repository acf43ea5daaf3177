//! Parallel audit driver.

use crate::error::Result;
use crate::reporter::AuditOutput;
use crate::types::{AuditFailure, License, Module, StatusKind};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves the license of a single module.
pub trait LicenseDetector: Send + Sync {
    fn detect(&self, module: &Arc<Module>) -> std::result::Result<License, AuditFailure>;
}

impl<F> LicenseDetector for F
where
    F: Fn(&Arc<Module>) -> std::result::Result<License, AuditFailure> + Send + Sync,
{
    fn detect(&self, module: &Arc<Module>) -> std::result::Result<License, AuditFailure> {
        self(module)
    }
}

/// Runs a detector over every module and feeds the outcomes to an output.
pub struct AuditDriver<D> {
    detector: D,
    jobs: Option<usize>,
}

impl<D: LicenseDetector> AuditDriver<D> {
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            jobs: None,
        }
    }

    /// Limit the number of worker threads. `None` uses rayon's global pool.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Audit every module, then close the output.
    ///
    /// `close` runs only after the parallel loop has joined, so every
    /// `finish` call happens-before it.
    pub fn run(&self, modules: &[Arc<Module>], output: &dyn AuditOutput) -> Result<()> {
        info!(modules = modules.len(), jobs = ?self.jobs, "Starting license audit");

        match self.jobs {
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .thread_name(|idx| format!("license-audit-{}", idx))
                    .build()?;
                pool.install(|| self.audit_all(modules, output));
            }
            None => self.audit_all(modules, output),
        }

        output.close()
    }

    fn audit_all(&self, modules: &[Arc<Module>], output: &dyn AuditOutput) {
        modules
            .par_iter()
            .for_each(|module| self.audit_one(module, output));
    }

    fn audit_one(&self, module: &Arc<Module>, output: &dyn AuditOutput) {
        output.start(module);
        output.update(module, StatusKind::Normal, "detecting license");

        match self.detector.detect(module) {
            Ok(license) => {
                debug!(module = %module, spdx = %license.spdx, "License detected");
                output.finish(module, Some(license), None);
            }
            Err(err) => {
                debug!(module = %module, error = %err, "License detection failed");
                output.update(module, StatusKind::Error, err.message());
                output.finish(module, None, Some(err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::ResultCollector;
    use crate::output::MemorySink;
    use crate::test_utils::fixtures::{apache, mit};

    fn modules(paths: &[&str]) -> Vec<Arc<Module>> {
        paths.iter().map(|p| Module::shared(*p, "v1.0.0")).collect()
    }

    fn detect_by_prefix(module: &Arc<Module>) -> std::result::Result<License, AuditFailure> {
        if module.path.starts_with("github.com/") {
            Ok(mit())
        } else if module.path.starts_with("golang.org/") {
            Ok(apache())
        } else {
            Err(AuditFailure::new("no license file"))
        }
    }

    #[test]
    fn test_driver_audits_all_modules() {
        let sink = MemorySink::new();
        let collector = ResultCollector::new(sink.clone());
        let modules = modules(&[
            "golang.org/x/text",
            "github.com/pkg/errors",
            "example.com/private",
        ]);

        AuditDriver::new(detect_by_prefix)
            .run(&modules, &collector)
            .unwrap();

        let report = collector.last_report().unwrap();
        assert_eq!(
            report.imports(),
            vec!["example.com/private", "github.com/pkg/errors", "golang.org/x/text"]
        );
        assert!(report.get("example.com/private").unwrap().license.is_not_found());
        assert_eq!(report.get("golang.org/x/text").unwrap().license, apache());
        assert!(!sink.contents().is_empty());
    }

    #[test]
    fn test_driver_with_fixed_jobs_is_deterministic() {
        let paths: Vec<String> = (0..200).rev().map(|i| format!("github.com/m/{i:03}")).collect();
        let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let modules = modules(&path_refs);

        let mut outputs = Vec::new();
        for jobs in [Some(1), Some(4), None] {
            let sink = MemorySink::new();
            let collector = ResultCollector::new(sink.clone());
            AuditDriver::new(detect_by_prefix)
                .with_jobs(jobs)
                .run(&modules, &collector)
                .unwrap();
            outputs.push(sink.contents());
        }

        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[1], outputs[2]);
    }

    #[test]
    fn test_driver_empty_module_list() {
        let sink = MemorySink::new();
        let collector = ResultCollector::new(sink.clone());

        AuditDriver::new(detect_by_prefix)
            .run(&[], &collector)
            .unwrap();

        assert_eq!(sink.contents_string(), "[]");
    }
}
