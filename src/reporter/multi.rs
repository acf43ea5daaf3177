//! Fan-out to several outputs.

use super::AuditOutput;
use crate::error::Result;
use crate::types::{AuditFailure, License, Module, StatusKind};
use std::sync::Arc;
use tracing::warn;

/// Forwards every hook to each child output in insertion order.
#[derive(Default)]
pub struct MultiOutput {
    outputs: Vec<Box<dyn AuditOutput>>,
}

impl MultiOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child output.
    pub fn with(mut self, output: impl AuditOutput + 'static) -> Self {
        self.outputs.push(Box::new(output));
        self
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl AuditOutput for MultiOutput {
    fn start(&self, module: &Arc<Module>) {
        for output in &self.outputs {
            output.start(module);
        }
    }

    fn update(&self, module: &Arc<Module>, kind: StatusKind, message: &str) {
        for output in &self.outputs {
            output.update(module, kind, message);
        }
    }

    fn finish(&self, module: &Arc<Module>, license: Option<License>, error: Option<AuditFailure>) {
        for output in &self.outputs {
            output.finish(module, license.clone(), error.clone());
        }
    }

    /// Close every child; the first error is returned after all have closed.
    fn close(&self) -> Result<()> {
        let mut first_error = None;
        for output in &self.outputs {
            if let Err(e) = output.close() {
                if first_error.is_none() {
                    first_error = Some(e);
                } else {
                    warn!(error = %e, "Additional output failed to close");
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::ResultCollector;
    use crate::error::ReportError;
    use crate::output::MemorySink;
    use crate::test_utils::fixtures::{apache, mit};

    struct FailingOutput;

    impl AuditOutput for FailingOutput {
        fn start(&self, _module: &Arc<Module>) {}
        fn update(&self, _module: &Arc<Module>, _kind: StatusKind, _message: &str) {}
        fn finish(&self, _module: &Arc<Module>, _l: Option<License>, _e: Option<AuditFailure>) {}
        fn close(&self) -> Result<()> {
            Err(ReportError::DuplicatePath {
                import: "x".to_string(),
                count: 2,
            })
        }
    }

    #[test]
    fn test_multi_forwards_to_all_children() {
        let first = MemorySink::new();
        let second = MemorySink::new();
        let multi = MultiOutput::new()
            .with(ResultCollector::new(first.clone()))
            .with(ResultCollector::new(second.clone()));
        assert_eq!(multi.len(), 2);

        let a = Module::shared("a/pkg", "v1");
        let b = Module::shared("b/pkg", "v1");
        multi.start(&a);
        multi.finish(&a, Some(mit()), None);
        multi.finish(&b, Some(apache()), None);
        multi.close().unwrap();

        assert_eq!(first.contents(), second.contents());
        assert!(first.contents_string().contains("Apache-2.0"));
    }

    #[test]
    fn test_multi_close_runs_all_and_returns_first_error() {
        let sink = MemorySink::new();
        let multi = MultiOutput::new()
            .with(FailingOutput)
            .with(ResultCollector::new(sink.clone()));

        assert!(multi.close().is_err());
        assert_eq!(sink.contents_string(), "[]");
    }

    #[test]
    fn test_multi_shared_collector_handle() {
        let collector = Arc::new(ResultCollector::new(MemorySink::new()));
        let multi = MultiOutput::new().with(Arc::clone(&collector));

        multi.finish(&Module::shared("a/pkg", "v1"), Some(mit()), None);
        multi.close().unwrap();

        assert_eq!(collector.last_report().unwrap().len(), 1);
    }

    #[test]
    fn test_multi_empty() {
        let multi = MultiOutput::new();
        assert!(multi.is_empty());
        assert!(multi.close().is_ok());
    }
}
