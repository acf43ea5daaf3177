pub mod multi;
pub mod progress;

use crate::error::Result;
use crate::types::{AuditFailure, License, Module, StatusKind};
use std::sync::Arc;

/// Lifecycle hooks an audit driver invokes for every module.
///
/// `start`, `update` and `finish` may be called concurrently from any
/// number of workers. `close` is called once, after every `finish` call
/// has returned.
pub trait AuditOutput: Send + Sync {
    fn start(&self, module: &Arc<Module>);

    fn update(&self, module: &Arc<Module>, kind: StatusKind, message: &str);

    /// Terminal outcome: a license, or the error that prevented finding one.
    fn finish(&self, module: &Arc<Module>, license: Option<License>, error: Option<AuditFailure>);

    fn close(&self) -> Result<()>;
}

impl<T: AuditOutput + ?Sized> AuditOutput for Arc<T> {
    fn start(&self, module: &Arc<Module>) {
        (**self).start(module);
    }

    fn update(&self, module: &Arc<Module>, kind: StatusKind, message: &str) {
        (**self).update(module, kind, message);
    }

    fn finish(&self, module: &Arc<Module>, license: Option<License>, error: Option<AuditFailure>) {
        (**self).finish(module, license, error);
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }
}
