//! Destinations for encoded reports.

use crate::error::IoOperation;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Errors raised while persisting an encoded report.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to {operation} {path}: {source}")]
    Io {
        path: PathBuf,
        operation: IoOperation,
        #[source]
        source: std::io::Error,
    },
}

/// Receives the fully encoded report in a single call.
pub trait ReportSink: Send + Sync {
    /// Replace the sink's content with `bytes`.
    fn write_report(&self, bytes: &[u8]) -> Result<(), SinkError>;

    /// Human-readable destination, used in logs and messages.
    fn describe(&self) -> String;
}

/// Overwrites a file on every write.
///
/// In atomic mode the bytes go to a temporary file in the target directory
/// which is then renamed over the target, so readers observe either the old
/// content or the complete new content. Otherwise the file is truncated and
/// rewritten in place.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    atomic: bool,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            atomic: true,
        }
    }

    /// Enable or disable write-then-rename.
    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(path: &Path, operation: IoOperation, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: path.to_path_buf(),
            operation,
            source,
        }
    }

    fn write_in_place(&self, bytes: &[u8]) -> Result<(), SinkError> {
        fs::write(&self.path, bytes).map_err(|e| Self::io_error(&self.path, IoOperation::Write, e))
    }

    fn write_atomic(&self, bytes: &[u8]) -> Result<(), SinkError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| Self::io_error(dir, IoOperation::Create, e))?;
        tmp.write_all(bytes)
            .map_err(|e| Self::io_error(tmp.path(), IoOperation::Write, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| Self::io_error(tmp.path(), IoOperation::Flush, e))?;

        // Temporary files are created 0600; reports are meant to be shared.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o644))
                .map_err(|e| Self::io_error(tmp.path(), IoOperation::Write, e))?;
        }

        tmp.persist(&self.path)
            .map_err(|e| Self::io_error(&self.path, IoOperation::Persist, e.error))?;
        Ok(())
    }
}

impl ReportSink for FileSink {
    fn write_report(&self, bytes: &[u8]) -> Result<(), SinkError> {
        debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            atomic = self.atomic,
            "Writing report"
        );
        if self.atomic {
            self.write_atomic(bytes)
        } else {
            self.write_in_place(bytes)
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Prints the report to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn write_report(&self, bytes: &[u8]) -> Result<(), SinkError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(bytes)
            .and_then(|()| handle.write_all(b"\n"))
            .and_then(|()| handle.flush())
            .map_err(|e| SinkError::Io {
                path: PathBuf::from("<stdout>"),
                operation: IoOperation::Write,
                source: e,
            })
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}

/// Keeps the last written report in memory.
///
/// Clones share one buffer, so a test can hand one clone to a collector
/// and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of the last written report.
    pub fn contents(&self) -> Vec<u8> {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Last written report as UTF-8 text.
    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl ReportSink for MemorySink {
    fn write_report(&self, bytes: &[u8]) -> Result<(), SinkError> {
        let mut buffer = self
            .buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        buffer.clear();
        buffer.extend_from_slice(bytes);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
