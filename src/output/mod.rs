//! Output layer: report encoding and sinks.

mod formatter;
mod sink;

pub use formatter::{Indent, encode_report};
pub use sink::{FileSink, MemorySink, ReportSink, SinkError, StdoutSink};
