//! Audit sinks

mod recording;
mod tracing_sink;

pub use recording::RecordingAuditSink;
pub use tracing_sink::TracingAuditSink;
