//! Diagnostics sinks.
//!
//! A session reports what it does (startup, mutations, rejected values,
//! recomputed durations) to an injected [`DiagnosticsSink`]. The sink is
//! write-only: nothing in the crate ever reads it back, so swapping
//! [`NoOpSink`] for [`TracingSink`] changes observability and nothing else.

use serde_json::Value;

/// Write-only receiver of diagnostic events.
///
/// Each call takes a message and an optional structured context.
pub trait DiagnosticsSink {
    fn info(&self, message: &str, context: Option<&Value>);
    fn log(&self, message: &str, context: Option<&Value>);
    fn debug(&self, message: &str, context: Option<&Value>);
    fn warn(&self, message: &str, context: Option<&Value>);
}

/// Discards every event. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl DiagnosticsSink for NoOpSink {
    fn info(&self, _message: &str, _context: Option<&Value>) {}
    fn log(&self, _message: &str, _context: Option<&Value>) {}
    fn debug(&self, _message: &str, _context: Option<&Value>) {}
    fn warn(&self, _message: &str, _context: Option<&Value>) {}
}

/// Forwards events to `tracing`, with the context as a `context` field.
///
/// `log` has no `tracing` counterpart and is emitted at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn info(&self, message: &str, context: Option<&Value>) {
        match context {
            Some(context) => tracing::info!(%context, "{message}"),
            None => tracing::info!("{message}"),
        }
    }

    fn log(&self, message: &str, context: Option<&Value>) {
        self.debug(message, context);
    }

    fn debug(&self, message: &str, context: Option<&Value>) {
        match context {
            Some(context) => tracing::debug!(%context, "{message}"),
            None => tracing::debug!("{message}"),
        }
    }

    fn warn(&self, message: &str, context: Option<&Value>) {
        match context {
            Some(context) => tracing::warn!(%context, "{message}"),
            None => tracing::warn!("{message}"),
        }
    }
}
