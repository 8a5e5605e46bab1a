//! Reporting for panics raised inside scheduled tasks.

use std::any::Any;

/// Receives exactly one call per task that panics during execution.
///
/// Implementations must be cheap and non-blocking: they run on the worker
/// thread that just caught the panic, immediately before that worker
/// resumes its loop.
pub trait ErrorSink: Send + Sync {
    /// Report a caught panic payload.
    fn report_panic(&self, payload: &(dyn Any + Send));
}

/// Formats a caught panic payload the way the panic's own default hook
/// would, for sinks that just want a string.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked with a non-string payload".to_string()
    }
}

/// The default sink: logs through the crate's `tracing` events rather
/// than writing directly to a stream, so the host's subscriber controls
/// formatting and destination.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report_panic(&self, payload: &(dyn Any + Send)) {
        let message = panic_message(payload);
        tracing::error!(target: "priority_dispatcher", "task panicked: {message}");
    }
}
