//! crates/logging/src/trace.rs
//! Tracing hooks for engine reconfiguration, flushes, and exits.
//!
//! All hooks compile to no-ops unless the `tracing` feature is enabled.
//! Events carry [`LOGGING_TARGET`] so the forwarding layer can skip them.

/// Target used for events emitted by this crate.
#[cfg(feature = "tracing")]
pub const LOGGING_TARGET: &str = "logging";

/// Traces a verbosity or override-list change.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_reconfigured(verbosity: i32, overrides: usize) {
    tracing::debug!(
        target: LOGGING_TARGET,
        verbosity,
        overrides,
        "verbosity_reconfigured"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_reconfigured(_verbosity: i32, _overrides: usize) {}

/// Traces a flush of the log file.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_flush(ok: bool) {
    tracing::trace!(target: LOGGING_TARGET, ok, "log_flushed");
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_flush(_ok: bool) {}

/// Traces the engine terminating the process.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_exit(code: i32) {
    tracing::warn!(target: LOGGING_TARGET, code, "logging_exit");
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_exit(_code: i32) {}
