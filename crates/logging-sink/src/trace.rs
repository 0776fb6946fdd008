//! crates/logging-sink/src/trace.rs
//! Tracing hooks for rotations and retention passes.
//!
//! All hooks compile to no-ops unless the `tracing` feature is enabled.

use std::path::Path;

/// Target used for events emitted by this crate.
#[cfg(feature = "tracing")]
pub const SINK_TARGET: &str = "logging_sink";

/// Traces the opening of a new log file.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_rotated(path: &Path, previous_rotations: u64) {
    tracing::debug!(
        target: SINK_TARGET,
        path = %path.display(),
        previous_rotations,
        "log_file_rotated"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_rotated(_path: &Path, _previous_rotations: u64) {}

/// Traces the outcome of one retention pass.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_retention_pass(dir: &Path, scanned: usize, deleted: usize) {
    tracing::debug!(
        target: SINK_TARGET,
        dir = %dir.display(),
        scanned,
        deleted,
        "retention_pass"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_retention_pass(_dir: &Path, _scanned: usize, _deleted: usize) {}
