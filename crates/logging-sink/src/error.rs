//! crates/logging-sink/src/error.rs
//! Error types for file creation, writes, and retention scans.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure raised while creating, rotating, or writing a log file.
///
/// The sink never swallows these: the owning dispatcher treats any
/// [`SinkError`] as fatal for the process.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The log directory could not be created.
    #[error("could not create log directory '{}': {source}", path.display())]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A new log file could not be opened.
    #[error("could not create log file '{}': {source}", path.display())]
    Create {
        /// File that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Flushing or closing the previous file failed during rotation.
    #[error("could not close log file '{}': {source}", path.display())]
    Close {
        /// File that was being closed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Appending to the current file failed.
    #[error("could not write log file '{}': {source}", path.display())]
    Write {
        /// File that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Redirecting the process stderr stream to the new file failed.
    #[error("could not redirect stderr: {0}")]
    Redirect(#[source] io::Error),
}

/// Failure to enumerate the log directory during a retention pass.
///
/// Retention errors are never fatal; the pass is abandoned and retried on
/// the next cycle.
#[derive(Debug, Error)]
#[error("unable to GC log files in '{}': {source}", dir.display())]
pub struct RetentionScanError {
    dir: PathBuf,
    #[source]
    source: io::Error,
}

impl RetentionScanError {
    pub(crate) fn new(dir: PathBuf, source: io::Error) -> Self {
        Self { dir, source }
    }

    /// Returns the directory whose listing failed.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}
