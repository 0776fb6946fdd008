#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` owns everything the leveled logging engine does on disk:
//! naming log files after the process identity, appending encoded records to
//! a buffered file that rotates at a size ceiling, and bounding the combined
//! size of old files with a retention pass.
//!
//! # Design
//!
//! [`FileSink`] is deliberately unsynchronised. The engine stores it behind
//! its main lock, so rotation and writes are already serialised by the
//! caller. Every new file starts with a preamble supplied through the
//! [`Preamble`] trait; the sink counts those bytes against the ceiling.
//! When a rotation happens the sink performs a non-blocking send on an
//! optional bounded notification channel, which the engine's retention
//! daemon drains.
//!
//! Retention is a pure function over the directory listing:
//! [`select_expired`] decides which files to drop and [`gc_old_files`]
//! applies that decision.
//!
//! # Invariants
//!
//! - File names are `{program}.{host}.{user}.{YYYY-MM-DDTHH_MM_SS}Z.{pid}.log`
//!   and successive files of one sink carry strictly increasing timestamps.
//! - A write that would bring the file to the ceiling rotates first, so a
//!   file never grows past the ceiling because of a single oversized batch of
//!   small records.
//! - The newest file is never deleted by retention.
//!
//! # Errors
//!
//! Sink failures surface as [`SinkError`]; the engine treats them as fatal.
//! Retention failures surface as [`RetentionScanError`] and only abandon the
//! current pass.
//!
//! # Examples
//!
//! ```
//! use std::time::SystemTime;
//! use logging_sink::{FileSink, Identity, SinkOptions};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let options = SinkOptions {
//!     dir: dir.path().to_path_buf(),
//!     identity: Identity::detect("doc"),
//!     max_file_size: 1024,
//! };
//! let preamble = |_: SystemTime, out: &mut Vec<u8>| out.extend_from_slice(b"start\n");
//! let mut sink = FileSink::create(options, Box::new(preamble), None, false).unwrap();
//! sink.write(b"I record\n").unwrap();
//! sink.flush().unwrap();
//! assert_eq!(sink.rotations(), 1);
//! ```

mod error;
mod file_sink;
mod naming;
mod retention;
mod stderr;
mod trace;

pub use error::{RetentionScanError, SinkError};
pub use file_sink::{DEFAULT_MAX_FILE_SIZE, FileSink, Preamble, SinkOptions, WRITE_BUFFER_SIZE};
pub use naming::{Identity, LogFileName};
pub use retention::{
    DEFAULT_COMBINED_MAX_SIZE, LogFileInfo, RetentionReport, gc_old_files, list_log_files,
    select_expired, sort_newest_first,
};
pub use stderr::{OrigStderr, capture_original_stderr, hijack_stderr, restore_stderr};

#[cfg(feature = "tracing")]
pub use trace::SINK_TARGET;
