#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging/src/lib.rs
//!
//! # Overview
//!
//! `logging` is a leveled, severity-filtered logging engine for long-running
//! server processes. Entries carry one of four severities
//! ([`Severity::Info`] through [`Severity::Fatal`]) and are routed to stderr
//! and to a size-rotating log file according to two independent thresholds.
//! Optional diagnostic detail is gated by a verbosity level that can be raised
//! per source module with glob patterns, at near-zero cost when disabled.
//!
//! # Design
//!
//! - [`Logger`] owns the engine. All mutable state sits behind one lock;
//!   verbosity, override count and both thresholds are atomics read without it.
//! - [`VerbosityGate`] answers "is level N on here?" with two atomic loads in
//!   the common case and consults the per-call-site cache in
//!   [`ModuleFilter`] only when overrides exist.
//! - Entries are rendered into pooled [`Buffer`]s by [`encode_entry`] and
//!   read back by [`EntryDecoder`].
//! - Files are written by [`logging_sink::FileSink`]; a flush daemon and a
//!   retention daemon run on their own threads.
//! - A FATAL entry captures stacks per [`StackPolicy`], flushes with a time
//!   bound, and calls the exit function with [`EXIT_FATAL`] or
//!   [`EXIT_FATAL_NO_STACKS`].
//!
//! # Invariants
//!
//! - Entries never carry a NONE severity; [`Threshold::NONE`] only filters.
//! - The main lock is never taken while the buffer pool lock is held.
//! - Replacing the override list discards every cached call-site level.
//! - The newest log file survives every retention pass.
//!
//! # Errors
//!
//! Configuration parsers return [`ConfigSyntaxError`] and leave the previous
//! setting in force. [`EntryDecoder`] reports malformed headers as
//! [`DecodeError`]. A [`SinkError`] while creating or writing the log file
//! is reported on the original stderr and ends the process with
//! [`EXIT_IO_ERROR`], unless the entry was FATAL, which keeps its own status.
//!
//! # Examples
//!
//! ```
//! use logging::{Config, Logger, Severity, Threshold};
//!
//! let dir = tempfile::tempdir()?;
//! let logger = Logger::new(Config {
//!     log_dir: Some(dir.path().to_path_buf()),
//!     stderr_threshold: Threshold::NONE,
//!     no_stderr_redirect: true,
//!     disable_daemons: true,
//!     ..Config::default()
//! });
//!
//! logger.set_vmodule("net*=2")?;
//! logging::info!(logger: &logger, "started with {} workers", 4);
//! logging::vlog!(logger: &logger, 1, "only when verbose");
//! logger.log(Severity::Warning, file!(), line!(), "direct call");
//! logger.flush()?;
//!
//! let path = logger.log_file_path().expect("file created");
//! let text = std::fs::read_to_string(path)?;
//! assert!(text.contains("started with 4 workers"));
//! assert!(text.contains("direct call"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bridge;
mod buffer;
mod clock;
mod codec;
mod config;
mod daemons;
mod dispatcher;
mod entry;
mod error;
mod global;
mod macros;
mod severity;
mod stacks;
mod trace;
mod trace_location;
mod verbosity;

#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use bridge::LogBridge;
pub use buffer::{Buffer, BufferPool, POOL_CEILING, PooledBuffer, SCRATCH_LEN};
pub use codec::color::{ColorProfile, PROFILE_8, PROFILE_256};
pub use codec::{EntryDecoder, encode_entry, format_header};
pub use config::{
    Config, DEFAULT_FATAL_FLUSH_TIMEOUT, DEFAULT_FLUSH_INTERVAL, DEFAULT_GC_INTERVAL,
    parse_verbosity,
};
pub use dispatcher::{EXIT_FATAL, EXIT_FATAL_NO_STACKS, EXIT_IO_ERROR, ExitFn, Logger};
pub use entry::{Entry, basename};
pub use error::{ConfigSyntaxError, DecodeError};
pub use global::{logger, set_default, try_logger};
pub use severity::{Severity, Threshold};
pub use stacks::{StackPolicy, TRACEBACK_ENV, capture_stacks};
pub use trace_location::TraceLocation;
pub use verbosity::{
    CallSite, GateDecision, ModuleFilter, ModulePattern, VerbosityGate, parse_vmodule,
    render_vmodule,
};

pub use logging_sink::{Identity, LogFileInfo, RetentionScanError, SinkError};

#[cfg(feature = "tracing")]
pub use trace::LOGGING_TARGET;
#[cfg(feature = "tracing")]
pub use tracing_bridge::{LoggerLayer, init_tracing};
