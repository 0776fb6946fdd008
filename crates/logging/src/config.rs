//! crates/logging/src/config.rs
//! Engine configuration and the string forms of its settings.

use std::path::PathBuf;
use std::time::Duration;

use logging_sink::{DEFAULT_COMBINED_MAX_SIZE, DEFAULT_MAX_FILE_SIZE, Identity};

use crate::error::ConfigSyntaxError;
use crate::severity::Threshold;
use crate::stacks::StackPolicy;
use crate::trace_location::TraceLocation;
use crate::verbosity::{ModulePattern, parse_vmodule};

/// Interval between periodic flushes of the log file buffer.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(30);

/// Interval between periodic retention passes.
pub const DEFAULT_GC_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Upper bound on the flush performed before a fatal exit.
pub const DEFAULT_FATAL_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings used to construct a [`Logger`](crate::Logger).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Directory receiving log files; `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
    /// Identity used to name files; detected from the process when `None`.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub identity: Option<Identity>,
    /// Build signature recorded in every file preamble.
    pub build: String,
    /// Minimum severity copied to stderr.
    pub stderr_threshold: Threshold,
    /// Minimum severity written to the log file.
    pub file_threshold: Threshold,
    /// Global verbosity level.
    pub verbosity: i32,
    /// Per-module verbosity overrides, first match wins.
    pub vmodule: Vec<ModulePattern>,
    /// Location whose entries carry a stack trace.
    pub trace_location: Option<TraceLocation>,
    /// Per-file size ceiling in bytes.
    pub max_file_size: u64,
    /// Combined size budget for retained files in bytes.
    pub combined_max_size: u64,
    /// Never colourise stderr output.
    pub no_color: bool,
    /// Keep fd 2 pointing at the original stderr even when stderr output is filtered.
    pub no_stderr_redirect: bool,
    /// Do not start the flush and retention daemons.
    pub disable_daemons: bool,
    /// Flush and sync the file after every entry.
    pub sync_writes: bool,
    /// Interval between periodic flushes.
    pub flush_interval: Duration,
    /// Interval between periodic retention passes.
    pub gc_interval: Duration,
    /// Upper bound on the flush performed before a fatal exit.
    pub fatal_flush_timeout: Duration,
    /// Stacks recorded by fatal entries.
    pub stack_policy: StackPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: None,
            identity: None,
            build: String::new(),
            stderr_threshold: Threshold::INFO,
            file_threshold: Threshold::INFO,
            verbosity: 0,
            vmodule: Vec::new(),
            trace_location: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            combined_max_size: DEFAULT_COMBINED_MAX_SIZE,
            no_color: false,
            no_stderr_redirect: false,
            disable_daemons: false,
            sync_writes: false,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            gc_interval: DEFAULT_GC_INTERVAL,
            fatal_flush_timeout: DEFAULT_FATAL_FLUSH_TIMEOUT,
            stack_policy: StackPolicy::from_env(),
        }
    }
}

impl Config {
    /// Default configuration writing files under `dir`.
    #[must_use]
    pub fn with_log_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// Applies an override list such as `server=2,net*=3`.
    pub fn apply_vmodule(&mut self, value: &str) -> Result<(), ConfigSyntaxError> {
        self.vmodule = parse_vmodule(value)?;
        Ok(())
    }

    /// Applies a trace location; an empty value clears it.
    pub fn apply_trace_location(&mut self, value: &str) -> Result<(), ConfigSyntaxError> {
        self.trace_location = TraceLocation::parse(value)?;
        Ok(())
    }

    /// Applies a global verbosity level.
    pub fn apply_verbosity(&mut self, value: &str) -> Result<(), ConfigSyntaxError> {
        self.verbosity = parse_verbosity(value)?;
        Ok(())
    }

    /// Applies the stderr threshold by name or number.
    pub fn apply_stderr_threshold(&mut self, value: &str) -> Result<(), ConfigSyntaxError> {
        self.stderr_threshold = value.parse()?;
        Ok(())
    }

    /// Applies the file threshold by name or number.
    pub fn apply_file_threshold(&mut self, value: &str) -> Result<(), ConfigSyntaxError> {
        self.file_threshold = value.parse()?;
        Ok(())
    }

    /// Reports whether stderr should be redirected into each new log file.
    ///
    /// Redirection happens when the file is the only place INFO output goes.
    #[must_use]
    pub fn redirects_stderr(&self) -> bool {
        redirects_stderr(self.stderr_threshold, self.no_stderr_redirect)
    }
}

pub(crate) const fn redirects_stderr(stderr_threshold: Threshold, no_redirect: bool) -> bool {
    stderr_threshold.0 > Threshold::INFO.0 && !no_redirect
}

/// Parses a global verbosity level.
pub fn parse_verbosity(value: &str) -> Result<i32, ConfigSyntaxError> {
    value.parse().map_err(|_| ConfigSyntaxError::Verbosity {
        value: value.to_owned(),
    })
}
