//! crates/logging/src/dispatcher.rs
//! The engine: routing entries to stderr and the log file, and the fatal path.
//!
//! All mutable engine state sits behind a single lock. Hot-path reads
//! (verbosity, override count, thresholds) are atomics outside it, and the
//! buffer pool has its own lock that is only ever taken while this one is
//! held or with no lock at all.

use std::borrow::Cow;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, SystemTime};

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use logging_sink::{
    FileSink, Identity, LogFileInfo, OrigStderr, RetentionScanError, SinkError, SinkOptions,
    capture_original_stderr, gc_old_files, list_log_files,
};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::buffer::{Buffer, BufferPool};
use crate::clock;
use crate::codec::color::ColorProfile;
use crate::codec::encode_entry;
use crate::config::{Config, redirects_stderr};
use crate::daemons::Daemons;
use crate::entry::{Entry, basename};
use crate::error::ConfigSyntaxError;
use crate::severity::{Severity, Threshold};
use crate::stacks::{StackPolicy, capture_stacks};
use crate::trace;
use crate::trace_location::TraceLocation;
use crate::verbosity::{CallSite, GateDecision, ModuleFilter, VerbosityGate, parse_vmodule, render_vmodule};

/// Exit status after a fatal entry.
pub const EXIT_FATAL: i32 = 255;
/// Exit status after a fatal entry logged with stacks suppressed.
pub const EXIT_FATAL_NO_STACKS: i32 = 1;
/// Exit status after the log file could not be created or written.
pub const EXIT_IO_ERROR: i32 = 2;

/// Function called to terminate the process.
pub type ExitFn = Arc<dyn Fn(i32) + Send + Sync>;

const PREAMBLE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]/[month]/[day] [hour]:[minute]:[second]");

struct Settings {
    log_dir: Option<PathBuf>,
    identity: Identity,
    no_stderr_redirect: bool,
    stack_policy: StackPolicy,
    fatal_flush_timeout: Duration,
}

struct State {
    filter: ModuleFilter,
    trace_location: Option<TraceLocation>,
    sink: Option<FileSink>,
    max_file_size: u64,
    sync_writes: bool,
    exit: ExitFn,
    stderr: Box<dyn Write + Send>,
    stderr_replaced: bool,
    colors: Option<&'static ColorProfile>,
    daemons: Option<Daemons>,
}

pub(crate) struct Inner {
    gate: VerbosityGate,
    stderr_threshold: AtomicI32,
    file_threshold: AtomicI32,
    no_stacks: AtomicBool,
    combined_max_size: AtomicU64,
    pool: BufferPool,
    settings: Settings,
    gc_notify: Sender<()>,
    state: Mutex<State>,
}

/// Handle to a logging engine.
///
/// Cloning is cheap; all clones share the same engine. Background daemons
/// keep running until [`shutdown`](Self::shutdown) is called or the last
/// handle is dropped.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Builds an engine from `config` and starts its daemons.
    ///
    /// No file is created until the first entry is routed to it.
    #[must_use]
    pub fn new(config: Config) -> Self {
        capture_original_stderr();

        let Config {
            log_dir,
            identity,
            build,
            stderr_threshold,
            file_threshold,
            verbosity,
            vmodule,
            trace_location,
            max_file_size,
            combined_max_size,
            no_color,
            no_stderr_redirect,
            disable_daemons,
            sync_writes,
            flush_interval,
            gc_interval,
            fatal_flush_timeout,
            stack_policy,
        } = config;

        let identity = identity.unwrap_or_else(|| Identity::detect(build));
        let gate = VerbosityGate::new();
        let mut filter = ModuleFilter::default();
        gate.reconfigure(&mut filter, verbosity, Some(vmodule));
        let (gc_notify, gc_events) = bounded(1);
        let has_log_dir = log_dir.is_some();

        let inner = Arc::new(Inner {
            gate,
            stderr_threshold: AtomicI32::new(stderr_threshold.0),
            file_threshold: AtomicI32::new(file_threshold.0),
            no_stacks: AtomicBool::new(false),
            combined_max_size: AtomicU64::new(combined_max_size),
            pool: BufferPool::new(),
            settings: Settings {
                log_dir,
                identity,
                no_stderr_redirect,
                stack_policy,
                fatal_flush_timeout,
            },
            gc_notify,
            state: Mutex::new(State {
                filter,
                trace_location,
                sink: None,
                max_file_size,
                sync_writes,
                exit: Arc::new(process_exit),
                stderr: Box::new(OrigStderr),
                stderr_replaced: false,
                colors: ColorProfile::detect(no_color),
                daemons: None,
            }),
        });

        if !disable_daemons {
            let retention = has_log_dir.then_some((gc_events, gc_interval));
            let daemons = Daemons::spawn(&inner, flush_interval, retention);
            inner.lock().daemons = Some(daemons);
        }
        Self { inner }
    }

    /// Reports whether a verbosity-gated call at `site` fires for `level`.
    pub fn enabled(&self, level: i32, site: &'static CallSite) -> bool {
        match self.inner.gate.quick_check(level) {
            GateDecision::Enabled => true,
            GateDecision::Disabled => false,
            GateDecision::NeedsLookup => self.inner.lock().filter.resolve(site) >= level,
        }
    }

    /// Records one entry.
    ///
    /// A [`Severity::Fatal`] entry does not return normally: after it has
    /// been written the buffers are flushed (bounded by the configured
    /// timeout) and the exit function is called.
    pub fn log(
        &self,
        severity: Severity,
        file: impl Into<Cow<'static, str>>,
        line: u32,
        message: impl Into<String>,
    ) {
        self.emit(severity, file.into(), line, message.into());
    }

    fn emit(&self, severity: Severity, file: Cow<'static, str>, line: u32, message: String) {
        let inner = &*self.inner;
        let mut state = inner.lock();

        let mut entry = Entry::now(severity, file, line, message);
        if severity == Severity::Fatal {
            if !inner.no_stacks.load(Ordering::Acquire) {
                entry.stacks = inner.settings.stack_policy.capture();
            }
        } else if state
            .trace_location
            .as_ref()
            .is_some_and(|location| location.matches(&entry.file, entry.line))
        {
            entry.stacks = Some(capture_stacks(false));
        }

        let to_stderr = self.logging_to_stderr(severity);
        if to_stderr {
            inner.write_stderr(&mut state, &entry);
        }
        if inner.settings.log_dir.is_some() && self.file_threshold().admits(severity) {
            if let Err(error) = inner.write_file(&mut state, &entry) {
                if !to_stderr {
                    inner.write_stderr(&mut state, &entry);
                }
                if severity != Severity::Fatal {
                    drop(state);
                    self.exit_on_error(&error);
                    return;
                }
                // A fatal entry keeps its own exit status.
                state.diagnostic(format_args!("log: exiting because of error: {error}"));
            }
        }

        let exit = Arc::clone(&state.exit);
        drop(state);

        if severity == Severity::Fatal {
            self.timeout_flush(inner.settings.fatal_flush_timeout);
            let code = if inner.no_stacks.load(Ordering::Acquire) {
                EXIT_FATAL_NO_STACKS
            } else {
                EXIT_FATAL
            };
            trace::trace_exit(code);
            exit(code);
        }
    }

    fn exit_on_error(&self, error: &SinkError) {
        let mut state = self.inner.lock();
        state.diagnostic(format_args!("log: exiting because of error: {error}"));
        let _ = state.stderr.flush();
        if let Some(sink) = state.sink.as_mut() {
            let _ = sink.flush();
        }
        let exit = Arc::clone(&state.exit);
        drop(state);
        trace::trace_exit(EXIT_IO_ERROR);
        exit(EXIT_IO_ERROR);
    }

    fn timeout_flush(&self, timeout: Duration) {
        let (done, finished) = bounded(1);
        let inner = Arc::clone(&self.inner);
        let spawned = thread::Builder::new()
            .name("log-fatal-flush".to_owned())
            .spawn(move || {
                let _ = inner.flush();
                let _ = done.send(());
            });
        if spawned.is_err() {
            let _ = self.inner.flush();
            return;
        }
        if let Err(RecvTimeoutError::Timeout) = finished.recv_timeout(timeout) {
            let _ = writeln!(OrigStderr, "log: flush took longer than {timeout:?}");
        }
    }

    /// Global verbosity level.
    #[must_use]
    pub fn verbosity(&self) -> i32 {
        self.inner.gate.verbosity()
    }

    /// Sets the global verbosity level, keeping the override list.
    pub fn set_verbosity(&self, verbosity: i32) {
        let mut state = self.inner.lock();
        self.inner.gate.reconfigure(&mut state.filter, verbosity, None);
        trace::trace_reconfigured(verbosity, state.filter.patterns().len());
    }

    /// Replaces the override list from `pattern=level,...` syntax.
    ///
    /// On error the previous list stays in force.
    pub fn set_vmodule(&self, value: &str) -> Result<(), ConfigSyntaxError> {
        let patterns = parse_vmodule(value)?;
        let mut state = self.inner.lock();
        let verbosity = self.inner.gate.verbosity();
        self.inner
            .gate
            .reconfigure(&mut state.filter, verbosity, Some(patterns));
        trace::trace_reconfigured(verbosity, state.filter.patterns().len());
        Ok(())
    }

    /// Current override list in `pattern=level,...` syntax.
    #[must_use]
    pub fn vmodule(&self) -> String {
        render_vmodule(self.inner.lock().filter.patterns())
    }

    /// Sets the trace location from `file.ext:line`; empty clears it.
    pub fn set_trace_location(&self, value: &str) -> Result<(), ConfigSyntaxError> {
        let location = TraceLocation::parse(value)?;
        self.inner.lock().trace_location = location;
        Ok(())
    }

    /// Current trace location.
    #[must_use]
    pub fn trace_location(&self) -> Option<TraceLocation> {
        self.inner.lock().trace_location.clone()
    }

    /// Minimum severity copied to stderr.
    #[must_use]
    pub fn stderr_threshold(&self) -> Threshold {
        Threshold(self.inner.stderr_threshold.load(Ordering::Acquire))
    }

    /// Changes the minimum severity copied to stderr.
    ///
    /// Also decides whether later rotations redirect fd 2 into the log file.
    pub fn set_stderr_threshold(&self, threshold: Threshold) {
        let mut state = self.inner.lock();
        self.inner
            .stderr_threshold
            .store(threshold.0, Ordering::Release);
        let redirect = redirects_stderr(threshold, self.inner.settings.no_stderr_redirect);
        if let Some(sink) = state.sink.as_mut() {
            sink.set_redirect_stderr(redirect);
        }
    }

    /// Minimum severity written to the log file.
    #[must_use]
    pub fn file_threshold(&self) -> Threshold {
        Threshold(self.inner.file_threshold.load(Ordering::Acquire))
    }

    /// Changes the minimum severity written to the log file.
    pub fn set_file_threshold(&self, threshold: Threshold) {
        self.inner
            .file_threshold
            .store(threshold.0, Ordering::Release);
    }

    /// Reports whether entries of `severity` are visible on stderr.
    #[must_use]
    pub fn logging_to_stderr(&self, severity: Severity) -> bool {
        self.stderr_threshold().admits(severity)
    }

    /// Enables or disables flushing and syncing after every entry.
    ///
    /// Enabling also flushes whatever is already buffered.
    pub fn set_sync(&self, sync: bool) {
        self.inner.lock().sync_writes = sync;
        if sync {
            let _ = self.flush();
        }
    }

    /// Suppresses stack dumps on fatal entries and changes the fatal exit
    /// status to [`EXIT_FATAL_NO_STACKS`].
    pub fn set_fatal_no_stacks(&self, no_stacks: bool) {
        self.inner.no_stacks.store(no_stacks, Ordering::Release);
    }

    /// Changes the per-file size ceiling.
    pub fn set_max_file_size(&self, max_file_size: u64) {
        let mut state = self.inner.lock();
        state.max_file_size = max_file_size;
        if let Some(sink) = state.sink.as_mut() {
            sink.set_max_file_size(max_file_size);
        }
    }

    /// Combined size budget for retained files.
    #[must_use]
    pub fn combined_max_size(&self) -> u64 {
        self.inner.combined_max_size.load(Ordering::Relaxed)
    }

    /// Changes the combined size budget used by later retention passes.
    pub fn set_combined_max_size(&self, budget: u64) {
        self.inner.combined_max_size.store(budget, Ordering::Relaxed);
    }

    /// Replaces the function called to terminate the process.
    pub fn set_exit_fn(&self, exit: impl Fn(i32) + Send + Sync + 'static) {
        self.inner.lock().exit = Arc::new(exit);
    }

    /// Sends stderr output to `writer` instead of the original stderr.
    ///
    /// Engine diagnostics still reach the original stderr and are copied to
    /// `writer`. Colour is turned off.
    pub fn set_stderr_writer(&self, writer: impl Write + Send + 'static) {
        let mut state = self.inner.lock();
        state.stderr = Box::new(writer);
        state.stderr_replaced = true;
        state.colors = None;
    }

    /// Overrides the colour profile used for stderr output.
    pub fn set_color_profile(&self, colors: Option<&'static ColorProfile>) {
        self.inner.lock().colors = colors;
    }

    /// Flushes the stderr writer and buffered entries, and syncs the log file.
    pub fn flush(&self) -> Result<(), SinkError> {
        self.inner.flush()
    }

    /// Flushes and closes the log file, restoring stderr if it was
    /// redirected. The next file-bound entry opens a new file.
    pub fn close_file(&self) -> Result<(), SinkError> {
        let mut state = self.inner.lock();
        let Some(sink) = state.sink.as_mut() else {
            return Ok(());
        };
        sink.flush()?;
        sink.close()
    }

    /// Path of the file currently receiving entries.
    #[must_use]
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.inner
            .lock()
            .sink
            .as_ref()
            .and_then(FileSink::path)
            .map(Path::to_path_buf)
    }

    /// Configured log directory.
    #[must_use]
    pub fn log_dir(&self) -> Option<&Path> {
        self.inner.settings.log_dir.as_deref()
    }

    /// Identity used to name log files.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.inner.settings.identity
    }

    /// Log files of this program in the log directory, newest first.
    pub fn list_log_files(&self) -> Result<Vec<LogFileInfo>, RetentionScanError> {
        match self.log_dir() {
            Some(dir) => list_log_files(dir, &self.inner.settings.identity.program),
            None => Ok(Vec::new()),
        }
    }

    /// Runs one retention pass immediately.
    pub fn gc_old_files(&self) {
        self.inner.retention_pass();
    }

    /// Stops the daemons, waits for them, and flushes the log file.
    pub fn shutdown(&self) {
        let daemons = self.inner.lock().daemons.take();
        if let Some(daemons) = daemons {
            daemons.stop();
        }
        let _ = self.flush();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("log_dir", &self.inner.settings.log_dir)
            .field("verbosity", &self.verbosity())
            .field("stderr_threshold", &self.stderr_threshold())
            .field("file_threshold", &self.file_threshold())
            .finish_non_exhaustive()
    }
}

impl State {
    /// Writes an engine diagnostic to the original stderr, and to the
    /// replacement writer when one is installed.
    fn diagnostic(&mut self, message: fmt::Arguments<'_>) {
        let _ = writeln!(OrigStderr, "{message}");
        if self.stderr_replaced {
            let _ = writeln!(self.stderr, "{message}");
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_stderr(&self, state: &mut State, entry: &Entry) {
        let mut buf = self.pool.acquire();
        encode_entry(&mut buf, entry, state.colors);
        let _ = state.stderr.write_all(buf.as_bytes());
    }

    fn write_file(&self, state: &mut State, entry: &Entry) -> Result<(), SinkError> {
        let sync_writes = state.sync_writes;
        let sink = match state.sink.take() {
            Some(sink) => sink,
            None => self.create_sink(state.max_file_size)?,
        };
        let sink = state.sink.insert(sink);

        let mut buf = self.pool.acquire();
        encode_entry(&mut buf, entry, None);
        sink.write(buf.as_bytes())?;
        if sync_writes {
            let _ = sink.flush();
        }
        Ok(())
    }

    fn create_sink(&self, max_file_size: u64) -> Result<FileSink, SinkError> {
        let dir = self.settings.log_dir.clone().unwrap_or_default();
        let identity = self.settings.identity.clone();
        let redirect = redirects_stderr(
            Threshold(self.stderr_threshold.load(Ordering::Acquire)),
            self.settings.no_stderr_redirect,
        );
        let preamble = preamble_writer(identity.clone());
        FileSink::create(
            SinkOptions {
                dir,
                identity,
                max_file_size,
            },
            Box::new(preamble),
            Some(self.gc_notify.clone()),
            redirect,
        )
    }

    pub(crate) fn flush(&self) -> Result<(), SinkError> {
        let mut state = self.lock();
        let _ = state.stderr.flush();
        let result = state.sink.as_mut().map_or(Ok(()), FileSink::flush);
        trace::trace_flush(result.is_ok());
        result
    }

    pub(crate) fn retention_pass(&self) {
        let Some(dir) = self.settings.log_dir.as_deref() else {
            return;
        };
        // Nothing to collect before the first file creates the directory.
        if matches!(dir.try_exists(), Ok(false)) {
            return;
        }
        let budget = self.combined_max_size.load(Ordering::Relaxed);
        match gc_old_files(dir, &self.settings.identity.program, budget) {
            Ok(report) => {
                for (path, error) in &report.failures {
                    self.report(format_args!("log: unable to remove '{}': {error}", path.display()));
                }
            }
            Err(error) => self.report(format_args!("log: {error}")),
        }
    }

    pub(crate) fn report(&self, message: fmt::Arguments<'_>) {
        self.lock().diagnostic(message);
    }
}

fn process_exit(code: i32) {
    std::process::exit(code)
}

/// Renders the block written at the top of every log file, as INFO entries.
fn preamble_writer(identity: Identity) -> impl Fn(SystemTime, &mut Vec<u8>) + Send + 'static {
    move |created, out| {
        let time = clock::unix_nanos(created);
        let created_at = clock::to_local(time)
            .format(PREAMBLE_TIME)
            .unwrap_or_default();
        let thread_id = clock::current_thread_id();
        let messages = [
            format!("[config] file created at: {created_at}\n"),
            format!("[config] running on machine: {}\n", identity.host),
            format!("[config] binary: {}\n", identity.build),
            format!("[config] arguments: [{}]\n", identity.arguments.join(" ")),
            "line format: [IWEF]yymmdd hh:mm:ss.uuuuuu tid file:line msg utf8=\u{2713}\n".to_owned(),
        ];
        let mut buf = Buffer::new();
        for message in messages {
            buf.clear();
            let entry = Entry {
                severity: Severity::Info,
                time,
                thread_id,
                file: Cow::Borrowed(basename(file!())),
                line: line!(),
                message,
                stacks: None,
            };
            encode_entry(&mut buf, &entry, None);
            out.extend_from_slice(buf.as_bytes());
        }
    }
}

#[cfg(test)]
pub(crate) fn test_preamble(identity: Identity) -> Vec<u8> {
    let mut out = Vec::new();
    preamble_writer(identity)(SystemTime::now(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::AtomicUsize;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn identity() -> Identity {
        Identity {
            program: "unit".to_owned(),
            host: "host".to_owned(),
            user: "user".to_owned(),
            pid: 1,
            build: "v1".to_owned(),
            arguments: vec!["unit".to_owned(), "--flag".to_owned()],
        }
    }

    fn quiet_config() -> Config {
        Config {
            identity: Some(identity()),
            disable_daemons: true,
            no_stderr_redirect: true,
            no_color: true,
            stack_policy: StackPolicy::Single,
            ..Config::default()
        }
    }

    #[test]
    fn preamble_lines_are_info_entries() {
        let text = String::from_utf8(test_preamble(identity())).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| line.starts_with('I')));
        assert!(lines[1].ends_with("[config] running on machine: host"));
        assert!(lines[2].ends_with("[config] binary: v1"));
        assert!(lines[3].ends_with("[config] arguments: [unit --flag]"));
        assert!(lines[4].ends_with("utf8=\u{2713}"));
    }

    #[test]
    fn stderr_routing_follows_threshold() {
        let logger = Logger::new(quiet_config());
        let captured = Captured::default();
        logger.set_stderr_writer(captured.clone());
        logger.set_stderr_threshold(Threshold::WARNING);

        logger.log(Severity::Info, "a.rs", 1, "hidden");
        logger.log(Severity::Warning, "a.rs", 2, "shown");

        let text = captured.text();
        assert!(!text.contains("hidden"));
        assert!(text.starts_with('W'));
        assert!(text.contains("a.rs:2  shown\n"));
        assert!(logger.logging_to_stderr(Severity::Error));
        assert!(!logger.logging_to_stderr(Severity::Info));
    }

    #[test]
    fn fatal_exits_with_255_after_writing() {
        let logger = Logger::new(quiet_config());
        let captured = Captured::default();
        let code = Arc::new(AtomicI32::new(0));
        let calls = Arc::new(AtomicUsize::new(0));
        logger.set_stderr_writer(captured.clone());
        {
            let code = Arc::clone(&code);
            let calls = Arc::clone(&calls);
            logger.set_exit_fn(move |status| {
                code.store(status, Ordering::SeqCst);
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        logger.log(Severity::Fatal, "main.rs", 9, "cannot continue");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(code.load(Ordering::SeqCst), EXIT_FATAL);
        let text = captured.text();
        assert!(text.starts_with('F'));
        assert!(text.contains("thread '"));
    }

    #[test]
    fn no_stacks_override_changes_status_and_drops_stacks() {
        let logger = Logger::new(quiet_config());
        let captured = Captured::default();
        let code = Arc::new(AtomicI32::new(0));
        logger.set_stderr_writer(captured.clone());
        {
            let code = Arc::clone(&code);
            logger.set_exit_fn(move |status| code.store(status, Ordering::SeqCst));
        }
        logger.set_fatal_no_stacks(true);

        logger.log(Severity::Fatal, "main.rs", 9, "bye");
        assert_eq!(code.load(Ordering::SeqCst), EXIT_FATAL_NO_STACKS);
        assert_eq!(captured.text().lines().count(), 1);
    }

    #[test]
    fn trace_location_attaches_stack_to_matching_entry() {
        let logger = Logger::new(quiet_config());
        let captured = Captured::default();
        logger.set_stderr_writer(captured.clone());
        logger.set_trace_location("hot.rs:7").expect("location");

        logger.log(Severity::Info, "src/hot.rs", 8, "miss");
        logger.log(Severity::Info, "src/hot.rs", 7, "hit");

        let text = captured.text();
        let hit = text.find("hit").expect("hit logged");
        assert!(!text[..hit].contains("thread '"));
        assert!(text[hit..].contains("thread '"));
        assert_eq!(
            logger.trace_location().map(|location| location.to_string()),
            Some("hot.rs:7".to_owned())
        );
    }

    #[test]
    fn rejected_settings_keep_previous_values() {
        let logger = Logger::new(quiet_config());
        logger.set_vmodule("net*=2").expect("vmodule");
        assert!(logger.set_vmodule("net*=-2").is_err());
        assert_eq!(logger.vmodule(), "net*=2");

        logger.set_trace_location("a.rs:1").expect("location");
        assert!(logger.set_trace_location("a.rs:0").is_err());
        assert_eq!(logger.trace_location().map(|l| l.line()), Some(1));
    }
}
