//! crates/logging-sink/src/stderr.rs
//! Access to the process's original stderr and fd-level redirection.
//!
//! When log files are the only destination for diagnostics, runtime crash
//! output (panics, aborts from native code) should land in the newest log
//! file rather than a stderr nobody reads. The sink therefore redirects file
//! descriptor 2 to each new file. Engine diagnostics that must reach the
//! operator regardless go through [`OrigStderr`], a duplicate of fd 2 taken
//! before any redirection happened.

use std::fs::File;
use std::io::{self, Write};
use std::sync::OnceLock;

static ORIGINAL: OnceLock<Option<File>> = OnceLock::new();

fn original() -> Option<&'static File> {
    ORIGINAL.get_or_init(duplicate_stderr).as_ref()
}

#[cfg(unix)]
fn duplicate_stderr() -> Option<File> {
    use std::os::fd::AsFd;

    io::stderr()
        .as_fd()
        .try_clone_to_owned()
        .ok()
        .map(File::from)
}

#[cfg(not(unix))]
fn duplicate_stderr() -> Option<File> {
    None
}

/// Captures the original stderr descriptor.
///
/// Called by the engine at construction so the duplicate predates any
/// redirection. Later calls are no-ops.
pub fn capture_original_stderr() {
    let _ = original();
}

/// Writer for the stderr stream as it was before any redirection.
///
/// Falls back to the live [`io::stderr`] if the descriptor could not be
/// duplicated.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrigStderr;

impl Write for OrigStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match original() {
            Some(mut file) => file.write(buf),
            None => io::stderr().write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match original() {
            Some(mut file) => file.write_all(buf),
            None => io::stderr().write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match original() {
            Some(mut file) => file.flush(),
            None => io::stderr().flush(),
        }
    }
}

/// Points fd 2 at `file`.
#[cfg(unix)]
pub fn hijack_stderr(file: &File) -> io::Result<()> {
    use std::os::fd::AsRawFd;

    capture_original_stderr();
    nix::unistd::dup2(file.as_raw_fd(), STDERR_FD)
        .map(drop)
        .map_err(io::Error::from)
}

/// Points fd 2 back at the original stderr.
#[cfg(unix)]
pub fn restore_stderr() -> io::Result<()> {
    use std::os::fd::AsRawFd;

    match original() {
        Some(file) => nix::unistd::dup2(file.as_raw_fd(), STDERR_FD)
            .map(drop)
            .map_err(io::Error::from),
        None => Ok(()),
    }
}

#[cfg(unix)]
const STDERR_FD: std::os::fd::RawFd = 2;

/// Redirection is unsupported on this platform; the call succeeds without effect.
#[cfg(not(unix))]
pub fn hijack_stderr(_file: &File) -> io::Result<()> {
    Ok(())
}

/// Redirection is unsupported on this platform; the call succeeds without effect.
#[cfg(not(unix))]
pub fn restore_stderr() -> io::Result<()> {
    Ok(())
}
