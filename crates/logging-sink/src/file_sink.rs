//! crates/logging-sink/src/file_sink.rs
//! Size-rotating, buffered log file destination.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam_channel::Sender;
use time::OffsetDateTime;

use crate::error::SinkError;
use crate::naming::{Identity, LogFileName};
use crate::stderr;
use crate::trace;

/// Default per-file size ceiling (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Capacity of the buffered writer in front of each file.
///
/// Large enough that records accumulate without the logging thread blocking
/// on disk; the flush daemon absorbs the I/O instead.
pub const WRITE_BUFFER_SIZE: usize = 256 * 1024;

/// Produces the fixed block written at the top of every new file.
pub trait Preamble: Send {
    /// Appends the preamble for a file created at `created` to `out`.
    fn render(&self, created: SystemTime, out: &mut Vec<u8>);
}

impl<F> Preamble for F
where
    F: Fn(SystemTime, &mut Vec<u8>) + Send,
{
    fn render(&self, created: SystemTime, out: &mut Vec<u8>) {
        self(created, out);
    }
}

/// Static parameters of a [`FileSink`].
#[derive(Clone, Debug)]
pub struct SinkOptions {
    /// Directory receiving the log files.
    pub dir: PathBuf,
    /// Identity used to name files.
    pub identity: Identity,
    /// Rotate once a write would bring the file to this many bytes.
    pub max_file_size: u64,
}

struct OpenFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// Append-only log file that rotates itself at a size ceiling.
///
/// The sink owns exactly one file at a time. It is not internally
/// synchronised: the dispatcher keeps it behind its main lock, which also
/// serialises rotations against writes.
pub struct FileSink {
    options: SinkOptions,
    preamble: Box<dyn Preamble>,
    notify: Option<Sender<()>>,
    redirect_stderr: bool,
    redirected: bool,
    current: Option<OpenFile>,
    last_rotation: i64,
    nbytes: u64,
    rotations: u64,
}

impl FileSink {
    /// Creates a sink and opens its first file.
    pub fn create(
        options: SinkOptions,
        preamble: Box<dyn Preamble>,
        notify: Option<Sender<()>>,
        redirect_stderr: bool,
    ) -> Result<Self, SinkError> {
        let mut sink = Self {
            options,
            preamble,
            notify,
            redirect_stderr,
            redirected: false,
            current: None,
            last_rotation: 0,
            nbytes: 0,
            rotations: 0,
        };
        sink.rotate(SystemTime::now())?;
        Ok(sink)
    }

    /// Controls whether future rotations redirect fd 2 to the new file.
    pub fn set_redirect_stderr(&mut self, redirect: bool) {
        self.redirect_stderr = redirect;
    }

    /// Updates the size ceiling applied to subsequent writes.
    pub fn set_max_file_size(&mut self, max_file_size: u64) {
        self.options.max_file_size = max_file_size;
    }

    /// Path of the file currently receiving writes.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.current.as_ref().map(|current| current.path.as_path())
    }

    /// Bytes written to the current file, preamble included.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.nbytes
    }

    /// Number of files opened by this sink so far.
    #[must_use]
    pub const fn rotations(&self) -> u64 {
        self.rotations
    }

    /// Appends `data`, rotating first when it would reach the size ceiling.
    pub fn write(&mut self, data: &[u8]) -> Result<(), SinkError> {
        let len = data.len() as u64;
        if self.current.is_none() || self.nbytes + len >= self.options.max_file_size {
            self.rotate(SystemTime::now())?;
        }
        let Some(current) = self.current.as_mut() else {
            return Err(SinkError::Write {
                path: self.options.dir.clone(),
                source: io::Error::other("log file is not open"),
            });
        };
        current
            .writer
            .write_all(data)
            .map_err(|source| SinkError::Write {
                path: current.path.clone(),
                source,
            })?;
        self.nbytes += len;
        Ok(())
    }

    /// Closes the current file and starts a new one.
    pub fn rotate(&mut self, now: SystemTime) -> Result<(), SinkError> {
        self.close_current()?;

        let created = self.next_creation_time(now);
        fs::create_dir_all(&self.options.dir).map_err(|source| SinkError::CreateDir {
            path: self.options.dir.clone(),
            source,
        })?;
        let name = LogFileName::new(&self.options.identity, created);
        let path = self.options.dir.join(name.file_name());
        self.nbytes = 0;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|source| SinkError::Create {
                path: path.clone(),
                source,
            })?;
        self.last_rotation = created.unix_timestamp();
        update_symlink(&self.options.dir, &self.options.identity.program, &path);

        if self.redirect_stderr {
            stderr::hijack_stderr(&file).map_err(SinkError::Redirect)?;
            self.redirected = true;
        }

        let mut preamble = Vec::new();
        self.preamble.render(SystemTime::from(created), &mut preamble);
        file.write_all(&preamble)
            .map_err(|source| SinkError::Write {
                path: path.clone(),
                source,
            })?;
        self.nbytes += preamble.len() as u64;

        trace::trace_rotated(&path, self.rotations);
        self.current = Some(OpenFile {
            path,
            writer: BufWriter::with_capacity(WRITE_BUFFER_SIZE, file),
        });
        self.rotations += 1;

        if let Some(notify) = &self.notify {
            // A full channel already carries a pending wake-up.
            let _ = notify.try_send(());
        }
        Ok(())
    }

    /// Flushes buffered records and syncs the file to disk.
    pub fn flush(&mut self) -> Result<(), SinkError> {
        let Some(current) = self.current.as_mut() else {
            return Ok(());
        };
        current
            .writer
            .flush()
            .and_then(|()| current.writer.get_ref().sync_all())
            .map_err(|source| SinkError::Write {
                path: current.path.clone(),
                source,
            })
    }

    /// Flushes and closes the current file, restoring stderr if it was redirected.
    pub fn close(&mut self) -> Result<(), SinkError> {
        self.close_current()?;
        if self.redirected {
            self.redirected = false;
            stderr::restore_stderr().map_err(SinkError::Redirect)?;
        }
        Ok(())
    }

    fn close_current(&mut self) -> Result<(), SinkError> {
        if let Some(OpenFile { path, writer }) = self.current.take() {
            writer
                .into_inner()
                .map(drop)
                .map_err(|error| SinkError::Close {
                    path,
                    source: error.into_error(),
                })?;
        }
        Ok(())
    }

    fn next_creation_time(&self, now: SystemTime) -> OffsetDateTime {
        let mut secs = now
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs() as i64);
        if secs <= self.last_rotation {
            secs = self.last_rotation + 1;
        }
        OffsetDateTime::from_unix_timestamp(secs).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("options", &self.options)
            .field("path", &self.path())
            .field("nbytes", &self.nbytes)
            .field("rotations", &self.rotations)
            .finish_non_exhaustive()
    }
}

#[cfg(unix)]
fn update_symlink(dir: &Path, program: &str, target: &Path) {
    let link = dir.join(LogFileName::symlink_name(program));
    let Some(file_name) = target.file_name() else {
        return;
    };
    let _ = fs::remove_file(&link);
    let _ = std::os::unix::fs::symlink(file_name, &link);
}

#[cfg(not(unix))]
fn update_symlink(_dir: &Path, _program: &str, _target: &Path) {}
