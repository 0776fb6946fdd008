//! crates/logging-sink/src/retention.rs
//! Disk-bounded garbage collection of old log files.
//!
//! A pass lists the files belonging to one program, orders them newest
//! first by the creation time encoded in their names, and walks them while
//! accumulating sizes. The newest file is always retained. Once the running
//! total of the files kept so far reaches the combined budget, every older
//! file is deleted. Nothing is cached between passes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use time::OffsetDateTime;

use crate::error::RetentionScanError;
use crate::naming::LogFileName;
use crate::trace;

/// Default combined size budget for all retained files (100 MiB).
pub const DEFAULT_COMBINED_MAX_SIZE: u64 = 100 * 1024 * 1024;

/// One log file as seen by a retention pass.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogFileInfo {
    /// File name within the log directory.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time reported by the filesystem.
    pub modified: SystemTime,
    /// Creation time decoded from the file name.
    pub created: OffsetDateTime,
}

/// Result of a retention pass that managed to list the directory.
#[derive(Debug, Default)]
pub struct RetentionReport {
    /// Number of log files considered.
    pub scanned: usize,
    /// Files that were removed.
    pub deleted: Vec<PathBuf>,
    /// Files that could not be removed, with the reason.
    pub failures: Vec<(PathBuf, io::Error)>,
}

/// Lists the log files of `program` in `dir`, newest first.
///
/// Entries that do not follow the naming scheme, belong to another program,
/// or are not regular files (such as the latest-file symlink) are skipped.
pub fn list_log_files(dir: &Path, program: &str) -> Result<Vec<LogFileInfo>, RetentionScanError> {
    let scan_error = |source| RetentionScanError::new(dir.to_path_buf(), source);
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(scan_error)? {
        let entry = entry.map_err(scan_error)?;
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        let Some(parsed) = LogFileName::parse(&name) else {
            continue;
        };
        if parsed.program != program {
            continue;
        }
        let metadata = entry.metadata().map_err(scan_error)?;
        files.push(LogFileInfo {
            name,
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            created: parsed.created,
        });
    }
    sort_newest_first(&mut files);
    Ok(files)
}

/// Orders files newest first; ties fall back to reverse name order.
pub fn sort_newest_first(files: &mut [LogFileInfo]) {
    files.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.name.cmp(&a.name)));
}

/// Returns the tail of `files` (ordered newest first) that exceeds `budget`.
///
/// The first file is never part of the result.
#[must_use]
pub fn select_expired(files: &[LogFileInfo], budget: u64) -> &[LogFileInfo] {
    let mut retained: u64 = 0;
    for (index, file) in files.iter().enumerate() {
        if index > 0 && retained >= budget {
            return &files[index..];
        }
        retained = retained.saturating_add(file.size);
    }
    &[]
}

/// Runs one retention pass over `dir`.
///
/// Failing to list the directory abandons the pass. Failing to delete an
/// individual file is recorded in the report and the pass continues.
pub fn gc_old_files(
    dir: &Path,
    program: &str,
    budget: u64,
) -> Result<RetentionReport, RetentionScanError> {
    let files = list_log_files(dir, program)?;
    let mut report = RetentionReport {
        scanned: files.len(),
        ..RetentionReport::default()
    };
    for file in select_expired(&files, budget) {
        let path = dir.join(&file.name);
        match fs::remove_file(&path) {
            Ok(()) => report.deleted.push(path),
            Err(error) => report.failures.push((path, error)),
        }
    }
    trace::trace_retention_pass(dir, report.scanned, report.deleted.len());
    Ok(report)
}
