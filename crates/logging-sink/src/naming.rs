//! crates/logging-sink/src/naming.rs
//! Process identity and the log file naming scheme.
//!
//! Every log file is named
//! `{program}.{host}.{user}.{YYYY-MM-DDTHH_MM_SS}Z.{pid}.log`, with the
//! creation time rendered in UTC. Host and user components are sanitised so
//! they never contain `.`, which lets [`LogFileName::parse`] split names from
//! the right even when the program name itself contains dots.

use std::path::Path;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

const FILE_SUFFIX: &str = ".log";
const CREATED_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]_[minute]_[second]");

/// Host, user, and build identity of the running process.
///
/// The identity names rotated files and fills in the preamble written at the
/// top of each one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    /// Program name, normally the basename of `argv[0]`.
    pub program: String,
    /// Short host name (domain stripped).
    pub host: String,
    /// Name of the user running the process.
    pub user: String,
    /// Process id.
    pub pid: u32,
    /// Build signature recorded in every preamble.
    pub build: String,
    /// Process arguments recorded in every preamble.
    pub arguments: Vec<String>,
}

impl Identity {
    /// Detects the identity of the current process.
    ///
    /// Lookups that fail fall back to `unknownhost` / `unknownuser` rather
    /// than erroring, because naming must never prevent logging.
    #[must_use]
    pub fn detect(build: impl Into<String>) -> Self {
        let arguments: Vec<String> = std::env::args().collect();
        let program = arguments
            .first()
            .and_then(|arg0| Path::new(arg0).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "log".to_owned());

        Self {
            program,
            host: short_host(&detect_host()),
            user: sanitize_component(&detect_user(), "unknownuser"),
            pid: std::process::id(),
            build: build.into(),
            arguments,
        }
    }
}

#[cfg(unix)]
fn detect_host() -> String {
    nix::unistd::gethostname()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(not(unix))]
fn detect_host() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_default()
}

#[cfg(unix)]
fn detect_user() -> String {
    nix::unistd::User::from_uid(nix::unistd::getuid())
        .ok()
        .flatten()
        .map(|user| user.name)
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_default()
}

#[cfg(not(unix))]
fn detect_user() -> String {
    std::env::var("USERNAME").unwrap_or_default()
}

fn short_host(host: &str) -> String {
    let short = host.split('.').next().unwrap_or_default();
    sanitize_component(short, "unknownhost")
}

fn sanitize_component(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        return fallback.to_owned();
    }
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Structured form of a log file name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogFileName {
    /// Program component.
    pub program: String,
    /// Host component.
    pub host: String,
    /// User component.
    pub user: String,
    /// Creation time, UTC, second resolution.
    pub created: OffsetDateTime,
    /// Process id component.
    pub pid: u32,
}

impl LogFileName {
    /// Builds the name for a file created by `identity` at `created`.
    #[must_use]
    pub fn new(identity: &Identity, created: OffsetDateTime) -> Self {
        let created = created.to_offset(time::UtcOffset::UTC);
        Self {
            program: identity.program.clone(),
            host: identity.host.clone(),
            user: identity.user.clone(),
            created: created.replace_nanosecond(0).unwrap_or(created),
            pid: identity.pid,
        }
    }

    /// Renders the on-disk file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        let created = PrimitiveDateTime::new(self.created.date(), self.created.time())
            .format(CREATED_FORMAT)
            .unwrap_or_default();
        format!(
            "{}.{}.{}.{}Z.{}{FILE_SUFFIX}",
            self.program, self.host, self.user, created, self.pid
        )
    }

    /// Parses a file name produced by [`file_name`](Self::file_name).
    ///
    /// Returns `None` for anything that does not follow the naming scheme,
    /// including the `{program}.log` symlink.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(FILE_SUFFIX)?;
        let mut parts = stem.rsplitn(5, '.');
        let pid = parts.next()?.parse().ok()?;
        let created = parts.next()?.strip_suffix('Z')?;
        let user = parts.next()?;
        let host = parts.next()?;
        let program = parts.next()?;
        if program.is_empty() || host.is_empty() || user.is_empty() {
            return None;
        }
        let created = PrimitiveDateTime::parse(created, CREATED_FORMAT)
            .ok()?
            .assume_utc();
        Some(Self {
            program: program.to_owned(),
            host: host.to_owned(),
            user: user.to_owned(),
            created,
            pid,
        })
    }

    /// Name of the symlink that tracks the newest file of `program`.
    #[must_use]
    pub fn symlink_name(program: &str) -> String {
        format!("{program}{FILE_SUFFIX}")
    }
}
