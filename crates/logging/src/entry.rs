//! crates/logging/src/entry.rs
//! The structured form of one log record.

use std::borrow::Cow;

use crate::clock;
use crate::severity::Severity;

/// One log record, produced per call and consumed by the codec.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    /// Severity of the record.
    pub severity: Severity,
    /// Nanoseconds since the Unix epoch.
    pub time: i64,
    /// Id of the emitting thread; 0 when unknown.
    pub thread_id: u64,
    /// Basename of the source file.
    pub file: Cow<'static, str>,
    /// Source line; 0 when unknown.
    pub line: u32,
    /// Message text.
    pub message: String,
    /// Raw stack-trace bytes appended after the message, if any.
    pub stacks: Option<Vec<u8>>,
}

impl Entry {
    /// Builds an entry stamped with the current time and thread id.
    ///
    /// `file` may be a full path; only its basename is kept.
    pub fn now(
        severity: Severity,
        file: impl Into<Cow<'static, str>>,
        line: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            time: clock::now_nanos(),
            thread_id: clock::current_thread_id(),
            file: basename_cow(file.into()),
            line,
            message: message.into(),
            stacks: None,
        }
    }
}

/// Returns the final path component of `path`, accepting either separator.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn basename_cow(file: Cow<'static, str>) -> Cow<'static, str> {
    match file {
        Cow::Borrowed(path) => Cow::Borrowed(basename(path)),
        Cow::Owned(path) => {
            let base = basename(&path);
            if base.len() == path.len() {
                Cow::Owned(path)
            } else {
                Cow::Owned(base.to_owned())
            }
        }
    }
}
