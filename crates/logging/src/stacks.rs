//! crates/logging/src/stacks.rs
//! Stack capture for fatal entries and trace locations.

use std::backtrace::Backtrace;
use std::fmt::Write as _;

use crate::clock;

/// Environment variable selecting how much stack a fatal entry records.
pub const TRACEBACK_ENV: &str = "LOG_TRACEBACK";

/// Which stacks a fatal entry records.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StackPolicy {
    /// No stacks.
    None,
    /// The calling thread's stack.
    #[default]
    Single,
    /// The calling thread's stack plus every other thread of the process.
    All,
}

impl StackPolicy {
    /// Reads the policy from [`TRACEBACK_ENV`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(TRACEBACK_ENV).ok().as_deref())
    }

    /// Maps a raw setting to a policy.
    ///
    /// `none` disables stacks; unset, empty and `single` select the calling
    /// thread; anything else selects all threads.
    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("none") => Self::None,
            None | Some("" | "single") => Self::Single,
            Some(_) => Self::All,
        }
    }

    /// Captures the stacks this policy asks for, if any.
    #[must_use]
    pub fn capture(self) -> Option<Vec<u8>> {
        match self {
            Self::None => None,
            Self::Single => Some(capture_stacks(false)),
            Self::All => Some(capture_stacks(true)),
        }
    }
}

/// Renders the calling thread's backtrace, and with `all` the remaining
/// threads of the process.
///
/// Only the calling thread can be unwound from here; other threads are
/// listed by id and name where the platform exposes them.
#[must_use]
pub fn capture_stacks(all: bool) -> Vec<u8> {
    let current = std::thread::current();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "thread '{}' [{}]:\n{}",
        current.name().unwrap_or("<unnamed>"),
        clock::current_thread_id(),
        Backtrace::force_capture()
    );
    if all {
        list_other_threads(&mut out);
    }
    out.into_bytes()
}

#[cfg(target_os = "linux")]
fn list_other_threads(out: &mut String) {
    let Ok(tasks) = std::fs::read_dir("/proc/self/task") else {
        return;
    };
    for task in tasks.flatten() {
        let tid = task.file_name().to_string_lossy().into_owned();
        let name = std::fs::read_to_string(task.path().join("comm")).unwrap_or_default();
        let _ = writeln!(out, "task {tid} ({}): stack not available", name.trim_end());
    }
}

#[cfg(not(target_os = "linux"))]
fn list_other_threads(_out: &mut String) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_values() {
        assert_eq!(StackPolicy::from_value(Some("none")), StackPolicy::None);
        assert_eq!(StackPolicy::from_value(None), StackPolicy::Single);
        assert_eq!(StackPolicy::from_value(Some("")), StackPolicy::Single);
        assert_eq!(StackPolicy::from_value(Some("single")), StackPolicy::Single);
        assert_eq!(StackPolicy::from_value(Some("all")), StackPolicy::All);
        assert_eq!(StackPolicy::from_value(Some("crash")), StackPolicy::All);
    }

    #[test]
    fn capture_names_the_calling_thread() {
        let stacks = String::from_utf8(capture_stacks(false)).expect("utf8");
        assert!(stacks.starts_with("thread '"));
        assert!(stacks.ends_with('\n'));
        assert_eq!(StackPolicy::None.capture(), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn all_threads_lists_tasks() {
        let stacks = String::from_utf8(capture_stacks(true)).expect("utf8");
        assert!(stacks.contains("task "));
    }
}
