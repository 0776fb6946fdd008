//! crates/logging/src/codec/color.rs
//! ANSI colour profiles for interactive stderr output.

use std::io;

use is_terminal::IsTerminal;

use crate::severity::Severity;

/// Sequence that restores default attributes.
pub const RESET: &[u8] = b"\x1b[0m";

/// Escape sequences bracketing the parts of a header.
#[derive(Debug, PartialEq, Eq)]
pub struct ColorProfile {
    /// Prefix for INFO.
    pub info: &'static [u8],
    /// Prefix for WARNING.
    pub warning: &'static [u8],
    /// Prefix for ERROR and FATAL.
    pub error: &'static [u8],
    /// Prefix greying the time, file and line.
    pub time: &'static [u8],
}

/// Profile for terminals with 8-colour support.
pub static PROFILE_8: ColorProfile = ColorProfile {
    info: b"\x1b[0;36;49m",
    warning: b"\x1b[0;33;49m",
    error: b"\x1b[0;31;49m",
    time: b"\x1b[2;37;49m",
};

/// Profile for terminals with 256-colour support.
pub static PROFILE_256: ColorProfile = ColorProfile {
    info: b"\x1b[38;5;33m",
    warning: b"\x1b[38;5;214m",
    error: b"\x1b[38;5;160m",
    time: b"\x1b[38;5;246m",
};

impl ColorProfile {
    /// Prefix for `severity`.
    #[must_use]
    pub const fn prefix(&self, severity: Severity) -> &'static [u8] {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error | Severity::Fatal => self.error,
        }
    }

    /// Profile matching a `TERM` value, if the terminal type is known.
    #[must_use]
    pub fn for_term(term: &str) -> Option<&'static Self> {
        match term {
            "ansi" | "xterm-color" | "screen" => Some(&PROFILE_8),
            "xterm-256color" | "screen-256color" => Some(&PROFILE_256),
            _ => None,
        }
    }

    /// Profile for the process stderr.
    ///
    /// Colour is used only when stderr is a terminal whose `TERM` names a
    /// known profile and `no_color` is unset.
    #[must_use]
    pub fn detect(no_color: bool) -> Option<&'static Self> {
        if no_color || !io::stderr().is_terminal() {
            return None;
        }
        std::env::var("TERM")
            .ok()
            .and_then(|term| Self::for_term(&term))
    }
}
