//! crates/logging/src/severity.rs
//! Entry severities and routing thresholds.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigSyntaxError;

const SEVERITY_CHARS: &[u8; 4] = b"IWEF";

/// Importance of a log entry, ordered from least to most severe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum Severity {
    /// Informational output.
    Info = 1,
    /// Something unexpected that did not stop the operation.
    Warning = 2,
    /// An operation failed.
    Error = 3,
    /// Unrecoverable; logging at this severity terminates the process.
    Fatal = 4,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Self; 4] = [Self::Info, Self::Warning, Self::Error, Self::Fatal];

    /// Numeric code of the severity (INFO=1 .. FATAL=4).
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Single-letter tag used in the line format.
    #[must_use]
    pub const fn as_char(self) -> u8 {
        SEVERITY_CHARS[self as usize - 1]
    }

    /// Inverse of [`as_char`](Self::as_char).
    #[must_use]
    pub fn from_char(tag: u8) -> Option<Self> {
        match tag {
            b'I' => Some(Self::Info),
            b'W' => Some(Self::Warning),
            b'E' => Some(Self::Error),
            b'F' => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Upper-case name of the severity.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Parses a severity name case-insensitively.
    ///
    /// `NONE` is a threshold, not a severity, and is rejected here; see
    /// [`Threshold::from_name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum severity admitted by a destination.
///
/// Any integer is accepted; [`Threshold::NONE`] (5) admits nothing and values
/// at or below [`Threshold::INFO`] admit everything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Threshold(pub i32);

impl Threshold {
    /// Admits every severity.
    pub const INFO: Self = Self(Severity::Info.code());
    /// Admits WARNING and above.
    pub const WARNING: Self = Self(Severity::Warning.code());
    /// Admits ERROR and above.
    pub const ERROR: Self = Self(Severity::Error.code());
    /// Admits only FATAL.
    pub const FATAL: Self = Self(Severity::Fatal.code());
    /// Admits nothing.
    pub const NONE: Self = Self(5);

    /// Reports whether `severity` passes this threshold.
    #[must_use]
    pub const fn admits(self, severity: Severity) -> bool {
        severity.code() >= self.0
    }

    /// Parses a threshold name case-insensitively.
    ///
    /// Besides the severity names this accepts `NONE`, and the aliases
    /// `true` (INFO) and `false` (NONE).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(severity) = Severity::from_name(name) {
            return Some(severity.into());
        }
        if name.eq_ignore_ascii_case("NONE") || name.eq_ignore_ascii_case("false") {
            Some(Self::NONE)
        } else if name.eq_ignore_ascii_case("true") {
            Some(Self::INFO)
        } else {
            None
        }
    }
}

impl From<Severity> for Threshold {
    fn from(severity: Severity) -> Self {
        Self(severity.code())
    }
}

impl FromStr for Threshold {
    type Err = ConfigSyntaxError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(threshold) = Self::from_name(value) {
            return Ok(threshold);
        }
        value
            .parse::<i32>()
            .map(Self)
            .map_err(|_| ConfigSyntaxError::Severity {
                value: value.to_owned(),
            })
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => f.write_str("INFO"),
            2 => f.write_str("WARNING"),
            3 => f.write_str("ERROR"),
            4 => f.write_str("FATAL"),
            5 => f.write_str("NONE"),
            other => write!(f, "{other}"),
        }
    }
}
