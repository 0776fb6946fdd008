//! crates/logging/src/trace_location.rs
//! The `file.ext:line` location at which non-fatal entries carry a stack trace.

use std::fmt;
use std::str::FromStr;

use crate::entry::basename;
use crate::error::ConfigSyntaxError;

/// A source location whose entries get the calling thread's stack appended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct TraceLocation {
    file: String,
    line: u32,
}

impl TraceLocation {
    /// Parses `file.ext:line`; an empty string means "no location".
    ///
    /// The file must include its extension and the line must be positive.
    pub fn parse(value: &str) -> Result<Option<Self>, ConfigSyntaxError> {
        if value.is_empty() {
            return Ok(None);
        }
        let mut fields = value.split(':');
        let (Some(file), Some(line), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(ConfigSyntaxError::TraceSyntax);
        };
        if !file.contains('.') {
            return Err(ConfigSyntaxError::TraceSyntax);
        }
        let line: i64 = line.parse().map_err(|_| ConfigSyntaxError::TraceSyntax)?;
        let line = u32::try_from(line)
            .ok()
            .filter(|line| *line > 0)
            .ok_or(ConfigSyntaxError::TraceLine)?;
        Ok(Some(Self {
            file: file.to_owned(),
            line,
        }))
    }

    /// File component, extension included.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line component.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Reports whether an entry from `file:line` is at this location.
    ///
    /// `file` may be a path; only its basename is compared.
    #[must_use]
    pub fn matches(&self, file: &str, line: u32) -> bool {
        self.line == line && basename(file) == self.file
    }
}

impl fmt::Display for TraceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl FromStr for TraceLocation {
    type Err = ConfigSyntaxError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)?.ok_or(ConfigSyntaxError::TraceSyntax)
    }
}

impl TryFrom<String> for TraceLocation {
    type Error = ConfigSyntaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TraceLocation> for String {
    fn from(location: TraceLocation) -> Self {
        location.to_string()
    }
}
