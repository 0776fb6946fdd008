//! crates/logging/src/error.rs
//! Error types for configuration parsing and entry decoding.

use std::io;

use thiserror::Error;

/// A configuration string was rejected.
///
/// The setting it targeted keeps its previous value.
#[derive(Debug, Error)]
pub enum ConfigSyntaxError {
    /// A verbosity override list was malformed.
    #[error("syntax error: expect comma-separated list of filename=N")]
    VmoduleSyntax,
    /// A verbosity override carried a negative level.
    #[error("negative value for vmodule level")]
    NegativeVmoduleLevel,
    /// A glob override pattern could not be compiled.
    #[error("invalid vmodule pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Compiler error from the glob engine.
        #[source]
        source: globset::Error,
    },
    /// A trace location was not of the form `file.ext:line`.
    #[error("syntax error: expect file.rs:234")]
    TraceSyntax,
    /// A trace location named line zero or a negative line.
    #[error("negative or zero value for trace location line")]
    TraceLine,
    /// A severity threshold was neither a known name nor an integer.
    #[error("unknown severity '{value}'")]
    Severity {
        /// The rejected input.
        value: String,
    },
    /// A verbosity level was not an integer.
    #[error("invalid verbosity level '{value}'")]
    Verbosity {
        /// The rejected input.
        value: String,
    },
}

/// Failure while decoding a log stream.
///
/// End of stream is not an error; decoders report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Reading the underlying stream failed.
    #[error("failed to read log stream: {0}")]
    Io(#[from] io::Error),
    /// The header timestamp does not name a valid local time.
    #[error("invalid entry timestamp '{text}'")]
    Timestamp {
        /// Timestamp as it appeared in the header.
        text: String,
    },
    /// The header line number does not fit the line type.
    #[error("invalid entry line number '{text}'")]
    Line {
        /// Line number as it appeared in the header.
        text: String,
    },
    /// The header thread id does not fit the id type.
    #[error("invalid entry thread id '{text}'")]
    ThreadId {
        /// Thread id as it appeared in the header.
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_render_expected_text() {
        assert_eq!(
            ConfigSyntaxError::VmoduleSyntax.to_string(),
            "syntax error: expect comma-separated list of filename=N"
        );
        assert_eq!(
            ConfigSyntaxError::Severity {
                value: "loud".to_owned()
            }
            .to_string(),
            "unknown severity 'loud'"
        );
    }

    #[test]
    fn io_errors_convert_into_decode_errors() {
        let error: DecodeError = io::Error::from(io::ErrorKind::UnexpectedEof).into();
        assert!(matches!(error, DecodeError::Io(_)));
    }
}
