//! crates/logging/src/bridge.rs
//! An [`io::Write`] adapter that turns `file:line: message` lines into entries.

use std::borrow::Cow;
use std::io;

use crate::dispatcher::Logger;
use crate::severity::Severity;

/// Writer that logs every write as one entry at a fixed severity.
///
/// Each write is expected to hold a single `file:line: message` line, the
/// shape produced by line-prefixing loggers. Writes that do not fit are
/// still logged, attributed to `???:1` with a note describing the problem.
///
/// ```
/// use std::io::Write;
/// use logging::{Config, Logger, Severity};
///
/// let logger = Logger::new(Config {
///     disable_daemons: true,
///     no_color: true,
///     ..Config::default()
/// });
/// logger.set_stderr_writer(std::io::sink());
///
/// let mut bridge = logger.bridge(Severity::Warning);
/// writeln!(bridge, "legacy.rs:12: disk almost full")?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct LogBridge {
    logger: Logger,
    severity: Severity,
}

impl LogBridge {
    /// Creates a bridge logging through `logger` at `severity`.
    #[must_use]
    pub const fn new(logger: Logger, severity: Severity) -> Self {
        Self { logger, severity }
    }

    /// Severity given to every bridged entry.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }
}

impl io::Write for LogBridge {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let (file, line, message) = split_location(buf);
        self.logger.log(self.severity, file, line, message);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.logger.flush().map_err(io::Error::other)
    }
}

impl Logger {
    /// Returns an [`io::Write`] bridge logging at `severity`.
    #[must_use]
    pub fn bridge(&self, severity: Severity) -> LogBridge {
        LogBridge::new(self.clone(), severity)
    }
}

/// Splits `file:line: message`.
fn split_location(buf: &[u8]) -> (Cow<'static, str>, u32, String) {
    let text = String::from_utf8_lossy(buf);
    let text = text.strip_suffix('\n').unwrap_or(&text);

    let mut parts = text.splitn(3, ':');
    let (Some(file), Some(line), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return (Cow::Borrowed("???"), 1, format!("bad log format: {text}"));
    };
    if file.is_empty() || rest.is_empty() {
        return (Cow::Borrowed("???"), 1, format!("bad log format: {text}"));
    }
    match line.parse::<u32>() {
        Ok(line) => {
            let message = rest.strip_prefix(' ').unwrap_or(rest);
            (Cow::Owned(file.to_owned()), line, message.to_owned())
        }
        Err(_) => (
            Cow::Owned(file.to_owned()),
            1,
            format!("bad line number: {text}"),
        ),
    }
}
