//! crates/logging/src/tracing_bridge.rs
//! Forwarding `tracing` events into a [`Logger`].
//!
//! [`LoggerLayer`] is a `tracing-subscriber` layer that records every event
//! it sees as an entry at a fixed severity. The event's source file
//! basename and line become the entry location; the `message` field becomes
//! the entry text, followed by any other fields as `name=value`.
//!
//! Events emitted by this workspace's own crates are skipped, since they may
//! fire while the engine lock is held.
//!
//! ```rust,ignore
//! use logging::{Config, Logger, Severity, init_tracing};
//!
//! let logger = Logger::new(Config::with_log_dir("/var/log/app"));
//! init_tracing(logger, Severity::Info)?;
//! tracing::info!(peer = %addr, "accepted connection");
//! ```

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

use crate::dispatcher::Logger;
use crate::entry::basename;
use crate::severity::Severity;

/// A tracing layer that records events through a [`Logger`].
#[derive(Clone, Debug)]
pub struct LoggerLayer {
    logger: Logger,
    severity: Severity,
}

impl LoggerLayer {
    /// Creates a layer logging every event at `severity`.
    #[must_use]
    pub const fn new(logger: Logger, severity: Severity) -> Self {
        Self { logger, severity }
    }

    fn is_own_target(target: &str) -> bool {
        target == "logging" || target.starts_with("logging::") || target.starts_with("logging_sink")
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if Self::is_own_target(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let file = metadata.file().map_or("???", basename);
        let line = metadata.line().unwrap_or(0);
        self.logger
            .log(self.severity, file, line, visitor.into_message());
    }
}

/// Collects the `message` field and renders the rest as `name=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn into_message(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}

/// Installs a global subscriber that forwards every event to `logger`.
///
/// Fails if a global subscriber has already been set.
pub fn init_tracing(logger: Logger, severity: Severity) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(LoggerLayer::new(logger, severity))
        .try_init()
}
