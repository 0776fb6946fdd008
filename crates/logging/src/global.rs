//! crates/logging/src/global.rs
//! The process-wide default engine used by the logging macros.

use std::sync::OnceLock;

use crate::config::Config;
use crate::dispatcher::Logger;

static DEFAULT: OnceLock<Logger> = OnceLock::new();

/// Returns the default engine, creating it from [`Config::default`] on first use.
pub fn logger() -> &'static Logger {
    DEFAULT.get_or_init(|| Logger::new(Config::default()))
}

/// Installs `logger` as the default engine.
///
/// Only the first installation wins; later calls, or calls after the
/// default was already created by a macro, hand the logger back.
pub fn set_default(logger: Logger) -> Result<(), Logger> {
    DEFAULT.set(logger)
}

/// Returns the default engine if one has been installed or created.
pub fn try_logger() -> Option<&'static Logger> {
    DEFAULT.get()
}
