//! crates/logging/src/macros.rs
//! Logging macros capturing the call site.
//!
//! Every macro accepts an optional leading `logger: <expr>` argument naming
//! the engine to use; without it the process-wide default from
//! [`logger()`](crate::logger) is used.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($severity:ident, $logger:expr, $($arg:tt)+) => {
        $logger.log(
            $crate::Severity::$severity,
            ::core::file!(),
            ::core::line!(),
            ::std::format!($($arg)+),
        )
    };
}

/// Logs an INFO entry.
///
/// ```
/// # let logger = logging::Logger::new(logging::Config { disable_daemons: true, ..Default::default() });
/// # logger.set_stderr_writer(std::io::sink());
/// logging::info!(logger: &logger, "listening on port {}", 8080);
/// ```
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::__log_at!(Info, $logger, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at!(Info, $crate::logger(), $($arg)+)
    };
}

/// Logs a WARNING entry.
#[macro_export]
macro_rules! warning {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::__log_at!(Warning, $logger, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at!(Warning, $crate::logger(), $($arg)+)
    };
}

/// Logs an ERROR entry.
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::__log_at!(Error, $logger, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at!(Error, $crate::logger(), $($arg)+)
    };
}

/// Logs a FATAL entry, flushes, and terminates the process.
#[macro_export]
macro_rules! fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::__log_at!(Fatal, $logger, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at!(Fatal, $crate::logger(), $($arg)+)
    };
}

/// Evaluates to `true` when verbosity `level` is enabled at this call site.
///
/// Each invocation owns a `static` [`CallSite`](crate::CallSite), so the
/// override lookup is cached per invocation.
///
/// ```
/// # let logger = logging::Logger::new(logging::Config { disable_daemons: true, ..Default::default() });
/// logger.set_verbosity(1);
/// assert!(logging::v!(logger: &logger, 1));
/// assert!(!logging::v!(logger: &logger, 2));
/// ```
#[macro_export]
macro_rules! v {
    (logger: $logger:expr, $level:expr) => {{
        static __CALL_SITE: $crate::CallSite =
            $crate::CallSite::new(::core::file!(), ::core::line!());
        $logger.enabled($level, &__CALL_SITE)
    }};
    ($level:expr) => {
        $crate::v!(logger: $crate::logger(), $level)
    };
}

/// Logs an INFO entry when verbosity `level` is enabled at this call site.
///
/// The message arguments are not evaluated otherwise.
#[macro_export]
macro_rules! vlog {
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {{
        let __logger = $logger;
        if $crate::v!(logger: __logger, $level) {
            $crate::__log_at!(Info, __logger, $($arg)+);
        }
    }};
    ($level:expr, $($arg:tt)+) => {
        $crate::vlog!(logger: $crate::logger(), $level, $($arg)+)
    };
}
