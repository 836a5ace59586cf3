//! crates/logging/src/macros.rs
//! Formatting macros that emit through a [`LoggingContext`](crate::LoggingContext).
//!
//! Each macro takes the context, a category and `format!`-style arguments.
//! Arguments are only formatted when the policy lets the line through.

/// Emit a debug line; requires the category to be selected.
///
/// # Example
/// ```
/// use logging::{log_debug, CommandLineFlags, LoggingContext, MemoryTransport, Paths};
///
/// let mut ctx = LoggingContext::new(CommandLineFlags::default(), Paths::new("."), MemoryTransport::new());
/// ctx.resolve_bootstrap("agent", "net").unwrap();
/// log_debug!(ctx, "net", "dialing {}", "10.0.0.1");
/// log_debug!(ctx, "auth", "not selected");
/// assert_eq!(ctx.transport().console_lines(), ["DBG\tnet\tdialing 10.0.0.1"]);
/// ```
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $category:expr, $($arg:tt)+) => {
        $ctx.emit_fmt($category, $crate::Severity::Debug, ::std::format_args!($($arg)+))
    };
}

/// Emit an informational line.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $category:expr, $($arg:tt)+) => {
        $ctx.emit_fmt($category, $crate::Severity::Info, ::std::format_args!($($arg)+))
    };
}

/// Emit a warning line.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $category:expr, $($arg:tt)+) => {
        $ctx.emit_fmt($category, $crate::Severity::Warning, ::std::format_args!($($arg)+))
    };
}

/// Emit an error line.
#[macro_export]
macro_rules! log_error {
    ($ctx:expr, $category:expr, $($arg:tt)+) => {
        $ctx.emit_fmt($category, $crate::Severity::Error, ::std::format_args!($($arg)+))
    };
}

/// Emit a critical line.
#[macro_export]
macro_rules! log_critical {
    ($ctx:expr, $category:expr, $($arg:tt)+) => {
        $ctx.emit_fmt($category, $crate::Severity::Critical, ::std::format_args!($($arg)+))
    };
}
