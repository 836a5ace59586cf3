// System log destination.
//
// Uses libc `openlog`/`syslog`/`closelog` directly. POSIX allows a single
// syslog connection per process, so `SyslogSink` is expected to exist once
// and to be toggled rather than recreated.

use std::ffi::CString;
use std::sync::OnceLock;

/// Syslog severities from `<syslog.h>` that the policy can produce.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogPriority {
    /// Critical conditions (LOG_CRIT).
    Critical = libc::LOG_CRIT,
    /// Error conditions (LOG_ERR).
    Error = libc::LOG_ERR,
    /// Warning conditions (LOG_WARNING).
    Warning = libc::LOG_WARNING,
    /// Informational messages (LOG_INFO).
    Info = libc::LOG_INFO,
    /// Debug-level messages (LOG_DEBUG).
    Debug = libc::LOG_DEBUG,
}

/// Tag used when the caller never supplied one.
pub const DEFAULT_SYSLOG_TAG: &str = "logp";

/// RAII handle for an open syslog connection; dropping it calls
/// `closelog(3)`.
#[derive(Debug)]
struct SyslogGuard {
    _private: (),
}

impl SyslogGuard {
    fn open(tag: &str) -> Self {
        // openlog(3) keeps the ident pointer, so the string lives in a static.
        // The first tag wins for the lifetime of the process.
        static IDENT: OnceLock<CString> = OnceLock::new();
        let ident = IDENT.get_or_init(|| {
            CString::new(tag).unwrap_or_else(|_| CString::from(c"logp"))
        });

        // SAFETY: the ident pointer is valid for the process lifetime because
        // it is stored in a static `OnceLock<CString>`.
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, libc::LOG_USER);
        }

        Self { _private: () }
    }
}

impl Drop for SyslogGuard {
    fn drop(&mut self) {
        // SAFETY: closelog has no preconditions beyond a prior openlog, which
        // the guard's construction guarantees.
        unsafe {
            libc::closelog();
        }
    }
}

/// System log destination with an enable switch, logging under the `user`
/// facility.
///
/// The connection is opened lazily when the sink is enabled and closed when it
/// is disabled or dropped.
///
/// # Examples
///
/// ```no_run
/// use logging_sink::syslog::{SyslogPriority, SyslogSink};
///
/// let mut sink = SyslogSink::new("agent");
/// sink.enable(true);
/// sink.write_line(SyslogPriority::Info, "agent started");
/// ```
#[derive(Debug)]
pub struct SyslogSink {
    tag: String,
    guard: Option<SyslogGuard>,
}

impl SyslogSink {
    /// Creates a disabled sink with the given ident tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            guard: None,
        }
    }

    /// Returns the ident tag passed to `openlog(3)`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replaces the ident tag used by the next connection.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// Opens or closes the syslog connection.
    pub fn enable(&mut self, enabled: bool) {
        match (enabled, self.guard.is_some()) {
            (true, false) => self.guard = Some(SyslogGuard::open(&self.tag)),
            (false, true) => self.guard = None,
            _ => {}
        }
    }

    /// Returns whether the connection is open.
    pub const fn is_enabled(&self) -> bool {
        self.guard.is_some()
    }

    /// Sends one line when the sink is enabled.
    ///
    /// Lines containing NUL bytes cannot cross the C boundary and are dropped.
    pub fn write_line(&self, priority: SyslogPriority, line: &str) {
        if self.guard.is_none() {
            return;
        }
        let Ok(message) = CString::new(line) else {
            return;
        };

        // `%s` keeps `%` characters in the line from being read as format
        // directives.
        // SAFETY: openlog has run (the guard is alive); both pointers are valid
        // NUL-terminated C strings.
        unsafe {
            libc::syslog(
                priority as libc::c_int,
                c"%s".as_ptr(),
                message.as_ptr(),
            );
        }
    }
}

impl Default for SyslogSink {
    fn default() -> Self {
        Self::new(DEFAULT_SYSLOG_TAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sink_is_disabled() {
        let sink = SyslogSink::default();
        assert!(!sink.is_enabled());
        assert_eq!(sink.tag(), DEFAULT_SYSLOG_TAG);
    }

    #[test]
    fn priority_values_match_libc_constants() {
        assert_eq!(SyslogPriority::Critical as i32, libc::LOG_CRIT);
        assert_eq!(SyslogPriority::Error as i32, libc::LOG_ERR);
        assert_eq!(SyslogPriority::Warning as i32, libc::LOG_WARNING);
        assert_eq!(SyslogPriority::Info as i32, libc::LOG_INFO);
        assert_eq!(SyslogPriority::Debug as i32, libc::LOG_DEBUG);
    }

    #[test]
    fn enable_toggles_connection() {
        let mut sink = SyslogSink::new("logp-tests");
        sink.enable(true);
        assert!(sink.is_enabled());
        sink.write_line(SyslogPriority::Debug, "syslog sink test with 100% coverage");
        sink.write_line(SyslogPriority::Info, "embedded\0nul is dropped");
        sink.enable(false);
        assert!(!sink.is_enabled());
    }

    #[test]
    fn disabled_sink_ignores_lines() {
        let sink = SyslogSink::default();
        sink.write_line(SyslogPriority::Error, "never sent");
        assert!(!sink.is_enabled());
    }

    #[test]
    fn set_tag_updates_ident() {
        let mut sink = SyslogSink::default();
        sink.set_tag("agent");
        assert_eq!(sink.tag(), "agent");
    }
}
