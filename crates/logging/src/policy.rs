//! crates/logging/src/policy.rs
//! The effective logging policy produced by resolution.

use serde::Serialize;

use crate::config::FileRotator;
use crate::selectors::Selectors;
use crate::severity::Severity;

/// Effective logging policy for the process.
///
/// Built from scratch by every resolution phase and consulted on each
/// emitted line.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Policy {
    /// Active threshold.
    pub severity: Severity,
    /// Enabled debug categories.
    pub selectors: Selectors,
    /// Console output enabled.
    pub to_console: bool,
    /// Rotating file output enabled.
    pub to_files: bool,
    /// System log output enabled.
    pub to_syslog: bool,
    /// File sink settings in effect when `to_files` is set.
    pub files: Option<FileRotator>,
    /// Lines are rendered as JSON objects.
    pub json: bool,
}

impl Policy {
    /// Reports whether a line at `severity` in `category` is emitted.
    ///
    /// Debug lines additionally need their category to be selected.
    ///
    /// ```
    /// use logging::{Policy, Selectors, Severity};
    ///
    /// let policy = Policy {
    ///     severity: Severity::Debug,
    ///     selectors: Selectors::parse(["net"]),
    ///     ..Policy::default()
    /// };
    /// assert!(policy.allows("net", Severity::Debug));
    /// assert!(!policy.allows("auth", Severity::Debug));
    /// assert!(policy.allows("auth", Severity::Info));
    /// ```
    #[must_use]
    pub fn allows(&self, category: &str, severity: Severity) -> bool {
        if !severity.passes(self.severity) {
            return false;
        }
        severity != Severity::Debug || self.selectors.is_enabled(category)
    }

    /// Reports whether debug output for `category` is enabled.
    #[must_use]
    pub fn is_debug(&self, category: &str) -> bool {
        self.allows(category, Severity::Debug)
    }
}
