//! crates/logging/src/severity.rs
//! Ordered severity levels and the level-name resolver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoggingError;

/// Severity threshold, ordered by increasing verbosity.
///
/// `Critical < Error < Warning < Info < Debug`. A line is emitted when its
/// severity is less than or equal to the active threshold.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Critical conditions.
    Critical,
    /// Error conditions.
    Error,
    /// Warning conditions.
    Warning,
    /// Informational messages.
    #[default]
    Info,
    /// Debug output, further filtered by selectors.
    Debug,
}

impl Severity {
    /// All severities from least to most verbose.
    pub const ALL: [Self; 5] = [
        Self::Critical,
        Self::Error,
        Self::Warning,
        Self::Info,
        Self::Debug,
    ];

    /// Resolves a configured level name.
    ///
    /// Matching is case-insensitive. An empty name selects [`Severity::Info`];
    /// any other unrecognised name fails with [`LoggingError::InvalidLevel`].
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::Severity;
    ///
    /// assert_eq!(Severity::resolve("WARNING").unwrap(), Severity::Warning);
    /// assert_eq!(Severity::resolve("").unwrap(), Severity::Info);
    /// assert!(Severity::resolve("verbose").is_err());
    /// ```
    pub fn resolve(name: &str) -> Result<Self, LoggingError> {
        if name.is_empty() {
            return Ok(Self::Info);
        }
        name.parse()
    }

    /// Returns the lowercase configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Returns the uppercase tag used in text lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRIT",
            Self::Error => "ERR",
            Self::Warning => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DBG",
        }
    }

    /// Reports whether a line at `self` passes the `threshold`.
    #[must_use]
    pub fn passes(self, threshold: Self) -> bool {
        self <= threshold
    }
}

impl FromStr for Severity {
    type Err = LoggingError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(LoggingError::InvalidLevel(input.to_owned())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
