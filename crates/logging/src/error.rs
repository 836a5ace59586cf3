//! crates/logging/src/error.rs
//! Errors raised while resolving a logging policy.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure that aborts policy resolution.
///
/// Every variant is a configuration-authoring error: resolution is a one-shot
/// computation and nothing here is retried.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured level name is not one of `critical`, `error`,
    /// `warning`, `info` or `debug`.
    #[error("unknown log level: {0}")]
    InvalidLevel(String),

    /// The file sink could not be opened.
    #[error("failed to activate file sink in {path}: {source}", path = .path.display())]
    SinkActivation {
        /// Directory the sink tried to open.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// Rotation parameters are out of range.
    #[error("invalid file rotation: {0}")]
    InvalidRotation(String),
}

impl LoggingError {
    /// Builds a [`LoggingError::SinkActivation`] for `path`.
    pub fn sink_activation(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SinkActivation {
            path: path.into(),
            source,
        }
    }
}
