//! crates/logging-sink/src/file.rs
//! Rotating file destination backed by `tracing-appender`.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// How often the active log file is rolled over.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum RotationInterval {
    /// Start a new file every minute.
    Minutely,
    /// Start a new file every hour.
    Hourly,
    /// Start a new file every day.
    #[default]
    Daily,
    /// Keep writing to a single file.
    Never,
}

impl RotationInterval {
    /// Returns the configuration name of the interval.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minutely => "minutely",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }

    fn to_rotation(self) -> Rotation {
        match self {
            Self::Minutely => Rotation::MINUTELY,
            Self::Hourly => Rotation::HOURLY,
            Self::Daily => Rotation::DAILY,
            Self::Never => Rotation::NEVER,
        }
    }
}

impl fmt::Display for RotationInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters handed to [`FileSink::activate`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSpec {
    /// Directory that holds the log files.
    pub directory: PathBuf,
    /// File name prefix, usually the process name.
    pub name: String,
    /// Rollover interval.
    pub rotation: RotationInterval,
    /// Number of rolled files kept on disk.
    pub keep_files: usize,
}

struct ActiveFile {
    spec: FileSpec,
    writer: Mutex<RollingFileAppender>,
}

/// Rotating file destination.
///
/// The sink starts inactive. [`activate`](Self::activate) creates the target
/// directory, opens the current file and keeps the appender until
/// [`deactivate`](Self::deactivate) is called or a different [`FileSpec`] is
/// activated.
#[derive(Default)]
pub struct FileSink {
    active: Option<ActiveFile>,
}

impl FileSink {
    /// Creates an inactive sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the file set described by `spec`.
    ///
    /// Re-activating with an identical spec keeps the current appender.
    pub fn activate(&mut self, spec: FileSpec) -> io::Result<()> {
        if self.spec() == Some(&spec) {
            return Ok(());
        }

        std::fs::create_dir_all(&spec.directory)?;
        let appender = RollingFileAppender::builder()
            .rotation(spec.rotation.to_rotation())
            .filename_prefix(spec.name.as_str())
            .max_log_files(spec.keep_files)
            .build(&spec.directory)
            .map_err(io::Error::other)?;

        self.active = Some(ActiveFile {
            spec,
            writer: Mutex::new(appender),
        });
        Ok(())
    }

    /// Closes the current file set, if any.
    pub fn deactivate(&mut self) {
        self.active = None;
    }

    /// Returns whether a file set is open.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the spec of the open file set.
    #[must_use]
    pub fn spec(&self) -> Option<&FileSpec> {
        self.active.as_ref().map(|active| &active.spec)
    }

    /// Returns the directory of the open file set.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.spec().map(|spec| spec.directory.as_path())
    }

    /// Appends one line to the current file. Inactive sinks drop the line.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let Some(active) = &self.active else {
            return Ok(());
        };

        let mut writer = active
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut buffer = String::with_capacity(line.len() + 1);
        buffer.push_str(line);
        buffer.push('\n');
        writer.write_all(buffer.as_bytes())?;
        writer.flush()
    }
}

impl fmt::Debug for FileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSink")
            .field("spec", &self.spec())
            .finish()
    }
}
