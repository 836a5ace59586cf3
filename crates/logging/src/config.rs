//! crates/logging/src/config.rs
//! Structured logging configuration and command-line flag values.

use std::path::{Path, PathBuf};

use logging_sink::{FileSpec, RotationInterval};
use serde::{Deserialize, Serialize};

use crate::error::LoggingError;

/// Number of rolled files kept when the configuration does not say.
pub const DEFAULT_KEEP_FILES: usize = 7;

/// Smallest accepted `keep_files` value.
pub const MIN_KEEP_FILES: usize = 2;

/// Largest accepted `keep_files` value.
pub const MAX_KEEP_FILES: usize = 1024;

/// Optional boolean setting that distinguishes "not configured" from an
/// explicit `false`.
///
/// Deserialises from an optional JSON boolean: a missing field or `null` is
/// [`Toggle::Unset`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Toggle {
    /// No value configured; the caller's default applies.
    #[default]
    Unset,
    /// Explicitly enabled.
    Enabled,
    /// Explicitly disabled.
    Disabled,
}

impl Toggle {
    /// Returns the configured value or `default` when unset.
    #[must_use]
    pub const fn unwrap_or(self, default: bool) -> bool {
        match self {
            Self::Unset => default,
            Self::Enabled => true,
            Self::Disabled => false,
        }
    }

    /// Returns `true` when no value was configured.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl From<Option<bool>> for Toggle {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unset,
            Some(true) => Self::Enabled,
            Some(false) => Self::Disabled,
        }
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

impl From<Toggle> for Option<bool> {
    fn from(value: Toggle) -> Self {
        match value {
            Toggle::Unset => None,
            Toggle::Enabled => Some(true),
            Toggle::Disabled => Some(false),
        }
    }
}

/// File sink configuration.
///
/// Empty `path` and `name` mean "not configured"; policy resolution fills
/// them with the process log directory and the process name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRotator {
    /// Directory holding the log files.
    pub path: PathBuf,
    /// File name prefix.
    pub name: String,
    /// Rollover interval.
    pub rotation: RotationInterval,
    /// Number of rolled files kept on disk.
    pub keep_files: usize,
}

impl Default for FileRotator {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            name: String::new(),
            rotation: RotationInterval::default(),
            keep_files: DEFAULT_KEEP_FILES,
        }
    }
}

impl FileRotator {
    /// Fills `path` and `name` when they are empty. Explicit values are kept.
    pub fn fill_defaults(&mut self, path: &Path, name: &str) {
        if self.path.as_os_str().is_empty() {
            self.path = path.to_path_buf();
        }
        if self.name.is_empty() {
            self.name = name.to_owned();
        }
    }

    /// Checks the rotation parameters.
    pub fn validate(&self) -> Result<(), LoggingError> {
        if !(MIN_KEEP_FILES..=MAX_KEEP_FILES).contains(&self.keep_files) {
            return Err(LoggingError::InvalidRotation(format!(
                "keep_files must be between {MIN_KEEP_FILES} and {MAX_KEEP_FILES}, got {}",
                self.keep_files
            )));
        }
        Ok(())
    }

    /// Converts the configuration into the sink's activation parameters.
    #[must_use]
    pub fn to_spec(&self) -> FileSpec {
        FileSpec {
            directory: self.path.clone(),
            name: self.name.clone(),
            rotation: self.rotation,
            keep_files: self.keep_files,
        }
    }
}

/// Logging section of a process configuration file.
///
/// Every field is optional in the serialised form.
///
/// ```
/// use logging::{LoggingConfig, Toggle};
///
/// let config: LoggingConfig =
///     serde_json::from_str(r#"{"level": "warning", "to_files": false}"#).unwrap();
/// assert_eq!(config.level, "warning");
/// assert_eq!(config.to_files, Toggle::Disabled);
/// assert_eq!(config.to_syslog, Toggle::Unset);
/// assert!(config.files.is_none());
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Debug categories to enable.
    pub selectors: Vec<String>,
    /// File sink settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FileRotator>,
    /// Whether lines go to the system log. Defaults to off.
    #[serde(skip_serializing_if = "Toggle::is_unset")]
    pub to_syslog: Toggle,
    /// Whether lines go to rotating files. Defaults to on.
    #[serde(skip_serializing_if = "Toggle::is_unset")]
    pub to_files: Toggle,
    /// Render lines as JSON objects.
    pub json: bool,
    /// Severity name; empty selects `info`.
    pub level: String,
}

/// Logging-related command-line flags.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandLineFlags {
    /// Send everything to the console only (`-e`).
    pub force_console: bool,
    /// Comma-separated debug selectors (`-d`). Empty when not given.
    pub debug_selectors: String,
}

impl CommandLineFlags {
    /// Creates flags from raw values.
    pub fn new(force_console: bool, debug_selectors: impl Into<String>) -> Self {
        Self {
            force_console,
            debug_selectors: debug_selectors.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_defaults_apply_only_when_unset() {
        assert!(Toggle::Unset.unwrap_or(true));
        assert!(!Toggle::Unset.unwrap_or(false));
        assert!(Toggle::Enabled.unwrap_or(false));
        assert!(!Toggle::Disabled.unwrap_or(true));
    }

    #[test]
    fn toggle_deserialises_from_optional_bool() {
        let toggles: Vec<Toggle> = serde_json::from_str("[true, false, null]").unwrap();
        assert_eq!(toggles, [Toggle::Enabled, Toggle::Disabled, Toggle::Unset]);
    }

    #[test]
    fn empty_config_is_default() {
        let config: LoggingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LoggingConfig::default());
        assert!(config.selectors.is_empty());
        assert!(!config.json);
    }

    #[test]
    fn full_config_parses() {
        let config: LoggingConfig = serde_json::from_str(
            r#"{
                "selectors": ["net", "auth"],
                "files": {"path": "/var/log/agent", "rotation": "hourly", "keep_files": 3},
                "to_syslog": true,
                "to_files": true,
                "json": true,
                "level": "debug"
            }"#,
        )
        .unwrap();

        assert_eq!(config.selectors, ["net", "auth"]);
        assert_eq!(config.to_syslog, Toggle::Enabled);
        assert!(config.json);
        let files = config.files.unwrap();
        assert_eq!(files.path, Path::new("/var/log/agent"));
        assert!(files.name.is_empty());
        assert_eq!(files.rotation, RotationInterval::Hourly);
        assert_eq!(files.keep_files, 3);
    }

    #[test]
    fn unset_toggles_are_not_serialised() {
        let json = serde_json::to_value(LoggingConfig::default()).unwrap();
        assert!(json.get("to_syslog").is_none());
        assert!(json.get("files").is_none());
        assert_eq!(json["level"], "");
    }

    #[test]
    fn fill_defaults_keeps_explicit_values() {
        let mut rotator = FileRotator {
            path: PathBuf::from("/custom"),
            ..FileRotator::default()
        };
        rotator.fill_defaults(Path::new("/home/logs"), "agent");
        assert_eq!(rotator.path, Path::new("/custom"));
        assert_eq!(rotator.name, "agent");

        let mut rotator = FileRotator {
            name: "custom".to_owned(),
            ..FileRotator::default()
        };
        rotator.fill_defaults(Path::new("/home/logs"), "agent");
        assert_eq!(rotator.path, Path::new("/home/logs"));
        assert_eq!(rotator.name, "custom");
    }

    #[test]
    fn keep_files_range_is_enforced() {
        for keep_files in [MIN_KEEP_FILES, DEFAULT_KEEP_FILES, MAX_KEEP_FILES] {
            let rotator = FileRotator {
                keep_files,
                ..FileRotator::default()
            };
            assert!(rotator.validate().is_ok(), "keep_files {keep_files}");
        }
        for keep_files in [0, 1, MAX_KEEP_FILES + 1] {
            let rotator = FileRotator {
                keep_files,
                ..FileRotator::default()
            };
            assert!(matches!(
                rotator.validate(),
                Err(LoggingError::InvalidRotation(_))
            ));
        }
    }

    #[test]
    fn to_spec_copies_every_field() {
        let rotator = FileRotator {
            path: PathBuf::from("/var/log/agent"),
            name: "agent".to_owned(),
            rotation: RotationInterval::Never,
            keep_files: 4,
        };
        let spec = rotator.to_spec();
        assert_eq!(spec.directory, Path::new("/var/log/agent"));
        assert_eq!(spec.name, "agent");
        assert_eq!(spec.rotation, RotationInterval::Never);
        assert_eq!(spec.keep_files, 4);
    }
}
