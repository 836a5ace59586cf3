//! crates/logging/src/transport.rs
//! The sink seam between policy resolution and the physical destinations.
//!
//! [`Transport`] is the narrow interface the resolver drives. [`SinkSet`]
//! implements it on top of the `logging-sink` destinations; [`MemoryTransport`]
//! records every call so resolution can be observed without touching the
//! filesystem or the system log.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use logging_sink::{AmbientOutput, ConsoleSink, FileSink};
#[cfg(unix)]
use logging_sink::syslog::{SyslogPriority, SyslogSink};

use crate::config::FileRotator;
use crate::error::LoggingError;
use crate::severity::Severity;

/// Destinations configured by policy resolution.
pub trait Transport {
    /// Sets the identity reported by sinks that carry one (the syslog tag).
    fn set_identity(&mut self, name: &str);

    /// Enables or disables console output.
    fn enable_console(&mut self, enabled: bool);

    /// Returns whether console output is enabled.
    fn console_enabled(&self) -> bool;

    /// Enables or disables system log output.
    fn enable_syslog(&mut self, enabled: bool);

    /// Opens rotating file output.
    ///
    /// Activating twice with identical settings must not reopen the files.
    fn activate_files(&mut self, files: &FileRotator) -> Result<(), LoggingError>;

    /// Closes rotating file output.
    fn deactivate_files(&mut self);

    /// Selects where output from code outside the policy goes.
    fn set_ambient(&mut self, ambient: AmbientOutput);

    /// Returns the current ambient output destination.
    fn ambient(&self) -> AmbientOutput;

    /// Forwards one rendered line to every enabled destination.
    fn write_line(&self, severity: Severity, line: &str) -> io::Result<()>;
}

#[cfg(unix)]
const fn syslog_priority(severity: Severity) -> SyslogPriority {
    match severity {
        Severity::Critical => SyslogPriority::Critical,
        Severity::Error => SyslogPriority::Error,
        Severity::Warning => SyslogPriority::Warning,
        Severity::Info => SyslogPriority::Info,
        Severity::Debug => SyslogPriority::Debug,
    }
}

/// Console, rotating files and (on unix) the system log.
pub struct SinkSet<W = io::Stderr> {
    identity: String,
    console: ConsoleSink<W>,
    files: FileSink,
    #[cfg(unix)]
    syslog: SyslogSink,
    ambient: AmbientOutput,
}

impl SinkSet<io::Stderr> {
    /// Creates a set writing console output to stderr. Every destination
    /// starts disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::with_console(ConsoleSink::stderr())
    }
}

impl Default for SinkSet<io::Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> SinkSet<W> {
    /// Creates a set around a custom console sink.
    pub fn with_console(mut console: ConsoleSink<W>) -> Self {
        console.enable(false);
        Self {
            identity: String::new(),
            console,
            files: FileSink::new(),
            #[cfg(unix)]
            syslog: SyslogSink::new(logging_sink::syslog::DEFAULT_SYSLOG_TAG),
            ambient: AmbientOutput::Forward,
        }
    }

    /// Returns the identity set by [`Transport::set_identity`].
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns the file destination.
    pub const fn files(&self) -> &FileSink {
        &self.files
    }

    /// Returns whether the system log connection is open.
    pub fn syslog_enabled(&self) -> bool {
        #[cfg(unix)]
        {
            self.syslog.is_enabled()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Consumes the set and returns the console sink.
    pub fn into_console(self) -> ConsoleSink<W> {
        self.console
    }
}

impl<W> Transport for SinkSet<W>
where
    W: Write,
{
    fn set_identity(&mut self, name: &str) {
        name.clone_into(&mut self.identity);
        #[cfg(unix)]
        self.syslog.set_tag(name);
    }

    fn enable_console(&mut self, enabled: bool) {
        self.console.enable(enabled);
    }

    fn console_enabled(&self) -> bool {
        self.console.is_enabled()
    }

    fn enable_syslog(&mut self, enabled: bool) {
        #[cfg(unix)]
        self.syslog.enable(enabled);
        #[cfg(not(unix))]
        let _ = enabled;
    }

    fn activate_files(&mut self, files: &FileRotator) -> Result<(), LoggingError> {
        files.validate()?;
        self.files
            .activate(files.to_spec())
            .map_err(|source| LoggingError::sink_activation(&files.path, source))
    }

    fn deactivate_files(&mut self) {
        self.files.deactivate();
    }

    fn set_ambient(&mut self, ambient: AmbientOutput) {
        self.ambient = ambient;
    }

    fn ambient(&self) -> AmbientOutput {
        self.ambient
    }

    fn write_line(&self, severity: Severity, line: &str) -> io::Result<()> {
        #[cfg(unix)]
        self.syslog.write_line(syslog_priority(severity), line);
        #[cfg(not(unix))]
        let _ = severity;

        let console = self.console.write_line(line);
        let files = self.files.write_line(line);
        console.and(files)
    }
}

impl<W> fmt::Debug for SinkSet<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkSet")
            .field("identity", &self.identity)
            .field("console", &self.console)
            .field("files", &self.files)
            .field("syslog", &self.syslog_enabled())
            .field("ambient", &self.ambient)
            .finish()
    }
}

/// A line captured by [`MemoryTransport`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordedLine {
    /// Severity the line was emitted at.
    pub severity: Severity,
    /// Rendered line.
    pub line: String,
    /// Whether the console was enabled when the line was written.
    pub console: bool,
}

/// In-memory transport that records state changes and lines.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    identity: String,
    console: bool,
    syslog: bool,
    files: Option<FileRotator>,
    file_opens: usize,
    fail_activation: Option<io::ErrorKind>,
    ambient: AmbientOutput,
    lines: Mutex<Vec<RecordedLine>>,
}

impl MemoryTransport {
    /// Creates a transport with every destination disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later file activation fail with `kind`.
    #[must_use]
    pub fn failing_activation(mut self, kind: io::ErrorKind) -> Self {
        self.fail_activation = Some(kind);
        self
    }

    /// Last identity set.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Whether system log output is enabled.
    pub const fn syslog_enabled(&self) -> bool {
        self.syslog
    }

    /// Settings of the active file output.
    pub const fn files(&self) -> Option<&FileRotator> {
        self.files.as_ref()
    }

    /// How many times file output was actually (re)opened.
    pub const fn file_opens(&self) -> usize {
        self.file_opens
    }

    /// Every line written so far.
    pub fn lines(&self) -> Vec<RecordedLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines written while the console was enabled.
    pub fn console_lines(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.console)
            .map(|line| line.line)
            .collect()
    }
}

impl Transport for MemoryTransport {
    fn set_identity(&mut self, name: &str) {
        name.clone_into(&mut self.identity);
    }

    fn enable_console(&mut self, enabled: bool) {
        self.console = enabled;
    }

    fn console_enabled(&self) -> bool {
        self.console
    }

    fn enable_syslog(&mut self, enabled: bool) {
        self.syslog = enabled;
    }

    fn activate_files(&mut self, files: &FileRotator) -> Result<(), LoggingError> {
        files.validate()?;
        if let Some(kind) = self.fail_activation {
            return Err(LoggingError::sink_activation(
                &files.path,
                io::Error::from(kind),
            ));
        }
        if self.files.as_ref() != Some(files) {
            self.files = Some(files.clone());
            self.file_opens += 1;
        }
        Ok(())
    }

    fn deactivate_files(&mut self) {
        self.files = None;
    }

    fn set_ambient(&mut self, ambient: AmbientOutput) {
        self.ambient = ambient;
    }

    fn ambient(&self) -> AmbientOutput {
        self.ambient
    }

    fn write_line(&self, severity: Severity, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedLine {
                severity,
                line: line.to_owned(),
                console: self.console,
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging_sink::{LineMode, RotationInterval};

    fn rotator(dir: &std::path::Path) -> FileRotator {
        FileRotator {
            path: dir.to_path_buf(),
            name: "agent".to_owned(),
            rotation: RotationInterval::Never,
            ..FileRotator::default()
        }
    }

    #[test]
    fn sink_set_starts_disabled() {
        let sinks = SinkSet::with_console(ConsoleSink::new(Vec::new()));
        assert!(!sinks.console_enabled());
        assert!(!sinks.syslog_enabled());
        assert!(!sinks.files().is_active());
        assert_eq!(sinks.ambient(), AmbientOutput::Forward);
    }

    #[test]
    fn sink_set_writes_console_and_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sinks =
            SinkSet::with_console(ConsoleSink::with_line_mode(Vec::new(), LineMode::WithNewline));
        sinks.enable_console(true);
        sinks.activate_files(&rotator(dir.path())).expect("activate");

        sinks
            .write_line(Severity::Info, "INFO\tmain\tready")
            .expect("write");

        let written = std::fs::read_to_string(dir.path().join("agent")).expect("read log");
        assert_eq!(written, "INFO\tmain\tready\n");
        assert_eq!(sinks.into_console().into_inner(), b"INFO\tmain\tready\n");
    }

    #[test]
    fn sink_set_activation_error_names_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").expect("create file");

        let mut sinks = SinkSet::with_console(ConsoleSink::new(Vec::new()));
        let error = sinks
            .activate_files(&rotator(&blocker.join("logs")))
            .expect_err("activation must fail");
        match error {
            LoggingError::SinkActivation { path, .. } => assert_eq!(path, blocker.join("logs")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn sink_set_rejects_invalid_rotation_before_opening() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sinks = SinkSet::with_console(ConsoleSink::new(Vec::new()));
        let files = FileRotator {
            keep_files: 1,
            ..rotator(dir.path())
        };
        assert!(matches!(
            sinks.activate_files(&files),
            Err(LoggingError::InvalidRotation(_))
        ));
        assert!(!sinks.files().is_active());
    }

    #[test]
    fn memory_transport_counts_real_opens() {
        let mut transport = MemoryTransport::new();
        let files = rotator(std::path::Path::new("/var/log/agent"));
        transport.activate_files(&files).unwrap();
        transport.activate_files(&files).unwrap();
        assert_eq!(transport.file_opens(), 1);

        let other = FileRotator {
            name: "other".to_owned(),
            ..files
        };
        transport.activate_files(&other).unwrap();
        assert_eq!(transport.file_opens(), 2);
    }

    #[test]
    fn memory_transport_records_console_state_per_line() {
        let mut transport = MemoryTransport::new();
        transport.enable_console(true);
        transport.write_line(Severity::Info, "first").unwrap();
        transport.enable_console(false);
        transport.write_line(Severity::Info, "second").unwrap();

        assert_eq!(transport.lines().len(), 2);
        assert_eq!(transport.console_lines(), ["first"]);
    }

    #[test]
    fn memory_transport_simulates_activation_failure() {
        let mut transport = MemoryTransport::new().failing_activation(io::ErrorKind::PermissionDenied);
        let error = transport
            .activate_files(&rotator(std::path::Path::new("/root/logs")))
            .unwrap_err();
        assert!(matches!(error, LoggingError::SinkActivation { .. }));
        assert!(transport.files().is_none());
    }
}
