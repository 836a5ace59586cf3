//! crates/logging/src/context.rs
//! Policy resolution: the bootstrap phase, the full phase and the console
//! override.
//!
//! A [`LoggingContext`] owns the effective [`Policy`] and the [`Transport`]
//! it configures. Resolution runs in two phases:
//!
//! 1. [`resolve_bootstrap`](LoggingContext::resolve_bootstrap) runs right
//!    after flag parsing, before any configuration is loaded. It only honours
//!    the command-line selectors and sends everything to the console.
//! 2. [`resolve_full`](LoggingContext::resolve_full) runs once the
//!    configuration is available and replaces the bootstrap policy.
//!
//! Bootstrap must run, if at all, before the full phase. The ordering is not
//! checked at runtime.

use std::fmt;
use std::sync::{Arc, RwLock};

use logging_sink::AmbientOutput;

use crate::config::{CommandLineFlags, FileRotator, LoggingConfig};
use crate::error::LoggingError;
use crate::paths::{PathKind, Paths};
use crate::policy::Policy;
use crate::record::render_line;
use crate::router;
use crate::selectors::{ALL_SELECTORS, Selectors, split_csv};
use crate::severity::Severity;
use crate::transport::{SinkSet, Transport};

/// Category reserved for messages about the logging setup itself.
pub const LOG_CATEGORY: &str = "log";

/// Selecting this category discards output from code outside the policy.
pub const STDLOG_CATEGORY: &str = "stdlog";

/// Context shared with the `tracing` bridge.
///
/// Resolution holds the write lock; emitters take read locks.
pub type SharedContext<T = SinkSet> = Arc<RwLock<LoggingContext<T>>>;

/// Owner of the effective policy and of the sinks it drives.
pub struct LoggingContext<T = SinkSet> {
    flags: CommandLineFlags,
    paths: Paths,
    process_name: String,
    policy: Policy,
    transport: T,
}

impl<T> LoggingContext<T>
where
    T: Transport,
{
    /// Creates a context with the default policy. No sink is configured until
    /// a resolution phase runs.
    pub fn new(flags: CommandLineFlags, paths: Paths, transport: T) -> Self {
        Self {
            flags,
            paths,
            process_name: String::new(),
            policy: Policy::default(),
            transport,
        }
    }

    /// Bootstrap phase: console-only logging driven by the command-line
    /// selectors.
    ///
    /// Any selector (including `*`) raises the threshold to
    /// [`Severity::Debug`]; otherwise the current threshold is kept. Syslog is
    /// switched off and file output is left untouched. `selectors_csv` is
    /// recorded as the command-line selector string for the full phase.
    ///
    /// ```
    /// use logging::{CommandLineFlags, LoggingContext, MemoryTransport, Paths, Severity};
    ///
    /// let mut context =
    ///     LoggingContext::new(CommandLineFlags::default(), Paths::new("/opt/agent"), MemoryTransport::new());
    /// context.resolve_bootstrap("agent", "net").unwrap();
    ///
    /// assert_eq!(context.policy().severity, Severity::Debug);
    /// assert!(context.policy().to_console);
    /// assert!(context.is_debug("net"));
    /// ```
    pub fn resolve_bootstrap(
        &mut self,
        process_name: &str,
        selectors_csv: &str,
    ) -> Result<(), LoggingError> {
        selectors_csv.clone_into(&mut self.flags.debug_selectors);
        self.set_process_name(process_name);

        let selectors = Selectors::parse_csv(selectors_csv);
        let severity = if selectors.is_empty() {
            self.policy.severity
        } else {
            Severity::Debug
        };

        router::route(
            &mut self.policy,
            &mut self.transport,
            severity,
            selectors,
            false,
            true,
        );
        Ok(())
    }

    /// Full phase: merges the configuration with the command-line flags.
    ///
    /// Precedence, in order:
    ///
    /// - the threshold comes from `config.level` (empty means `info`);
    /// - a `debug` threshold with no configured selectors enables every
    ///   category;
    /// - command-line selectors replace the configured ones and force the
    ///   `debug` threshold;
    /// - syslog defaults to off and files to on unless configured;
    /// - forcing the console turns both syslog and files off.
    ///
    /// The resolved selector list is written back to `config.selectors` when
    /// it is non-empty or came from the command line, and unset file settings
    /// are filled in `config.files`. The previous policy is discarded before
    /// the level is checked, so a rejected level leaves the defaults in place.
    /// Running the phase twice with the same inputs yields the same policy and
    /// does not reopen the file sink.
    pub fn resolve_full(
        &mut self,
        process_name: &str,
        config: &mut LoggingConfig,
    ) -> Result<(), LoggingError> {
        self.policy = Policy {
            json: config.json,
            ..Policy::default()
        };
        let mut severity = Severity::resolve(&config.level)?;
        self.set_process_name(process_name);

        let mut selectors = config.selectors.clone();
        if severity == Severity::Debug && selectors.is_empty() {
            selectors = vec![ALL_SELECTORS.to_owned()];
        }
        let from_flags = !self.flags.debug_selectors.is_empty();
        if from_flags {
            selectors = split_csv(&self.flags.debug_selectors);
            severity = Severity::Debug;
        }

        let default_path = self.paths.resolve(PathKind::Logs, "");
        let force_console = self.flags.force_console;
        let mut to_syslog = config.to_syslog.unwrap_or(false);
        let mut to_files = config.to_files.unwrap_or(true);
        if force_console {
            to_syslog = false;
            to_files = false;
        }

        router::route(
            &mut self.policy,
            &mut self.transport,
            severity,
            Selectors::parse(&selectors),
            to_syslog,
            force_console,
        );
        if from_flags || !selectors.is_empty() {
            config.selectors = selectors;
        }

        self.policy.to_files = to_files;
        if to_files {
            let files = config.files.get_or_insert_with(FileRotator::default);
            files.fill_defaults(&default_path, process_name);
            self.transport.activate_files(files)?;
            self.policy.files = Some(files.clone());
        } else {
            self.transport.deactivate_files();
        }

        let ambient = if self.policy.is_debug(STDLOG_CATEGORY) {
            AmbientOutput::Discard
        } else {
            AmbientOutput::Forward
        };
        self.transport.set_ambient(ambient);

        self.apply_console_override();
        Ok(())
    }

    /// Turns the console off unless it was forced on the command line.
    pub fn apply_console_override(&mut self) {
        if self.flags.force_console {
            return;
        }
        self.policy.to_console = false;
        self.transport.enable_console(false);
        self.emit(LOG_CATEGORY, Severity::Debug, "Disable stderr logging");
    }

    /// Emits `message` when the policy lets `severity` through for
    /// `category`.
    ///
    /// Sink write failures are dropped; logging never fails the caller.
    pub fn emit(&self, category: &str, severity: Severity, message: &str) {
        if !self.policy.allows(category, severity) {
            return;
        }
        self.write(category, severity, message);
    }

    /// Like [`emit`](Self::emit), formatting the message only when it passes
    /// the policy.
    pub fn emit_fmt(&self, category: &str, severity: Severity, args: fmt::Arguments<'_>) {
        if !self.policy.allows(category, severity) {
            return;
        }
        match args.as_str() {
            Some(message) => self.write(category, severity, message),
            None => self.write(category, severity, &args.to_string()),
        }
    }

    /// Emits output produced by code outside the policy's categories.
    ///
    /// Dropped when ambient output is discarded. Ambient debug output only
    /// passes when every category is selected.
    pub fn emit_ambient(&self, severity: Severity, message: &str) {
        if self.transport.ambient().is_discarded() || !self.policy.allows("", severity) {
            return;
        }
        self.write("", severity, message);
    }

    fn write(&self, category: &str, severity: Severity, message: &str) {
        let line = render_line(self.policy.json, severity, category, message);
        let _ = self.transport.write_line(severity, &line);
    }

    fn set_process_name(&mut self, process_name: &str) {
        process_name.clone_into(&mut self.process_name);
        self.transport.set_identity(process_name);
    }

    /// Reports whether debug output for `category` is enabled.
    pub fn is_debug(&self, category: &str) -> bool {
        self.policy.is_debug(category)
    }

    /// Reports whether a line at `severity` in `category` would be emitted.
    pub fn is_enabled(&self, category: &str, severity: Severity) -> bool {
        self.policy.allows(category, severity)
    }

    /// Wraps the context for sharing with the `tracing` bridge.
    pub fn into_shared(self) -> SharedContext<T> {
        Arc::new(RwLock::new(self))
    }
}

impl<T> LoggingContext<T> {
    /// The effective policy.
    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    /// The command-line flags.
    pub const fn flags(&self) -> &CommandLineFlags {
        &self.flags
    }

    /// The directory layout used for default sink locations.
    pub const fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Process name recorded by the last resolution phase.
    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    /// The configured transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Consumes the context and returns the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

impl<T> fmt::Debug for LoggingContext<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingContext")
            .field("flags", &self.flags)
            .field("process_name", &self.process_name)
            .field("policy", &self.policy)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
