#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` resolves one consistent logging policy for a process from its
//! command-line flags and its structured configuration: the active
//! [`Severity`] threshold, the enabled debug [`Selectors`] and which sinks
//! (console, rotating files, system log) receive output. The physical sinks
//! live in the `logging-sink` crate and are driven through the [`Transport`]
//! trait.
//!
//! # Design
//!
//! - [`LoggingContext`] owns the effective [`Policy`] and the transport.
//!   [`resolve_bootstrap`](LoggingContext::resolve_bootstrap) runs right after
//!   flag parsing and logs to the console only;
//!   [`resolve_full`](LoggingContext::resolve_full) merges the
//!   [`LoggingConfig`] with the [`CommandLineFlags`] and replaces the bootstrap
//!   policy; [`apply_console_override`](LoggingContext::apply_console_override)
//!   turns the console off unless it was forced on.
//! - [`router::route`] applies a threshold and sink flags to the policy and
//!   transport in one step.
//! - [`SinkSet`] is the production transport; [`MemoryTransport`] records
//!   calls for tests and dry runs.
//! - With the `tracing` feature, `PolicyLayer` forwards `tracing` events into a
//!   [`SharedContext`].
//!
//! # Invariants
//!
//! - Command-line selectors always replace configured selectors and force the
//!   `debug` threshold.
//! - Forcing the console disables files and syslog regardless of the
//!   configuration.
//! - Unset file settings are filled with the process log directory and the
//!   process name; explicit values are never overwritten.
//! - Running the full phase twice with the same inputs yields the same policy.
//!
//! # Errors
//!
//! Resolution fails with [`LoggingError`] when the level name is unknown, the
//! rotation parameters are out of range or the file sink cannot be opened.
//! Selector parsing and routing never fail.
//!
//! # Examples
//!
//! ```
//! use logging::{
//!     log_info, CommandLineFlags, LoggingConfig, LoggingContext, MemoryTransport, Paths, Severity,
//! };
//!
//! let flags = CommandLineFlags::new(true, "net");
//! let mut context = LoggingContext::new(flags, Paths::new("/opt/agent"), MemoryTransport::new());
//! context.resolve_bootstrap("agent", "net").unwrap();
//!
//! let mut config: LoggingConfig = serde_json::from_str(r#"{"level": "warning"}"#).unwrap();
//! context.resolve_full("agent", &mut config).unwrap();
//!
//! assert_eq!(context.policy().severity, Severity::Debug);
//! assert!(context.is_debug("net"));
//! assert!(!context.policy().to_files);
//! assert_eq!(config.selectors, ["net"]);
//!
//! log_info!(context, "main", "ready");
//! assert_eq!(context.transport().console_lines(), ["INFO\tmain\tready"]);
//! ```

mod config;
mod context;
mod error;
mod macros;
mod paths;
mod policy;
mod record;
pub mod router;
mod selectors;
mod severity;
mod transport;

#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::{
    CommandLineFlags, DEFAULT_KEEP_FILES, FileRotator, LoggingConfig, MAX_KEEP_FILES,
    MIN_KEEP_FILES, Toggle,
};
pub use context::{LOG_CATEGORY, LoggingContext, STDLOG_CATEGORY, SharedContext};
pub use error::LoggingError;
pub use logging_sink::{AmbientOutput, RotationInterval};
pub use paths::{PathKind, Paths};
pub use policy::Policy;
pub use record::render_line;
pub use selectors::{ALL_SELECTORS, Selectors};
pub use severity::Severity;
pub use transport::{MemoryTransport, RecordedLine, SinkSet, Transport};

#[cfg(feature = "tracing")]
pub use tracing_bridge::{PolicyLayer, TARGET_PREFIX, install};
