#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides the physical destinations that the `logging` crate
//! configures once it has resolved a process's logging policy. Every sink
//! accepts pre-rendered lines; none of them know about severity thresholds or
//! debug selectors, which stay in the policy layer.
//!
//! # Design
//!
//! - [`ConsoleSink`] wraps an [`std::io::Write`] implementor (stderr by
//!   default) behind a mutex and an enable switch. Callers choose whether lines
//!   end with a newline by selecting a [`LineMode`].
//! - [`FileSink`] owns a rolling file appender from `tracing-appender`.
//!   Activation creates the log directory and opens the first file; repeating
//!   an activation with an identical [`FileSpec`] is a no-op.
//! - `syslog` (unix only) routes lines through `openlog`/`syslog`/`closelog`.
//! - [`AmbientOutput`] selects whether output from third-party code is
//!   forwarded or sent to the discard sink.
//!
//! # Invariants
//!
//! - Writes to a disabled or inactive sink succeed without touching the
//!   underlying writer.
//! - [`FileSink::activate`] never replaces an active appender when the
//!   requested [`FileSpec`] is unchanged.
//!
//! # Errors
//!
//! Write operations surface [`std::io::Error`] values from the underlying
//! writer. File activation maps appender initialisation failures into
//! [`std::io::Error`] so callers handle a single error type.
//!
//! # Examples
//!
//! ```
//! use logging_sink::{ConsoleSink, LineMode};
//!
//! let mut console = ConsoleSink::with_line_mode(Vec::new(), LineMode::WithNewline);
//! console.write_line("agent: ready").unwrap();
//! console.enable(false);
//! console.write_line("dropped").unwrap();
//!
//! assert_eq!(console.into_inner(), b"agent: ready\n".to_vec());
//! ```

mod ambient;
mod console;
mod file;
mod line_mode;
/// System log destination built on `openlog(3)`.
#[cfg(unix)]
#[allow(unsafe_code)]
pub mod syslog;

pub use ambient::AmbientOutput;
pub use console::ConsoleSink;
pub use file::{FileSink, FileSpec, RotationInterval};
pub use line_mode::LineMode;
