//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the resolved logging policy.
//!
//! [`PolicyLayer`] is a `tracing-subscriber` layer that forwards `tracing`
//! events to a [`SharedContext`]. Events whose target starts with `logp::`
//! are logged under the category that follows the prefix, so
//! `tracing::debug!(target: "logp::net", ...)` is a debug line in the `net`
//! category. Events from any other target are ambient output: they pass the
//! severity threshold like everything else and are dropped entirely once the
//! `stdlog` selector is enabled.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{install, CommandLineFlags, LoggingContext, Paths, SinkSet};
//!
//! let context = LoggingContext::new(CommandLineFlags::default(), Paths::default(), SinkSet::new());
//! let shared = context.into_shared();
//! install(shared.clone()).expect("subscriber already installed");
//!
//! tracing::info!(target: "logp::main", "started");
//! ```

use std::fmt::{self, Write as _};
use std::sync::TryLockError;

use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

use crate::context::SharedContext;
use crate::severity::Severity;
use crate::transport::Transport;

/// Target prefix that marks an event as belonging to a policy category.
pub const TARGET_PREFIX: &str = "logp::";

/// A tracing layer that routes events through a shared logging context.
pub struct PolicyLayer<T> {
    context: SharedContext<T>,
}

impl<T> PolicyLayer<T> {
    /// Creates a layer emitting through `context`.
    #[must_use]
    pub const fn new(context: SharedContext<T>) -> Self {
        Self { context }
    }

    /// Map a tracing target to a policy category. `None` means ambient.
    fn target_to_category(target: &str) -> Option<&str> {
        target
            .strip_prefix(TARGET_PREFIX)
            .filter(|category| !category.is_empty())
    }

    /// Map a tracing level to a severity.
    const fn level_to_severity(level: &Level) -> Severity {
        match *level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            Level::INFO => Severity::Info,
            Level::DEBUG | Level::TRACE => Severity::Debug,
        }
    }
}

impl<S, T> Layer<S> for PolicyLayer<T>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    T: Transport + Send + Sync + 'static,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        // A writer holds the lock while resolving; events raised meanwhile
        // are dropped rather than waiting on ourselves.
        let context = match self.context.try_read() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return,
        };

        let metadata = event.metadata();
        let severity = Self::level_to_severity(metadata.level());
        let category = Self::target_to_category(metadata.target());

        let allowed = match category {
            Some(category) => context.is_enabled(category, severity),
            None => !context.transport().ambient().is_discarded(),
        };
        if !allowed {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let message = visitor.finish();

        match category {
            Some(category) => context.emit(category, severity, &message),
            None => context.emit_ambient(severity, &message),
        }
    }
}

/// Visitor to extract the message and extra fields from a tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(mut self) -> String {
        if !self.fields.is_empty() {
            if !self.message.is_empty() {
                self.message.push(' ');
            }
            self.message.push_str(&self.fields);
        }
        self.message
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}

/// Registers a [`PolicyLayer`] as the process-wide `tracing` subscriber.
///
/// Fails when another global subscriber is already installed.
pub fn install<T>(context: SharedContext<T>) -> Result<(), TryInitError>
where
    T: Transport + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(PolicyLayer::new(context))
        .try_init()
}
