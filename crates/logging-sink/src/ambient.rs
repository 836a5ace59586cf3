/// Destination for log output produced by code outside the policy's control.
///
/// Libraries frequently log through the process-wide `tracing` dispatcher.
/// [`AmbientOutput::Forward`] routes that output through the configured
/// sinks; [`AmbientOutput::Discard`] drops it before it reaches any sink.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AmbientOutput {
    /// Forward third-party output to the active sinks.
    #[default]
    Forward,
    /// Drop third-party output.
    Discard,
}

impl AmbientOutput {
    /// Returns `true` when third-party output is discarded.
    #[must_use]
    pub const fn is_discarded(self) -> bool {
        matches!(self, Self::Discard)
    }
}
