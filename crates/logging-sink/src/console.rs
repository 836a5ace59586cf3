use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::line_mode::LineMode;

/// Console destination with a runtime enable switch.
///
/// The sink owns its writer behind a [`Mutex`] so lines can be written through
/// a shared reference from any thread. Disabling the sink keeps the writer
/// alive; re-enabling it resumes output on the same handle.
///
/// # Examples
///
/// ```
/// use logging_sink::{ConsoleSink, LineMode};
///
/// let sink = ConsoleSink::with_line_mode(Vec::new(), LineMode::WithoutNewline);
/// sink.write_line("ready")?;
/// assert_eq!(sink.into_inner(), b"ready".to_vec());
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct ConsoleSink<W = io::Stderr> {
    writer: Mutex<W>,
    enabled: bool,
    line_mode: LineMode,
}

impl ConsoleSink<io::Stderr> {
    /// Creates an enabled sink writing to the process's standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl Default for ConsoleSink<io::Stderr> {
    fn default() -> Self {
        Self::stderr()
    }
}

impl<W> ConsoleSink<W> {
    /// Creates an enabled sink that appends a newline after each line.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_line_mode(writer, LineMode::WithNewline)
    }

    /// Creates an enabled sink with the provided [`LineMode`].
    #[must_use]
    pub fn with_line_mode(writer: W, line_mode: LineMode) -> Self {
        Self {
            writer: Mutex::new(writer),
            enabled: true,
            line_mode,
        }
    }

    /// Turns console output on or off.
    pub fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns whether the sink currently forwards lines.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the current [`LineMode`].
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W> ConsoleSink<W>
where
    W: Write,
{
    /// Writes one line when the sink is enabled.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(line.as_bytes())?;
        if self.line_mode.append_newline() {
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

impl<W> fmt::Debug for ConsoleSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("enabled", &self.enabled)
            .field("line_mode", &self.line_mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_sink_writes_lines_with_newlines() {
        let sink = ConsoleSink::new(Vec::new());
        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();

        assert_eq!(sink.into_inner(), b"first\nsecond\n".to_vec());
    }

    #[test]
    fn disabled_sink_drops_lines() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.enable(false);
        assert!(!sink.is_enabled());
        sink.write_line("hidden").unwrap();

        assert!(sink.into_inner().is_empty());
    }

    #[test]
    fn reenabled_sink_resumes_on_same_writer() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.write_line("before").unwrap();
        sink.enable(false);
        sink.write_line("during").unwrap();
        sink.enable(true);
        sink.write_line("after").unwrap();

        assert_eq!(sink.into_inner(), b"before\nafter\n".to_vec());
    }

    #[test]
    fn debug_output_hides_writer() {
        let sink = ConsoleSink::new(Vec::<u8>::new());
        let rendered = format!("{sink:?}");
        assert!(rendered.contains("ConsoleSink"));
        assert!(rendered.contains("enabled: true"));
    }
}
