use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::LogSink;
use crate::line_mode::LineMode;
use crate::record::LogRecord;

/// Sink that streams rendered records into an [`io::Write`] target.
///
/// The writer sits behind a mutex so a single record is always written as one
/// uninterrupted block, whichever thread sent it. By default each record ends
/// with a newline; select [`LineMode::WithoutNewline`] when the formatter
/// supplies its own terminator.
///
/// # Examples
///
/// ```
/// use logging::{LineMode, LogRecord, LogSink, WriterSink};
///
/// let sink = WriterSink::new(Vec::new());
/// sink.write_record(&LogRecord::new(), "first")?;
/// sink.write_record(&LogRecord::new(), "second")?;
/// assert_eq!(sink.into_inner(), b"first\nsecond\n".to_vec());
///
/// let sink = WriterSink::with_line_mode(Vec::new(), LineMode::WithoutNewline);
/// sink.write_record(&LogRecord::new(), "ready")?;
/// assert_eq!(sink.into_inner(), b"ready".to_vec());
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct WriterSink<W> {
    writer: Mutex<W>,
    line_mode: LineMode,
}

impl<W> WriterSink<W> {
    /// Creates a sink that appends a newline after each record.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_line_mode(writer, LineMode::WithNewline)
    }

    /// Creates a sink with the provided [`LineMode`].
    #[must_use]
    pub fn with_line_mode(writer: W, line_mode: LineMode) -> Self {
        Self {
            writer: Mutex::new(writer),
            line_mode,
        }
    }

    /// Returns the sink's [`LineMode`].
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Runs `f` with exclusive access to the underlying writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.lock())
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WriterSink<io::Stderr> {
    /// Creates a sink writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl WriterSink<io::Stdout> {
    /// Creates a sink writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W> LogSink for WriterSink<W>
where
    W: Write + Send,
{
    fn write_record(&self, _record: &LogRecord, rendered: &str) -> io::Result<()> {
        self.line_mode.write_line(&mut *self.lock(), rendered)
    }

    fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl<W> fmt::Debug for WriterSink<W>
where
    W: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink")
            .field("writer", &*self.lock())
            .field("line_mode", &self.line_mode)
            .finish()
    }
}
