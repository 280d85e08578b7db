//! crates/logging-sink/src/file.rs
//! Append-only log files.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use logging::{LineMode, LogRecord, LogSink};

use crate::error::SinkError;

/// Sink writing each record as a line to a file.
///
/// Writes go through a buffered writer guarded by a mutex, so records from
/// concurrent Logs never interleave. With auto-flush enabled (the default)
/// every record reaches the file before `write_record` returns; otherwise the
/// buffer is flushed by [`LogSink::flush`] or when the sink is dropped.
///
/// # Examples
///
/// ```
/// use logging::{Log, LogDestination, TextFormatter, ThresholdRegistry};
/// use logging::levels::PASS_ALL;
/// use logging_sink::FileSink;
/// use std::sync::Arc;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("run.log");
///
/// let mut log = Log::with_registry("ingest", Arc::new(ThresholdRegistry::new()));
/// log.add_destination(Arc::new(LogDestination::new(
///     FileSink::create(&path).unwrap(),
///     TextFormatter::brief(),
///     PASS_ALL,
/// )));
/// log.info("opened visit 12");
///
/// assert_eq!(std::fs::read_to_string(&path).unwrap(), "ingest: opened visit 12\n");
/// ```
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    line_mode: LineMode,
    autoflush: bool,
}

impl FileSink {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        Self::with_options(path.as_ref(), OpenOptions::new().create(true).append(true))
    }

    /// Creates `path`, truncating an existing file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        Self::with_options(
            path.as_ref(),
            OpenOptions::new().create(true).write(true).truncate(true),
        )
    }

    fn with_options(path: &Path, options: &OpenOptions) -> Result<Self, SinkError> {
        let file = options.open(path).map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(target: "logging_sink::file", path = %path.display(), "log file opened");
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
            line_mode: LineMode::WithNewline,
            autoflush: true,
        })
    }

    /// Sets whether each record is flushed to the file immediately.
    #[must_use]
    pub fn with_autoflush(mut self, autoflush: bool) -> Self {
        self.autoflush = autoflush;
        self
    }

    /// Sets whether a newline is appended after each record.
    #[must_use]
    pub fn with_line_mode(mut self, line_mode: LineMode) -> Self {
        self.line_mode = line_mode;
        self
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reports whether each record is flushed immediately.
    #[must_use]
    pub const fn autoflush(&self) -> bool {
        self.autoflush
    }

    fn lock(&self) -> MutexGuard<'_, BufWriter<File>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for FileSink {
    fn write_record(&self, _record: &LogRecord, rendered: &str) -> io::Result<()> {
        let mut writer = self.lock();
        self.line_mode.write_line(&mut *writer, rendered)?;
        if self.autoflush {
            writer.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }
}
