//! crates/logging/src/destination.rs
//!
//! A sink paired with its own threshold and formatter.
//!
//! A destination has no notion of the topic hierarchy: it is shared by
//! reference among every [`Log`](crate::Log) that inherited it and filters
//! purely on the record's level. Write failures stay local to the destination.
//! They are counted, reported on standard error and through `tracing`, and
//! never reach the code that sent the record.

use std::fmt;
use std::io::{self, Write as _};
use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};

use crate::formatter::LogFormatter;
use crate::levels::{INFO, Level};
use crate::record::LogRecord;
use crate::sink::LogSink;
use crate::thread_local::with_scratch;

/// Outcome of offering a record to a destination.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Delivery {
    /// The record's level was below the destination's threshold.
    Filtered,
    /// The record was rendered and written.
    Written,
    /// The sink failed to write the record.
    Failed,
}

/// A sink with its own threshold and rendering strategy.
///
/// # Examples
///
/// ```
/// use logging::{Delivery, LogDestination, LogRecord, MemorySink, TextFormatter};
/// use logging::levels::WARN;
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let destination = LogDestination::new(Arc::clone(&sink), TextFormatter::brief(), WARN);
///
/// assert_eq!(destination.offer(&LogRecord::with_message("quiet")), Delivery::Filtered);
/// destination.set_threshold(0);
/// assert_eq!(destination.offer(&LogRecord::with_message("heard")), Delivery::Written);
/// assert_eq!(sink.lines(), ["heard"]);
/// ```
pub struct LogDestination {
    threshold: AtomicI32,
    formatter: Box<dyn LogFormatter>,
    sink: Box<dyn LogSink>,
    written: AtomicU64,
    failures: AtomicU64,
}

impl LogDestination {
    /// Creates a destination writing records at or above `threshold`.
    #[must_use]
    pub fn new<S, F>(sink: S, formatter: F, threshold: Level) -> Self
    where
        S: LogSink + 'static,
        F: LogFormatter + 'static,
    {
        Self {
            threshold: AtomicI32::new(threshold),
            formatter: Box::new(formatter),
            sink: Box::new(sink),
            written: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Returns the destination's threshold.
    #[must_use]
    pub fn threshold(&self) -> Level {
        self.threshold.load(Ordering::Relaxed)
    }

    /// Replaces the destination's threshold.
    pub fn set_threshold(&self, level: Level) {
        self.threshold.store(level, Ordering::Relaxed);
    }

    /// Reports whether a record at `level` would be written.
    #[must_use]
    pub fn passes(&self, level: Level) -> bool {
        level >= self.threshold()
    }

    /// Formats and writes `record` when its level reaches the threshold.
    ///
    /// Records without a stamped level are treated as [`INFO`]. A failing
    /// sink yields [`Delivery::Failed`]; the failure is reported on the
    /// destination's own diagnostic channel and never propagated.
    pub fn offer(&self, record: &LogRecord) -> Delivery {
        if !self.passes(record.level().unwrap_or(INFO)) {
            return Delivery::Filtered;
        }

        with_scratch(|rendered| {
            self.formatter.format(record, rendered);
            match self.sink.write_record(record, rendered) {
                Ok(()) => {
                    self.written.fetch_add(1, Ordering::Relaxed);
                    Delivery::Written
                }
                Err(error) => {
                    self.report_failure(record, &error);
                    Delivery::Failed
                }
            }
        })
    }

    /// Flushes the underlying sink.
    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Returns the number of records written successfully.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Returns the number of failed writes.
    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    // Reports the 1st, 2nd, 4th, 8th... failure so a dead sink cannot flood stderr.
    fn report_failure(&self, record: &LogRecord, error: &io::Error) {
        let count = self.failures.fetch_add(1, Ordering::Relaxed) + 1;
        if !count.is_power_of_two() {
            return;
        }

        let topic = record.topic().unwrap_or_default();
        let _ = writeln!(
            io::stderr().lock(),
            "logging: destination dropped a record for topic {topic:?} ({count} failures so far): {error}"
        );
        tracing::warn!(
            target: "logging::destination",
            topic,
            failures = count,
            %error,
            "destination write failed"
        );
    }
}

impl fmt::Debug for LogDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogDestination")
            .field("threshold", &self.threshold())
            .field("written", &self.written())
            .field("failures", &self.failures())
            .finish_non_exhaustive()
    }
}
