//! crates/logging/src/timing.rs
//! Start/end records around a timed block.

use std::time::{Duration, Instant};

use crate::levels::{INFO, Level};
use crate::log::Log;

/// `STATUS` value on the record sent when a block starts.
pub const STATUS_START: &str = "start";
/// `STATUS` value on the record sent when a block ends.
pub const STATUS_END: &str = "end";
/// Property carrying the start/end marker.
pub const STATUS: &str = "STATUS";
/// Property carrying the elapsed time in nanoseconds on the end record.
pub const DURATION_NS: &str = "DURATION_NS";

/// A child Log that brackets a block of work with `Starting <block>` and
/// `Ending <block>` records.
///
/// The end record is sent by [`finish`](Self::finish) or, failing that, when
/// the value is dropped. Nested blocks come from [`timer_for`](Self::timer_for)
/// and are named below the enclosing block.
///
/// # Examples
///
/// ```
/// use logging::{BlockTimingLog, Log, LogDestination, MemorySink, TextFormatter, ThresholdRegistry};
/// use logging::levels::PASS_ALL;
/// use std::sync::Arc;
///
/// let registry = Arc::new(ThresholdRegistry::new());
/// registry.set_root_threshold(PASS_ALL);
/// let sink = Arc::new(MemorySink::new());
/// let mut log = Log::with_registry("pipeline", registry);
/// log.add_destination(Arc::new(LogDestination::new(Arc::clone(&sink), TextFormatter::brief(), PASS_ALL)));
///
/// {
///     let _block = BlockTimingLog::start(&log, "calibrate");
/// }
///
/// let messages: Vec<_> = sink.records().iter().map(|r| r.message()).collect();
/// assert_eq!(messages, ["Starting calibrate", "Ending calibrate"]);
/// ```
#[derive(Debug)]
pub struct BlockTimingLog {
    log: Log,
    block: String,
    level: Level,
    started: Instant,
    finished: bool,
}

impl BlockTimingLog {
    /// Level used by [`start`](Self::start).
    pub const DEFAULT_LEVEL: Level = INFO - 1;

    /// Starts timing `block` under `parent` at [`DEFAULT_LEVEL`](Self::DEFAULT_LEVEL).
    pub fn start(parent: &Log, block: &str) -> Self {
        Self::start_at(parent, block, Self::DEFAULT_LEVEL)
    }

    /// Starts timing `block` under `parent`, sending both records at `level`.
    pub fn start_at(parent: &Log, block: &str, level: Level) -> Self {
        let timer = Self {
            log: parent.child(block),
            block: block.to_owned(),
            level,
            started: Instant::now(),
            finished: false,
        };
        timer
            .log
            .record(level)
            .append(format!("Starting {block}"))
            .attach(STATUS, STATUS_START)
            .send();
        timer
    }

    /// Returns the child Log named after the block.
    #[must_use]
    pub const fn log(&self) -> &Log {
        &self.log
    }

    /// Returns the block name.
    #[must_use]
    pub fn block(&self) -> &str {
        &self.block
    }

    /// Returns the level both records are sent at.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Starts a nested block one level deeper.
    pub fn timer_for(&self, block: &str) -> Self {
        Self::start_at(&self.log, block, self.level.saturating_sub(1))
    }

    /// Returns the time since the block started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Ends the block and returns its duration.
    pub fn finish(mut self) -> Duration {
        self.end()
    }

    fn end(&mut self) -> Duration {
        let elapsed = self.elapsed();
        if !self.finished {
            self.finished = true;
            let nanos = i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX);
            self.log
                .record(self.level)
                .append(format!("Ending {}", self.block))
                .attach(STATUS, STATUS_END)
                .attach(DURATION_NS, nanos)
                .send();
        }
        elapsed
    }
}

impl Drop for BlockTimingLog {
    fn drop(&mut self) {
        self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{PASS_ALL, WARN};
    use crate::record::{LogRecord, PropertyValue};
    use crate::{LogDestination, MemorySink, TextFormatter, ThresholdRegistry};
    use std::sync::Arc;

    fn capture(name: &str) -> (Log, Arc<MemorySink>) {
        let registry = Arc::new(ThresholdRegistry::new());
        registry.set_root_threshold(PASS_ALL);
        let sink = Arc::new(MemorySink::new());
        let mut log = Log::with_registry(name, registry);
        log.add_destination(Arc::new(LogDestination::new(
            Arc::clone(&sink),
            TextFormatter::brief(),
            PASS_ALL,
        )));
        (log, sink)
    }

    #[test]
    fn finish_sends_end_record_once() {
        let (log, sink) = capture("job");
        let timer = BlockTimingLog::start(&log, "load");
        assert_eq!(timer.log().name(), "job.load");
        let elapsed = timer.finish();

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(STATUS), Some(&PropertyValue::from(STATUS_START)));
        assert_eq!(records[1].message(), "Ending load");
        assert_eq!(records[1].get(STATUS), Some(&PropertyValue::from(STATUS_END)));
        let nanos = records[1].get(DURATION_NS).and_then(PropertyValue::as_i64);
        assert_eq!(nanos, Some(i64::try_from(elapsed.as_nanos()).unwrap()));
        assert_eq!(records[1].level(), Some(BlockTimingLog::DEFAULT_LEVEL));
    }

    #[test]
    fn nested_blocks_go_deeper() {
        let (log, sink) = capture("job");
        {
            let outer = BlockTimingLog::start(&log, "outer");
            let _inner = outer.timer_for("inner");
        }
        let topics: Vec<_> = sink
            .records()
            .iter()
            .map(|r| (r.topic().unwrap_or_default().to_owned(), r.level()))
            .collect();
        assert_eq!(
            topics,
            [
                ("job.outer".to_owned(), Some(-1)),
                ("job.outer.inner".to_owned(), Some(-2)),
                ("job.outer.inner".to_owned(), Some(-2)),
                ("job.outer".to_owned(), Some(-1)),
            ]
        );
    }

    #[test]
    fn nesting_at_lowest_level_saturates() {
        let (log, sink) = capture("job");
        {
            let outer = BlockTimingLog::start_at(&log, "outer", PASS_ALL);
            let inner = outer.timer_for("inner");
            assert_eq!(inner.level(), PASS_ALL);
        }
        let levels: Vec<_> = sink.records().iter().map(LogRecord::level).collect();
        assert_eq!(levels, [Some(PASS_ALL); 4]);
    }

    #[test]
    fn filtered_level_sends_nothing() {
        let (log, sink) = capture("quiet");
        log.set_threshold(WARN);
        let timer = BlockTimingLog::start_at(&log, "step", INFO);
        assert_eq!(timer.level(), INFO);
        assert_eq!(timer.block(), "step");
        drop(timer);
        assert!(sink.is_empty());
    }
}
