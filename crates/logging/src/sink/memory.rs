use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::LogSink;
use crate::record::LogRecord;

/// Sink that keeps every delivered record and its rendering in memory.
///
/// Useful for tests and for applications that want to inspect recent output.
/// Share it through an [`Arc`](std::sync::Arc) to read back what a
/// destination wrote.
#[derive(Debug, Default)]
pub struct MemorySink {
    captured: Mutex<Vec<(LogRecord, String)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rendered text of every captured record, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|(_, rendered)| rendered.clone())
            .collect()
    }

    /// Returns every captured record, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().iter().map(|(record, _)| record.clone()).collect()
    }

    /// Removes and returns everything captured so far.
    pub fn drain(&self) -> Vec<(LogRecord, String)> {
        self.lock().drain(..).collect()
    }

    /// Returns the number of captured records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Reports whether nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(LogRecord, String)>> {
        self.captured.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn write_record(&self, record: &LogRecord, rendered: &str) -> io::Result<()> {
        self.lock().push((record.clone(), rendered.to_owned()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_in_order_and_drains() {
        let sink = MemorySink::new();
        sink.write_record(&LogRecord::with_message("one"), "1")
            .expect("write succeeds");
        sink.write_record(&LogRecord::with_message("two"), "2")
            .expect("write succeeds");

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.lines(), ["1", "2"]);
        assert_eq!(sink.records()[1].message(), "two");

        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert!(sink.is_empty());
        assert!(sink.drain().is_empty());
    }
}
