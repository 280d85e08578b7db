//! Shared test utilities for the pipelog workspace.
//!
//! Tests across crates share the process-wide threshold registry, so each
//! test picks its own topic names through [`unique_topic`]. [`FailingWriter`]
//! stands in for a sink whose device went away.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

pub use tempfile;

static NEXT_TOPIC: AtomicU64 = AtomicU64::new(0);

/// Returns a topic name starting with `prefix` that no other call returns.
///
/// The name is a single segment, so it can be used both as a root-level
/// topic and as a child name.
#[must_use]
pub fn unique_topic(prefix: &str) -> String {
    let id = NEXT_TOPIC.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{}_{id}", std::process::id())
}

/// Writer that accepts `budget` writes and then fails every call.
#[derive(Debug)]
pub struct FailingWriter {
    remaining: AtomicUsize,
    kind: io::ErrorKind,
}

impl FailingWriter {
    /// Creates a writer that fails immediately with `BrokenPipe`.
    #[must_use]
    pub const fn new() -> Self {
        Self::after(0)
    }

    /// Creates a writer that succeeds `budget` times before failing.
    #[must_use]
    pub const fn after(budget: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(budget),
            kind: io::ErrorKind::BrokenPipe,
        }
    }

    /// Changes the error kind reported on failure.
    #[must_use]
    pub const fn with_kind(mut self, kind: io::ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    fn take(&self) -> io::Result<()> {
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .map(|_| ())
            .map_err(|_| io::Error::new(self.kind, "injected write failure"))
    }
}

impl Default for FailingWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.take()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_are_unique() {
        let first = unique_topic("t");
        let second = unique_topic("t");
        assert_ne!(first, second);
        assert!(first.starts_with("t_"));
        assert!(!first.contains('.'));
    }

    #[test]
    fn failing_writer_honours_budget() {
        let mut writer = FailingWriter::after(1);
        assert_eq!(writer.write(b"ok").unwrap(), 2);
        let error = writer.write(b"no").unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn failing_writer_kind_is_configurable() {
        let mut writer = FailingWriter::new().with_kind(io::ErrorKind::StorageFull);
        assert_eq!(writer.write(b"x").unwrap_err().kind(), io::ErrorKind::StorageFull);
    }
}
