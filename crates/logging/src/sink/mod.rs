//! crates/logging/src/sink/mod.rs
//!
//! The write capability underneath a [`LogDestination`](crate::LogDestination).
//!
//! A sink receives each record that passed every threshold together with the
//! text its destination's formatter rendered. Sinks are shared by every Log
//! that inherited the destination, so implementations serialize their own
//! writes: two records must never interleave mid-line.

use std::io;
use std::sync::Arc;

use crate::record::LogRecord;

mod memory;
mod writer;

pub use memory::MemorySink;
pub use writer::WriterSink;

/// Underlying write capability of a destination.
pub trait LogSink: Send + Sync {
    /// Writes one record. `rendered` is the formatter's output for `record`.
    fn write_record(&self, record: &LogRecord, rendered: &str) -> io::Result<()>;

    /// Flushes buffered output.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<S> LogSink for Arc<S>
where
    S: LogSink + ?Sized,
{
    fn write_record(&self, record: &LogRecord, rendered: &str) -> io::Result<()> {
        (**self).write_record(record, rendered)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<S> LogSink for Box<S>
where
    S: LogSink + ?Sized,
{
    fn write_record(&self, record: &LogRecord, rendered: &str) -> io::Result<()> {
        (**self).write_record(record, rendered)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}
