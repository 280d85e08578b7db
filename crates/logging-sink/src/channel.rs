//! crates/logging-sink/src/channel.rs
//! Event-bus sink publishing records over a crossbeam channel.
//!
//! Every delivered record becomes a [`BusEvent`] on the channel. Consumers on
//! other threads (a network publisher, a monitoring dashboard, a test) receive
//! the rendered text together with the full record. A bounded channel never
//! blocks the sender: when it is full the record is reported as a failed write
//! and the destination counts it.

use std::io;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use logging::levels::{INFO, Level};
use logging::{LogRecord, LogSink};

/// A record published on the event bus.
#[derive(Clone, Debug, PartialEq)]
pub struct BusEvent {
    /// Topic of the sending Log.
    pub topic: String,
    /// Level the record was sent at.
    pub level: Level,
    /// Text produced by the destination's formatter.
    pub rendered: String,
    /// The record itself, including every property.
    pub record: LogRecord,
}

/// Sink that publishes each record as a [`BusEvent`].
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: Sender<BusEvent>,
}

impl ChannelSink {
    /// Creates a sink over a channel holding at most `capacity` events.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, Receiver<BusEvent>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self { sender }, receiver)
    }

    /// Creates a sink over an unbounded channel.
    #[must_use]
    pub fn unbounded() -> (Self, Receiver<BusEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }

    /// Wraps an existing sender.
    #[must_use]
    pub const fn from_sender(sender: Sender<BusEvent>) -> Self {
        Self { sender }
    }

    /// Returns the number of events waiting to be received.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.sender.len()
    }
}

impl LogSink for ChannelSink {
    fn write_record(&self, record: &LogRecord, rendered: &str) -> io::Result<()> {
        let event = BusEvent {
            topic: record.topic().unwrap_or_default().to_owned(),
            level: record.level().unwrap_or(INFO),
            rendered: rendered.to_owned(),
            record: record.clone(),
        };
        self.sender.try_send(event).map_err(|error| match error {
            TrySendError::Full(_) => io::Error::new(io::ErrorKind::WouldBlock, "event bus is full"),
            TrySendError::Disconnected(_) => {
                io::Error::new(io::ErrorKind::BrokenPipe, "event bus has no receivers")
            }
        })
    }
}
