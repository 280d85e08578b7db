//! crates/logging/src/tracing_bridge.rs
//! Bridge from the `tracing` ecosystem into the Log hierarchy.
//!
//! [`LogLayer`] is a `tracing-subscriber` layer that turns every event into a
//! record on a descendant of its root Log:
//!
//! - the event target `a::b` becomes the topic `a.b` below the root;
//! - `ERROR`, `WARN`, `INFO`, `DEBUG` and `TRACE` map to [`FATAL`], [`WARN`],
//!   [`INFO`], [`DEBUG`] and [`TRACE`];
//! - the `message` field becomes the message text and every other field a
//!   property.
//!
//! The framework's own diagnostics (targets under `logging`) are never
//! forwarded, and an event raised while another one is being forwarded on the
//! same thread is dropped.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{init_tracing, Log};
//!
//! init_tracing(Log::root())?;
//! tracing::warn!(target: "ingest::reader", bytes = 512, "short read");
//! // delivered on Log "ingest.reader" at WARN with property bytes=512
//! ```

use std::fmt;

use thiserror::Error;
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};

use crate::levels::{DEBUG, FATAL, INFO, Level, TRACE, WARN};
use crate::log::Log;
use crate::record::{LogRecord, PropertyValue};
use crate::thread_local::BridgeGuard;

/// Crate targets of the framework's own diagnostics.
const OWN_TARGETS: [&str; 2] = ["logging", "logging_sink"];

/// Errors raised while installing the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A global `tracing` subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

/// A tracing layer that forwards events to the Log hierarchy.
#[derive(Clone, Debug)]
pub struct LogLayer {
    root: Log,
}

impl LogLayer {
    /// Creates a layer that sends events on descendants of `root`.
    #[must_use]
    pub const fn new(root: Log) -> Self {
        Self { root }
    }

    /// Returns the Log events are forwarded below.
    #[must_use]
    pub const fn root(&self) -> &Log {
        &self.root
    }

    /// Maps a tracing target to a topic name relative to the root.
    fn target_to_topic(target: &str) -> String {
        target.replace("::", ".")
    }

    /// Map a tracing level to a verbosity level.
    const fn level_to_verbosity(level: tracing::Level) -> Level {
        match level {
            tracing::Level::ERROR => FATAL,
            tracing::Level::WARN => WARN,
            tracing::Level::INFO => INFO,
            tracing::Level::DEBUG => DEBUG,
            tracing::Level::TRACE => TRACE,
        }
    }

    fn is_own_target(target: &str) -> bool {
        OWN_TARGETS.iter().any(|own| {
            target
                .strip_prefix(own)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
        })
    }
}

impl<S> Layer<S> for LogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if Self::is_own_target(target) {
            return;
        }
        let Some(_guard) = BridgeGuard::enter() else {
            return;
        };

        let log = self.root.child(&Self::target_to_topic(target));
        let level = Self::level_to_verbosity(*metadata.level());
        if !log.sends(level) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        log.send_record(level, visitor.record);
    }
}

/// Visitor that copies event fields into a record.
#[derive(Default)]
struct RecordVisitor {
    record: LogRecord,
}

impl RecordVisitor {
    fn put(&mut self, field: &Field, value: PropertyValue) {
        if field.name() == "message" {
            self.record.append(value.to_string());
        } else {
            self.record.attach(field.name(), value);
        }
    }
}

impl Visit for RecordVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, PropertyValue::Double(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, PropertyValue::Long(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let value = i64::try_from(value)
            .map_or_else(|_| PropertyValue::Text(value.to_string()), PropertyValue::Long);
        self.put(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, PropertyValue::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, PropertyValue::Text(value.to_owned()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, PropertyValue::Text(format!("{value:?}")));
    }
}

/// Installs a global subscriber forwarding every `tracing` event below `root`.
///
/// # Errors
///
/// Returns [`BridgeError::AlreadyInstalled`] when a global subscriber exists.
pub fn init_tracing(root: Log) -> Result<(), BridgeError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(LogLayer::new(root))
        .try_init()?;
    Ok(())
}

/// Like [`init_tracing`], with an additional filter layer in front.
///
/// # Errors
///
/// Returns [`BridgeError::AlreadyInstalled`] when a global subscriber exists.
pub fn init_tracing_with_filter<F>(root: Log, filter: F) -> Result<(), BridgeError>
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(LogLayer::new(root))
        .try_init()?;
    Ok(())
}
