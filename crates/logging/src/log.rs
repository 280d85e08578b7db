//! crates/logging/src/log.rs
//!
//! Named nodes of the logging hierarchy.
//!
//! A [`Log`] combines three pieces of configuration, and they propagate in
//! two different ways:
//!
//! - its *threshold* is never stored on the Log. It is resolved on every send
//!   from the [`ThresholdRegistry`], so a threshold set on `"app"` governs
//!   every existing and future `"app.*"` Log;
//! - its *destinations* and *preamble* are snapshots taken from the parent
//!   when the child is constructed. Later additions on either side stay local
//!   (copy-on-write through [`Arc::make_mut`]).
//!
//! Logs are cheap handles: cloning one clones a few `Arc`s. Setup operations
//! that change a Log's own destinations or preamble take `&mut self`, so they
//! cannot race with concurrent sends through the same handle.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use chrono::Utc;

use crate::destination::LogDestination;
use crate::formatter::TextFormatter;
use crate::levels::{DEBUG, FATAL, INFO, Level, PASS_ALL, WARN};
use crate::record::{LogRecord, PropertyValue};
use crate::registry::ThresholdRegistry;
use crate::sink::WriterSink;

static DEFAULT_LOG: LazyLock<RwLock<Log>> = LazyLock::new(|| RwLock::new(Log::screen_root()));

/// A named node in the logging hierarchy.
///
/// # Examples
///
/// ```
/// use logging::{Log, LogDestination, MemorySink, TextFormatter, ThresholdRegistry};
/// use logging::levels::{DEBUG, INFO, PASS_ALL, WARN};
/// use std::sync::Arc;
///
/// let registry = Arc::new(ThresholdRegistry::new());
/// let sink = Arc::new(MemorySink::new());
///
/// let mut app = Log::with_registry("app", registry);
/// app.add_destination(Arc::new(LogDestination::new(
///     Arc::clone(&sink),
///     TextFormatter::brief(),
///     PASS_ALL,
/// )));
/// let worker = app.child("worker");
///
/// app.set_threshold(WARN);
/// worker.info("ignored");
/// worker.warn("delivered");
///
/// worker.set_threshold(DEBUG);
/// worker.info("now delivered");
/// app.info("still ignored");
///
/// assert_eq!(sink.len(), 2);
/// assert_eq!(worker.name(), "app.worker");
/// assert_eq!(worker.threshold(), DEBUG);
/// assert_eq!(app.threshold(), WARN);
/// # let _ = INFO;
/// ```
#[derive(Clone)]
pub struct Log {
    name: Arc<str>,
    registry: Arc<ThresholdRegistry>,
    destinations: Arc<Vec<Arc<LogDestination>>>,
    preamble: Arc<BTreeMap<String, PropertyValue>>,
}

impl Log {
    /// Creates a Log for `name` without destinations, bound to the global
    /// registry.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_registry(name, Arc::clone(ThresholdRegistry::global()))
    }

    /// Creates a Log for `name` without destinations, resolving thresholds
    /// through `registry`.
    #[must_use]
    pub fn with_registry(name: impl Into<String>, registry: Arc<ThresholdRegistry>) -> Self {
        Self {
            name: Arc::from(name.into()),
            registry,
            destinations: Arc::new(Vec::new()),
            preamble: Arc::new(BTreeMap::new()),
        }
    }

    /// Returns the process-wide default Log.
    ///
    /// Until [`set_default`](Self::set_default) installs another one, this is
    /// a root Log writing brief text to standard error.
    #[must_use]
    pub fn root() -> Self {
        DEFAULT_LOG
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `log` as the process-wide default and returns the previous one.
    ///
    /// This is a bootstrap step: call it once near process start, before
    /// other threads begin fetching [`root`](Self::root). Handles obtained
    /// earlier keep their own destinations.
    pub fn set_default(log: Self) -> Self {
        let mut slot = DEFAULT_LOG.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, log)
    }

    fn screen_root() -> Self {
        let mut root = Self::new("");
        root.add_destination(Arc::new(LogDestination::new(
            WriterSink::stderr(),
            TextFormatter::brief(),
            PASS_ALL,
        )));
        root
    }

    /// Creates a child Log named `<self>.<relative>` (or just `relative` when
    /// `self` is the root).
    ///
    /// The child starts with a snapshot of this Log's destinations and
    /// preamble and shares its registry. An empty `relative` name yields a
    /// Log with the same name.
    #[must_use]
    pub fn child(&self, relative: &str) -> Self {
        Self {
            name: Arc::from(self.child_name(relative)),
            registry: Arc::clone(&self.registry),
            destinations: Arc::clone(&self.destinations),
            preamble: Arc::clone(&self.preamble),
        }
    }

    fn child_name(&self, relative: &str) -> String {
        if self.name.is_empty() {
            relative.to_owned()
        } else if relative.is_empty() {
            self.name.to_string()
        } else {
            format!("{}.{relative}", self.name)
        }
    }

    /// Returns the full topic name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the parent topic, or `None` for the root.
    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(self.name.rfind('.').map_or("", |dot| &self.name[..dot]))
        }
    }

    /// Returns the registry this Log resolves thresholds through.
    #[must_use]
    pub fn registry(&self) -> &Arc<ThresholdRegistry> {
        &self.registry
    }

    /// Returns the effective threshold, resolved fresh from the registry.
    #[must_use]
    pub fn threshold(&self) -> Level {
        self.registry.resolve_threshold(&self.name)
    }

    /// Sets the explicit threshold for this Log's name.
    ///
    /// Every Log with this name, including ones constructed later, and every
    /// descendant without a more specific override is affected.
    pub fn set_threshold(&self, level: Level) {
        self.registry.set_threshold(&self.name, level);
    }

    /// Sets the explicit threshold for the descendant named `relative`.
    pub fn set_threshold_for(&self, relative: &str, level: Level) {
        self.registry
            .set_threshold(&self.child_name(relative), level);
    }

    /// Returns the effective threshold of the descendant named `relative`.
    #[must_use]
    pub fn threshold_for(&self, relative: &str) -> Level {
        self.registry.resolve_threshold(&self.child_name(relative))
    }

    /// Reports whether a record at `level` passes this Log's threshold.
    ///
    /// Destination thresholds are not consulted.
    #[must_use]
    pub fn sends(&self, level: Level) -> bool {
        level >= self.threshold()
    }

    /// Sends a message without extra properties.
    pub fn log(&self, level: Level, message: impl Into<String>) {
        if self.sends(level) {
            self.dispatch(level, LogRecord::with_message(message));
        }
    }

    /// Sends a message with properties attached.
    ///
    /// Properties named like a standard property are ignored. Preamble
    /// properties fill in any name the caller did not supply.
    pub fn send<I, K, V>(&self, level: Level, message: impl Into<String>, properties: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        if !self.sends(level) {
            return;
        }
        let mut record = LogRecord::with_message(message);
        for (name, value) in properties {
            record.attach(name, value);
        }
        self.dispatch(level, record);
    }

    /// Sends a record assembled by the caller.
    pub fn send_record(&self, level: Level, record: LogRecord) {
        if self.sends(level) {
            self.dispatch(level, record);
        }
    }

    /// Starts an incrementally built record at `level`.
    ///
    /// The threshold is checked once up front: when the record would be
    /// discarded, the builder ignores every message part and property.
    pub fn record(&self, level: Level) -> RecordBuilder<'_> {
        RecordBuilder {
            log: self,
            level,
            record: self.sends(level).then(LogRecord::new),
        }
    }

    /// Sends a message at [`FATAL`].
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(FATAL, message);
    }

    /// Sends a message at [`WARN`].
    pub fn warn(&self, message: impl Into<String>) {
        self.log(WARN, message);
    }

    /// Sends a message at [`INFO`].
    pub fn info(&self, message: impl Into<String>) {
        self.log(INFO, message);
    }

    /// Sends a message at [`DEBUG`].
    pub fn debug(&self, message: impl Into<String>) {
        self.log(DEBUG, message);
    }

    /// Adds a destination to this Log only.
    ///
    /// Children constructed afterwards inherit it. The parent and children
    /// constructed earlier do not.
    pub fn add_destination(&mut self, destination: Arc<LogDestination>) {
        Arc::make_mut(&mut self.destinations).push(destination);
    }

    /// Returns the destinations in the order they were added.
    #[must_use]
    pub fn destinations(&self) -> &[Arc<LogDestination>] {
        &self.destinations
    }

    /// Adds a property attached to every record this Log sends.
    ///
    /// Standard property names are ignored.
    pub fn add_preamble_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        let name = name.into();
        if !crate::record::is_standard_property(&name) {
            Arc::make_mut(&mut self.preamble).insert(name, value.into());
        }
    }

    /// Returns the preamble property stored under `name`.
    #[must_use]
    pub fn preamble_property(&self, name: &str) -> Option<&PropertyValue> {
        self.preamble.get(name)
    }

    /// Iterates over the preamble properties in name order.
    pub fn preamble(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.preamble
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Flushes every destination, ignoring individual failures.
    pub fn flush(&self) {
        for destination in self.destinations.iter() {
            if let Err(error) = destination.flush() {
                tracing::warn!(target: "logging::log", topic = %self.name, %error, "flush failed");
            }
        }
    }

    fn dispatch(&self, level: Level, mut record: LogRecord) {
        record.attach_defaults(self.preamble.iter());
        record.stamp(&self.name, level, Utc::now());
        for destination in self.destinations.iter() {
            destination.offer(&record);
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("name", &self.name)
            .field("destinations", &self.destinations.len())
            .field("preamble", &self.preamble)
            .finish_non_exhaustive()
    }
}

/// Incremental record construction returned by [`Log::record`].
///
/// ```
/// use logging::{Log, LogDestination, MemorySink, TextFormatter, ThresholdRegistry};
/// use logging::levels::{DEBUG, PASS_ALL};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let mut log = Log::with_registry("calib", Arc::new(ThresholdRegistry::new()));
/// log.add_destination(Arc::new(LogDestination::new(Arc::clone(&sink), TextFormatter::brief(), PASS_ALL)));
///
/// log.record(0).append("flat field").append("applied").attach("ccd", 12).send();
/// log.record(DEBUG).append("never built").send();
///
/// let records = sink.records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].message(), "flat field applied");
/// ```
#[must_use = "a record is only delivered by `send`"]
pub struct RecordBuilder<'a> {
    log: &'a Log,
    level: Level,
    record: Option<LogRecord>,
}

impl RecordBuilder<'_> {
    /// Reports whether the record will be delivered when sent.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.record.is_some()
    }

    /// Returns the level the record will be sent at.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Appends a message part.
    pub fn append(mut self, part: impl Into<String>) -> Self {
        if let Some(record) = self.record.as_mut() {
            record.append(part);
        }
        self
    }

    /// Attaches a typed property.
    pub fn attach(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        if let Some(record) = self.record.as_mut() {
            record.attach(name, value);
        }
        self
    }

    /// Attaches a dynamically-typed property; unsupported types are dropped.
    pub fn attach_any(mut self, name: impl Into<String>, value: &dyn std::any::Any) -> Self {
        if let Some(record) = self.record.as_mut() {
            record.attach_any(name, value);
        }
        self
    }

    /// Sends the record through the originating Log.
    pub fn send(self) {
        if let Some(record) = self.record {
            self.log.send_record(self.level, record);
        }
    }
}
