#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` is a hierarchical, multi-destination logging framework. Code
//! sends records on named [`Log`]s (`"app"`, `"app.worker"`, ...); each record
//! carries a signed verbosity level and a bag of typed properties and is
//! delivered to every destination the Log inherited.
//!
//! # Design
//!
//! - **Thresholds** live in a process-wide [`ThresholdRegistry`] keyed by
//!   topic name. A Log resolves its effective threshold on every send by
//!   walking its name's ancestor chain, so setting a threshold on `"app"`
//!   immediately governs every `"app.*"` Log, including ones created later.
//! - **Destinations and preamble properties** are snapshotted from the parent
//!   when a child is constructed. Later additions stay local.
//! - **Destinations** pair a [`LogSink`] with a [`LogFormatter`] and their own
//!   threshold. A record reaches a destination only if it passes both the
//!   Log's threshold and the destination's.
//! - **Debug output** is tiered by depth (`level = -depth`). Calls deeper than
//!   the build-time [`MAX_DEBUG_DEPTH`](debug::MAX_DEBUG_DEPTH) are compiled
//!   out through [`debug_at!`] and [`DebugLog`]; surviving calls still pass
//!   the runtime check.
//!
//! # Invariants
//!
//! - A record whose level ties a threshold passes (`>=`).
//! - A destination never sees a record that failed the Log's check.
//! - The standard properties `LOG`, `LEVEL` and `TIMESTAMP` are only ever set
//!   by the sending Log.
//! - Sending never fails: unsupported property types are dropped and sink
//!   failures stay inside the destination that hit them.
//!
//! # Examples
//!
//! ```
//! use logging::{Log, LogDestination, MemorySink, TextFormatter, ThresholdRegistry};
//! use logging::levels::{DEBUG, PASS_ALL, WARN};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ThresholdRegistry::new());
//! let sink = Arc::new(MemorySink::new());
//! let mut app = Log::with_registry("app", registry);
//! app.add_destination(Arc::new(LogDestination::new(
//!     Arc::clone(&sink),
//!     TextFormatter::brief(),
//!     PASS_ALL,
//! )));
//! app.add_preamble_property("RUN", 42);
//!
//! let worker = app.child("worker");
//! app.set_threshold(WARN);
//! worker.info("not delivered");
//! worker.warn("delivered");
//!
//! worker.set_threshold(DEBUG);
//! worker.info("delivered too");
//!
//! assert_eq!(sink.lines(), ["app.worker: WARN: delivered", "app.worker: delivered too"]);
//! assert!(sink.records().iter().all(|record| record.contains("RUN")));
//! ```
//!
//! # Features
//!
//! - `serde`: serialization for records, property values and threshold
//!   configuration, plus [`JsonFormatter`].
//! - `tracing-bridge`: [`LogLayer`] forwarding `tracing` events into the
//!   hierarchy.
//!
//! # See also
//!
//! - `logging-sink` for file, event-bus and syslog sinks and the screen/dual
//!   bootstrap helpers.

#[macro_use]
mod macros;

pub mod config;
pub mod debug;
mod destination;
mod formatter;
pub mod levels;
mod line_mode;
mod log;
pub mod record;
pub mod registry;
pub mod sink;
mod thread_local;
mod timing;
#[cfg(feature = "tracing-bridge")]
mod tracing_bridge;

pub use config::{DirectiveError, THRESHOLDS_ENV, ThresholdConfig, ThresholdDirective};
pub use debug::{DebugLog, MAX_DEBUG_DEPTH, RuntimeDebugLog};
pub use destination::{Delivery, LogDestination};
#[cfg(feature = "serde")]
pub use formatter::JsonFormatter;
pub use formatter::{LogFormatter, MAX_DEBUG_INDENT, TextFormatter, debug_indent};
pub use levels::Level;
pub use line_mode::LineMode;
pub use log::{Log, RecordBuilder};
pub use record::{LogRecord, PropertyValue};
pub use registry::{Ancestors, ThresholdRegistry, ancestors};
pub use sink::{LogSink, MemorySink, WriterSink};
pub use timing::{BlockTimingLog, DURATION_NS, STATUS, STATUS_END, STATUS_START};
#[cfg(feature = "tracing-bridge")]
pub use tracing_bridge::{BridgeError, LogLayer, init_tracing, init_tracing_with_filter};
