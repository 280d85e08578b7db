#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` supplies the destinations that sit outside the core
//! `logging` crate: append-only files, an in-process event bus and syslog.
//! It also provides the bootstrap helpers that build a ready-made root Log
//! and install it as the process-wide default.
//!
//! # Design
//!
//! Every sink implements [`logging::LogSink`], so it plugs into a
//! [`logging::LogDestination`] with any formatter and threshold. Sinks never
//! filter; the destination decides what reaches them and counts write
//! failures. Construction is the only fallible step and reports a
//! [`SinkError`].
//!
//! - [`FileSink`] appends lines through a buffered, mutex-guarded writer.
//! - [`ChannelSink`] publishes [`BusEvent`]s over a crossbeam channel without
//!   ever blocking the sender.
//! - `syslog::SyslogSink` (unix only) submits records to syslog(3).
//! - [`ScreenLog`] and [`DualLog`] build default roots; their scoped variants
//!   return a [`DefaultLogGuard`] that restores the previous default on drop.
//!
//! # Invariants
//!
//! - A full or disconnected event bus is a write failure, never a block.
//! - Auto-flushing file sinks hand every record to the OS before returning.
//! - Dropping a [`DefaultLogGuard`] reinstates exactly the Log it replaced.
//!
//! # Examples
//!
//! Publish records to a consumer thread:
//!
//! ```
//! use logging::{Log, LogDestination, TextFormatter, ThresholdRegistry};
//! use logging::levels::PASS_ALL;
//! use logging_sink::ChannelSink;
//! use std::sync::Arc;
//!
//! let (sink, events) = ChannelSink::unbounded();
//! let mut log = Log::with_registry("ingest", Arc::new(ThresholdRegistry::new()));
//! log.add_destination(Arc::new(LogDestination::new(sink, TextFormatter::brief(), PASS_ALL)));
//!
//! let consumer = std::thread::spawn(move || events.recv().unwrap().rendered);
//! log.info("visit 3 loaded");
//! assert_eq!(consumer.join().unwrap(), "ingest: visit 3 loaded");
//! ```
//!
//! # See also
//!
//! - `logging` for Logs, destinations, formatters and the debug facade.

mod bootstrap;
mod channel;
mod error;
mod file;
mod guard;
#[cfg(unix)]
#[allow(unsafe_code)]
pub mod syslog;

pub use bootstrap::{DualLog, ScreenLog};
pub use channel::{BusEvent, ChannelSink};
pub use error::SinkError;
pub use file::FileSink;
pub use guard::DefaultLogGuard;
#[cfg(unix)]
pub use syslog::{SyslogConfig, SyslogFacility, SyslogSink};
