#![deny(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `pipelog` bundles the workspace into a single dependency for pipeline
//! applications: the hierarchical Log core from `logging` at the crate root
//! and the file, event-bus and syslog sinks from `logging-sink` under
//! [`sinks`].
//!
//! # Examples
//!
//! Bootstrap a screen root, configure thresholds from a directive string and
//! send on a child:
//!
//! ```
//! use pipelog::{Log, ThresholdConfig};
//! use pipelog::sinks::ScreenLog;
//!
//! let _root = ScreenLog::install_scoped(false);
//! let config: ThresholdConfig = "loader=debug".parse().unwrap();
//! config.apply(pipelog::ThresholdRegistry::global());
//!
//! let loader = Log::root().child("loader");
//! pipelog::log_debug!(loader, "read {} rows", 128);
//! ```

pub use logging::*;

/// Sinks and bootstrap helpers from `logging-sink`.
pub mod sinks {
    pub use logging_sink::*;
}
