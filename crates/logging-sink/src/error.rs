//! crates/logging-sink/src/error.rs
//! Errors raised while constructing sinks.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to set up a sink.
///
/// Only construction is fallible; once a sink is attached to a destination,
/// write failures are handled by the destination and never surface here.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The log file could not be opened or created.
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A syslog tag contained an interior NUL byte.
    #[error("invalid syslog tag {0:?}: contains a NUL byte")]
    InvalidTag(String),
}
