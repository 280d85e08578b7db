//! crates/logging/src/debug.rs
//!
//! Depth-tiered debug output with a build-time ceiling.
//!
//! Debug calls carry a positive *depth*; the record is sent at level `-depth`.
//! Two filters apply:
//!
//! 1. **Build time.** Calls deeper than [`MAX_DEBUG_DEPTH`] are removed during
//!    compilation: their message closures and format arguments never run and
//!    the branch is constant-folded away. The ceiling is read from the
//!    `LOG_MAX_DEBUG` environment variable when this crate is built and
//!    defaults to `0`, which compiles out every tiered call.
//! 2. **Run time.** Surviving calls go through the ordinary registry check of
//!    the Log they are sent on.
//!
//! [`DebugLog`] takes the depth as a const generic argument and may override
//! the ceiling per type (`DebugLog<3>`). [`RuntimeDebugLog`] and the
//! [`debug_runtime!`](crate::debug_runtime) macro skip the first filter for
//! callers whose depth is only known at run time.

use crate::levels::Level;
use crate::log::{Log, RecordBuilder};

/// Deepest debug depth compiled into this build.
pub const MAX_DEBUG_DEPTH: Level = parse_depth(env!("LOGGING_MAX_DEBUG_DEPTH"));

#[allow(clippy::cast_lossless)]
const fn parse_depth(text: &str) -> Level {
    let bytes = text.as_bytes();
    let mut depth: Level = 0;
    let mut index = 0;
    while index < bytes.len() {
        let byte = bytes[index];
        if !byte.is_ascii_digit() {
            return 0;
        }
        depth = depth * 10 + (byte - b'0') as Level;
        index += 1;
    }
    depth
}

/// Debug facade whose calls deeper than `MAX` are compiled out.
///
/// # Examples
///
/// ```
/// use logging::{DebugLog, Log, LogDestination, MemorySink, TextFormatter, ThresholdRegistry};
/// use logging::levels::PASS_ALL;
/// use std::sync::Arc;
///
/// let registry = Arc::new(ThresholdRegistry::new());
/// registry.set_root_threshold(PASS_ALL);
/// let sink = Arc::new(MemorySink::new());
/// let mut root = Log::with_registry("", registry);
/// root.add_destination(Arc::new(LogDestination::new(Arc::clone(&sink), TextFormatter::brief(), PASS_ALL)));
///
/// // This type compiles in depths 1 and 2 regardless of the build setting.
/// let trace: DebugLog<2> = DebugLog::new(&root, "solver");
/// trace.debug::<2>(|| "kept".to_owned());
/// trace.debug::<3>(|| unreachable!("compiled out"));
///
/// assert_eq!(sink.lines(), ["  solver: kept"]);
/// ```
#[derive(Clone, Debug)]
pub struct DebugLog<const MAX: Level = MAX_DEBUG_DEPTH> {
    log: Log,
}

impl<const MAX: Level> DebugLog<MAX> {
    /// Deepest depth this facade compiles in.
    pub const MAX_DEPTH: Level = MAX;

    /// Creates a facade over the child `name` of `parent`.
    #[must_use]
    pub fn new(parent: &Log, name: &str) -> Self {
        Self {
            log: parent.child(name),
        }
    }

    /// Wraps an existing Log.
    #[must_use]
    pub const fn from_log(log: Log) -> Self {
        Self { log }
    }

    /// Returns the underlying Log.
    #[must_use]
    pub const fn log(&self) -> &Log {
        &self.log
    }

    /// Returns a facade over the child `name` with the same ceiling.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        Self::new(&self.log, name)
    }

    /// Reports whether depth `DEPTH` is compiled in and passes the runtime
    /// threshold.
    #[must_use]
    pub fn enabled<const DEPTH: Level>(&self) -> bool {
        let () = const { assert!(DEPTH > 0, "debug depth must be positive") };
        let compiled_in = const { DEPTH <= MAX };
        compiled_in && self.log.sends(-DEPTH)
    }

    /// Sends the message produced by `message` at level `-DEPTH`.
    pub fn debug<const DEPTH: Level>(&self, message: impl FnOnce() -> String) {
        let () = const { assert!(DEPTH > 0, "debug depth must be positive") };
        let compiled_in = const { DEPTH <= MAX };
        if compiled_in && self.log.sends(-DEPTH) {
            self.log.log(-DEPTH, message());
        }
    }

    /// Builds and sends a record with properties at level `-DEPTH`.
    pub fn debug_record<const DEPTH: Level>(
        &self,
        build: impl FnOnce(RecordBuilder<'_>) -> RecordBuilder<'_>,
    ) {
        let () = const { assert!(DEPTH > 0, "debug depth must be positive") };
        let compiled_in = const { DEPTH <= MAX };
        if compiled_in {
            let builder = self.log.record(-DEPTH);
            if builder.is_active() {
                build(builder).send();
            }
        }
    }
}

impl<const MAX: Level> From<Log> for DebugLog<MAX> {
    fn from(log: Log) -> Self {
        Self::from_log(log)
    }
}

/// Debug facade filtered only by the runtime threshold.
///
/// Depths below 1 are treated as 1.
#[derive(Clone, Debug)]
pub struct RuntimeDebugLog {
    log: Log,
}

impl RuntimeDebugLog {
    /// Creates a facade over the child `name` of `parent`.
    #[must_use]
    pub fn new(parent: &Log, name: &str) -> Self {
        Self {
            log: parent.child(name),
        }
    }

    /// Wraps an existing Log.
    #[must_use]
    pub const fn from_log(log: Log) -> Self {
        Self { log }
    }

    /// Returns the underlying Log.
    #[must_use]
    pub const fn log(&self) -> &Log {
        &self.log
    }

    /// Reports whether a message at `depth` would be sent.
    #[must_use]
    pub fn enabled(&self, depth: Level) -> bool {
        self.log.sends(level_for(depth))
    }

    /// Sends the message produced by `message` at level `-depth`.
    pub fn debug(&self, depth: Level, message: impl FnOnce() -> String) {
        let level = level_for(depth);
        if self.log.sends(level) {
            self.log.log(level, message());
        }
    }

    /// Builds and sends a record with properties at level `-depth`.
    pub fn debug_record(
        &self,
        depth: Level,
        build: impl FnOnce(RecordBuilder<'_>) -> RecordBuilder<'_>,
    ) {
        let builder = self.log.record(level_for(depth));
        if builder.is_active() {
            build(builder).send();
        }
    }
}

impl From<Log> for RuntimeDebugLog {
    fn from(log: Log) -> Self {
        Self::from_log(log)
    }
}

const fn level_for(depth: Level) -> Level {
    if depth < 1 { -1 } else { -depth }
}
