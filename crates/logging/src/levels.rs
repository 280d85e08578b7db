//! crates/logging/src/levels.rs
//! Conventional verbosity levels and threshold sentinels.
//!
//! Levels are plain signed integers: higher means more urgent. The named
//! constants are conventions only; any integer is a valid level and any
//! negative level is a debugging message.

/// A verbosity level or threshold.
pub type Level = i32;

/// Unrecoverable conditions.
pub const FATAL: Level = 20;

/// Conditions that deserve attention but do not stop processing.
pub const WARN: Level = 10;

/// Routine progress messages.
pub const INFO: Level = 0;

/// Debugging output.
pub const DEBUG: Level = -10;

/// Very fine-grained debugging output.
pub const TRACE: Level = -20;

/// Threshold that lets every record through.
pub const PASS_ALL: Level = Level::MIN;

/// Threshold used when neither a topic nor any of its ancestors has an
/// explicit registry entry.
pub const DEFAULT_THRESHOLD: Level = INFO;

/// Reports whether `level` denotes a debugging message.
#[must_use]
pub const fn is_debug(level: Level) -> bool {
    level < INFO
}

/// Returns the conventional label for the band that `level` falls into.
///
/// # Examples
///
/// ```
/// use logging::levels::{level_name, DEBUG, FATAL, INFO, WARN};
///
/// assert_eq!(level_name(FATAL), "FATAL");
/// assert_eq!(level_name(WARN + 3), "WARN");
/// assert_eq!(level_name(INFO), "INFO");
/// assert_eq!(level_name(-3), "DEBUG");
/// assert_eq!(level_name(DEBUG - 15), "TRACE");
/// ```
#[must_use]
pub const fn level_name(level: Level) -> &'static str {
    if level >= FATAL {
        "FATAL"
    } else if level >= WARN {
        "WARN"
    } else if level >= INFO {
        "INFO"
    } else if level > TRACE {
        "DEBUG"
    } else {
        "TRACE"
    }
}

/// Parses a level given either as a conventional name or as an integer.
///
/// Names are case-insensitive: `fatal`, `warn`, `warning`, `info`, `debug`,
/// `trace` and `pass_all`. Returns `None` for anything else.
#[must_use]
pub fn parse_level(token: &str) -> Option<Level> {
    let token = token.trim();
    match token.to_ascii_lowercase().as_str() {
        "fatal" => Some(FATAL),
        "warn" | "warning" => Some(WARN),
        "info" => Some(INFO),
        "debug" => Some(DEBUG),
        "trace" => Some(TRACE),
        "pass_all" | "all" => Some(PASS_ALL),
        other => other.parse::<Level>().ok(),
    }
}
