//! crates/logging/src/macros.rs
//! Formatting macros that only evaluate their arguments when a record will be
//! sent.

/// Sends a formatted message at an explicit level.
///
/// The format arguments are evaluated only when the Log's threshold lets
/// `level` through. Properties may be given in braces before the format
/// string.
///
/// # Examples
///
/// ```
/// use logging::{log_at, Log, LogDestination, MemorySink, TextFormatter, ThresholdRegistry};
/// use logging::levels::{PASS_ALL, WARN};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let mut log = Log::with_registry("disk", Arc::new(ThresholdRegistry::new()));
/// log.add_destination(Arc::new(LogDestination::new(Arc::clone(&sink), TextFormatter::brief(), PASS_ALL)));
///
/// log_at!(log, WARN, "{}% used", 93);
/// log_at!(log, 0, { "device" => "sda", "free_mb" => 12 }, "low space on {}", "sda");
///
/// let records = sink.records();
/// assert_eq!(records[0].message(), "93% used");
/// assert_eq!(records[1].get("free_mb").and_then(|v| v.as_i64()), Some(12));
/// ```
#[macro_export]
macro_rules! log_at {
    ($log:expr, $level:expr, { $($name:expr => $value:expr),+ $(,)? }, $($arg:tt)+) => {{
        let __log: &$crate::Log = &$log;
        let __level: $crate::levels::Level = $level;
        if __log.sends(__level) {
            __log.send(
                __level,
                ::std::format!($($arg)+),
                [$((
                    ::std::string::String::from($name),
                    $crate::PropertyValue::from($value),
                )),+],
            );
        }
    }};
    ($log:expr, $level:expr, $($arg:tt)+) => {{
        let __log: &$crate::Log = &$log;
        let __level: $crate::levels::Level = $level;
        if __log.sends(__level) {
            __log.log(__level, ::std::format!($($arg)+));
        }
    }};
}

/// Sends a formatted message at [`FATAL`](crate::levels::FATAL).
#[macro_export]
macro_rules! log_fatal {
    ($log:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $crate::levels::FATAL, $($arg)+)
    };
}

/// Sends a formatted message at [`WARN`](crate::levels::WARN).
#[macro_export]
macro_rules! log_warn {
    ($log:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $crate::levels::WARN, $($arg)+)
    };
}

/// Sends a formatted message at [`INFO`](crate::levels::INFO).
#[macro_export]
macro_rules! log_info {
    ($log:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $crate::levels::INFO, $($arg)+)
    };
}

/// Sends a formatted message at [`DEBUG`](crate::levels::DEBUG).
#[macro_export]
macro_rules! log_debug {
    ($log:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $crate::levels::DEBUG, $($arg)+)
    };
}

/// Sends a debug message at `-depth`, compiled out entirely when `depth`
/// exceeds [`MAX_DEBUG_DEPTH`](crate::debug::MAX_DEBUG_DEPTH).
///
/// `depth` must be a positive constant expression; zero or negative depths
/// are rejected at compile time. Surviving calls are still filtered by the
/// Log's runtime threshold. Property braces work as in [`log_at!`].
///
/// ```
/// use logging::{debug_at, Log, LogDestination, MemorySink, TextFormatter, ThresholdRegistry};
/// use logging::debug::MAX_DEBUG_DEPTH;
/// use logging::levels::PASS_ALL;
/// use std::sync::Arc;
///
/// let registry = Arc::new(ThresholdRegistry::new());
/// registry.set_root_threshold(PASS_ALL);
/// let sink = Arc::new(MemorySink::new());
/// let mut log = Log::with_registry("solver", registry);
/// log.add_destination(Arc::new(LogDestination::new(Arc::clone(&sink), TextFormatter::brief(), PASS_ALL)));
///
/// debug_at!(log, 1, "iteration {}", 7);
/// assert_eq!(sink.len(), usize::from(MAX_DEBUG_DEPTH >= 1));
/// ```
///
/// ```compile_fail
/// let log = logging::Log::new("x");
/// logging::debug_at!(log, 0, "depth zero is not a debug depth");
/// ```
#[macro_export]
macro_rules! debug_at {
    ($log:expr, $depth:expr, $($arg:tt)+) => {{
        const _: () = ::std::assert!(($depth) > 0, "debug depth must be positive");
        let __compiled_in: bool = const { ($depth) <= $crate::debug::MAX_DEBUG_DEPTH };
        if __compiled_in {
            $crate::log_at!($log, -($depth), $($arg)+);
        }
    }};
}

/// Sends a debug message at `-depth` using only the runtime threshold.
///
/// `depth` may be any expression; values below 1 are treated as 1.
#[macro_export]
macro_rules! debug_runtime {
    ($log:expr, $depth:expr, $($arg:tt)+) => {{
        let __depth: $crate::levels::Level = $depth;
        $crate::log_at!($log, -(__depth.max(1)), $($arg)+);
    }};
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use crate::levels::{DEBUG, FATAL, INFO, PASS_ALL, WARN};
    use crate::{Log, LogDestination, MemorySink, PropertyValue, TextFormatter, ThresholdRegistry};

    fn capture(name: &str) -> (Log, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let mut log = Log::with_registry(name, Arc::new(ThresholdRegistry::new()));
        log.add_destination(Arc::new(LogDestination::new(
            Arc::clone(&sink),
            TextFormatter::brief(),
            PASS_ALL,
        )));
        (log, sink)
    }

    fn counted(counter: &Cell<u32>) -> u32 {
        counter.set(counter.get() + 1);
        counter.get()
    }

    #[test]
    fn arguments_are_not_evaluated_when_filtered() {
        let (log, sink) = capture("lazy");
        log.set_threshold(WARN);
        let evaluations = Cell::new(0);

        log_info!(log, "value {}", counted(&evaluations));
        assert_eq!(evaluations.get(), 0);

        log_warn!(log, "value {}", counted(&evaluations));
        assert_eq!(evaluations.get(), 1);
        assert_eq!(sink.lines(), ["lazy: WARN: value 1"]);
    }

    #[test]
    fn level_shorthands_use_conventional_levels() {
        let (log, sink) = capture("levels");
        log.set_threshold(PASS_ALL);
        log_fatal!(log, "f");
        log_warn!(log, "w");
        log_info!(log, "i");
        log_debug!(log, "d");
        let levels: Vec<_> = sink.records().iter().filter_map(|r| r.level()).collect();
        assert_eq!(levels, [FATAL, WARN, INFO, DEBUG]);
    }

    #[test]
    fn properties_are_attached() {
        let (log, sink) = capture("props");
        log_info!(log, { "attempt" => 3, "path" => "/tmp/x" }, "retrying {}", "now");
        let record = &sink.records()[0];
        assert_eq!(record.message(), "retrying now");
        assert_eq!(record.get("attempt"), Some(&PropertyValue::Int(3)));
        assert_eq!(record.get("path"), Some(&PropertyValue::from("/tmp/x")));
    }

    #[test]
    fn runtime_debug_clamps_depth() {
        let (log, sink) = capture("rt");
        log.set_threshold(PASS_ALL);
        let depth = 0;
        debug_runtime!(log, depth, "shallow");
        debug_runtime!(log, 4, "deep");
        let levels: Vec<_> = sink.records().iter().filter_map(|r| r.level()).collect();
        assert_eq!(levels, [-1, -4]);
    }

    #[test]
    fn runtime_debug_respects_threshold() {
        let (log, sink) = capture("rt");
        log.set_threshold(-2);
        debug_runtime!(log, 2, "kept");
        debug_runtime!(log, 3, "dropped");
        assert_eq!(sink.lines(), ["  rt: kept"]);
    }

    #[test]
    fn debug_at_beyond_build_maximum_never_evaluates() {
        let (log, sink) = capture("ct");
        log.set_threshold(PASS_ALL);
        let evaluations = Cell::new(0);
        debug_at!(log, 10_000, "{}", counted(&evaluations));
        assert_eq!(evaluations.get(), 0);
        assert!(sink.is_empty());
    }
}
