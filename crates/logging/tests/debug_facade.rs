//! Integration tests for the depth-tiered debug facade.
//!
//! The build-time ceiling defaults to zero, so these tests either pin the
//! ceiling per type with `DebugLog<N>` or assert relative to
//! `MAX_DEBUG_DEPTH`.

use std::cell::Cell;
use std::sync::Arc;

use logging::debug::MAX_DEBUG_DEPTH;
use logging::levels::PASS_ALL;
use logging::{
    DebugLog, Log, LogDestination, MemorySink, RuntimeDebugLog, TextFormatter, ThresholdRegistry,
    debug_at, debug_runtime,
};

fn capture(name: &str) -> (Log, Arc<MemorySink>) {
    let registry = Arc::new(ThresholdRegistry::new());
    let sink = Arc::new(MemorySink::new());
    let mut log = Log::with_registry(name, registry);
    log.add_destination(Arc::new(LogDestination::new(
        Arc::clone(&sink),
        TextFormatter::brief(),
        PASS_ALL,
    )));
    (log, sink)
}

// ============================================================================
// Build-Time Tier
// ============================================================================

/// Verifies a call beyond the ceiling produces nothing even with a pass-all
/// runtime threshold.
#[test]
fn call_beyond_ceiling_is_gone_regardless_of_runtime() {
    let (log, sink) = capture("ct");
    log.set_threshold(PASS_ALL);
    let facade: DebugLog<2> = DebugLog::from_log(log);
    let evaluated = Cell::new(false);

    facade.debug::<3>(|| {
        evaluated.set(true);
        "never".to_owned()
    });

    assert!(!evaluated.get());
    assert!(sink.is_empty());
}

/// Verifies a compiled-in call is still subject to the runtime threshold.
#[test]
fn compiled_in_call_obeys_runtime_threshold() {
    let (log, sink) = capture("rt");
    let facade: DebugLog<3> = DebugLog::from_log(log);

    facade.debug::<1>(|| "blocked at INFO".to_owned());
    assert!(sink.is_empty());

    facade.log().set_threshold(-1);
    facade.debug::<1>(|| "depth one".to_owned());
    facade.debug::<2>(|| "depth two".to_owned());

    assert_eq!(sink.lines(), [" rt: depth one"]);
}

/// Verifies the macro form compiles calls in or out according to the build
/// ceiling.
#[test]
fn macro_follows_build_ceiling() {
    let (log, sink) = capture("macro");
    log.set_threshold(PASS_ALL);
    let evaluations = Cell::new(0);
    let bump = || {
        evaluations.set(evaluations.get() + 1);
        evaluations.get()
    };

    debug_at!(log, 1, "first {}", bump());
    debug_at!(log, 3, "third {}", bump());

    let expected = usize::from(MAX_DEBUG_DEPTH >= 1) + usize::from(MAX_DEBUG_DEPTH >= 3);
    assert_eq!(sink.len(), expected);
    assert_eq!(usize::try_from(evaluations.get()).unwrap(), expected);
}

/// Verifies the default type parameter is the build ceiling.
#[test]
fn default_ceiling_is_build_ceiling() {
    assert_eq!(DebugLog::<MAX_DEBUG_DEPTH>::MAX_DEPTH, MAX_DEBUG_DEPTH);
    let (log, _) = capture("default");
    let facade: DebugLog = DebugLog::from_log(log);
    assert_eq!(facade.log().name(), "default");
}

// ============================================================================
// Runtime-Only Tier
// ============================================================================

/// Verifies the runtime facade ignores the build ceiling.
#[test]
fn runtime_facade_is_not_compiled_out() {
    let (log, sink) = capture("runtime");
    log.set_threshold(-100);
    let facade = RuntimeDebugLog::from_log(log.clone());

    let depth = 100;
    facade.debug(depth, || format!("depth {depth}"));
    debug_runtime!(log, depth, "macro depth {}", depth);
    debug_runtime!(log, depth + 1, "too deep");

    assert_eq!(sink.len(), 2);
    assert!(sink.records().iter().all(|record| record.level() == Some(-100)));
}
