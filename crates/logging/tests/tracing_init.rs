//! Integration test for installing the tracing bridge as the global subscriber.
//!
//! A global subscriber can be installed once per process, so the whole
//! sequence runs in one test.

#![cfg(feature = "tracing-bridge")]

use std::sync::Arc;

use logging::levels::PASS_ALL;
use logging::{
    BridgeError, Log, LogDestination, MemorySink, PropertyValue, TextFormatter, ThresholdRegistry,
    init_tracing, init_tracing_with_filter,
};
use tracing_subscriber::filter::LevelFilter;

// ============================================================================
// Global Installation
// ============================================================================

/// Verifies filtered installation, forwarding and the second-install error.
#[test]
fn bridge_installs_once_and_forwards_events() {
    let registry = Arc::new(ThresholdRegistry::new());
    registry.set_root_threshold(PASS_ALL);
    let sink = Arc::new(MemorySink::new());
    let mut root = Log::with_registry("", registry);
    root.add_destination(Arc::new(LogDestination::new(
        Arc::clone(&sink),
        TextFormatter::brief(),
        PASS_ALL,
    )));

    init_tracing_with_filter(root.clone(), LevelFilter::WARN).unwrap();

    tracing::info!(target: "ingest::reader", "below the filter");
    tracing::warn!(target: "ingest::reader", rows = 3, "short read");
    tracing::warn!(target: "logging_sink::file", "framework diagnostic");

    assert_eq!(sink.lines(), ["ingest.reader: WARN: short read"]);
    let record = &sink.records()[0];
    assert_eq!(record.get("rows").and_then(PropertyValue::as_i64), Some(3));

    assert!(matches!(init_tracing(root.clone()), Err(BridgeError::AlreadyInstalled(_))));
    assert!(matches!(
        init_tracing_with_filter(root, LevelFilter::TRACE),
        Err(BridgeError::AlreadyInstalled(_))
    ));
}
