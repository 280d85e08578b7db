//! End-to-end scenarios through the `pipelog` facade.
//!
//! Each scenario wires a small pipeline out of Logs, destinations and sinks
//! from both workspace crates and checks what reaches each consumer.

use std::fs;
use std::sync::Arc;

use pipelog::levels::{DEBUG, INFO, PASS_ALL, WARN};
use pipelog::sinks::{BusEvent, ChannelSink, FileSink};
use pipelog::{
    BlockTimingLog, DURATION_NS, DebugLog, Log, LogDestination, MemorySink, PropertyValue,
    STATUS, STATUS_END, TextFormatter, ThresholdConfig, ThresholdRegistry,
};
use test_support::tempfile;

fn isolated(name: &str) -> Log {
    Log::with_registry(name, Arc::new(ThresholdRegistry::new()))
}

fn bus_messages(events: &crossbeam_channel::Receiver<BusEvent>) -> Vec<String> {
    events.try_iter().map(|event| event.record.message()).collect()
}

// ============================================================================
// Harness Pipeline
// ============================================================================

/// Verifies threshold inheritance and snapshot destinations across a harness.
#[test]
fn harness_slices_follow_live_thresholds_and_snapshot_destinations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("harness.log");
    let (bus, events) = ChannelSink::unbounded();

    let mut harness = isolated("harness");
    harness.add_destination(Arc::new(LogDestination::new(bus, TextFormatter::brief(), PASS_ALL)));
    harness.add_preamble_property("RUN", 7);
    harness.set_threshold(WARN);

    let early = harness.child("early");
    harness.add_destination(Arc::new(LogDestination::new(
        FileSink::create(&path).unwrap(),
        TextFormatter::brief(),
        PASS_ALL,
    )));
    let slice = harness.child("slice");

    assert_eq!(slice.threshold(), WARN);
    assert_eq!(slice.registry().explicit_threshold("harness.slice"), None);

    slice.info("quiet");
    slice.warn("slice warning");
    early.warn("early warning");

    slice.set_threshold(DEBUG);
    slice.info("slice info");
    harness.info("harness info");

    assert_eq!(
        bus_messages(&events),
        ["slice warning", "early warning", "slice info"]
    );
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "harness.slice: WARN: slice warning\nharness.slice: slice info\n"
    );
}

/// Verifies that every delivered record carries the preamble and standard properties.
#[test]
fn bus_events_carry_preamble_and_standard_properties() {
    let (bus, events) = ChannelSink::unbounded();
    let mut root = isolated("ingest");
    root.add_destination(Arc::new(LogDestination::new(bus, TextFormatter::brief(), PASS_ALL)));
    root.add_preamble_property("HOST", "node-3");

    let visits = root.child("visits");
    visits
        .record(INFO)
        .append("loaded")
        .attach("COUNT", 12)
        .attach("HOST", "override")
        .attach_any("OPAQUE", &vec![1_u8, 2])
        .send();

    let event = events.try_recv().unwrap();
    assert_eq!(event.topic, "ingest.visits");
    assert_eq!(event.level, INFO);
    assert_eq!(event.record.get("COUNT"), Some(&PropertyValue::Int(12)));
    assert_eq!(event.record.get("HOST"), Some(&PropertyValue::from("override")));
    assert!(event.record.get("OPAQUE").is_none());
    assert!(event.record.timestamp().is_some());
}

// ============================================================================
// Configuration and Facades
// ============================================================================

/// Verifies that directive strings configure a registry shared by a pipeline.
#[test]
fn directives_configure_pipeline_thresholds() {
    let registry = Arc::new(ThresholdRegistry::new());
    let config: ThresholdConfig = "warn,pipeline.loader=debug".parse().unwrap();
    config.apply(&registry);

    let sink = Arc::new(MemorySink::new());
    let mut pipeline = Log::with_registry("pipeline", Arc::clone(&registry));
    pipeline.add_destination(Arc::new(LogDestination::new(
        Arc::clone(&sink),
        TextFormatter::brief(),
        PASS_ALL,
    )));

    pipeline.info("dropped");
    pipeline.child("loader").info("kept");
    pipeline.child("loader").child("csv").debug("kept deeper");
    pipeline.child("writer").info("dropped too");

    let deeper = format!("{}pipeline.loader.csv: kept deeper", " ".repeat(10));
    assert_eq!(sink.lines(), ["pipeline.loader: kept".to_owned(), deeper]);
}

/// Verifies that a compiled-out facade depth stays silent under any threshold.
#[test]
fn compiled_out_depth_ignores_runtime_threshold() {
    let sink = Arc::new(MemorySink::new());
    let mut root = isolated("facade");
    root.add_destination(Arc::new(LogDestination::new(
        Arc::clone(&sink),
        TextFormatter::brief(),
        PASS_ALL,
    )));
    root.set_threshold(PASS_ALL);

    let shallow: DebugLog<2> = DebugLog::new(&root, "shallow");
    shallow.debug::<2>(|| "compiled in".to_owned());
    shallow.debug::<3>(|| unreachable!("depth 3 is compiled out"));

    assert_eq!(sink.lines(), ["  facade.shallow: compiled in"]);
}

/// Verifies that timing blocks report their end with a duration.
#[test]
fn timing_blocks_report_duration() {
    let (bus, events) = ChannelSink::unbounded();
    let mut root = isolated("timed");
    root.add_destination(Arc::new(LogDestination::new(bus, TextFormatter::brief(), PASS_ALL)));
    root.set_threshold(DEBUG);

    let block = BlockTimingLog::start(&root, "load");
    block.log().info("working");
    block.finish();

    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(received.len(), 3);
    let end = &received[2];
    assert_eq!(end.topic, "timed.load");
    assert_eq!(end.record.get(STATUS), Some(&PropertyValue::from(STATUS_END)));
    assert!(end.record.get(DURATION_NS).is_some());
}
