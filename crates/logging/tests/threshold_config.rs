//! Integration tests for threshold directives.
//!
//! These tests cover the `-v` count mapping and the `topic=level` directive
//! syntax accepted by `ThresholdConfig`.

use std::sync::Arc;

use logging::levels::{DEBUG, FATAL, INFO, PASS_ALL, TRACE, WARN};
use logging::{DirectiveError, Log, ThresholdConfig, ThresholdRegistry};

// ============================================================================
// Verbose Count Mapping
// ============================================================================

/// Verifies each `-v` lowers the root threshold by one.
#[test]
fn verbose_counts_lower_root_threshold() {
    for verbose in 0..=5_u8 {
        let registry = ThresholdRegistry::new();
        ThresholdConfig::from_verbose_level(verbose).apply(&registry);
        assert_eq!(registry.resolve_threshold(""), INFO - i32::from(verbose));
    }
}

/// Verifies a `-v` mapping lets shallow debug records through.
#[test]
fn verbose_two_passes_depth_two() {
    let registry = Arc::new(ThresholdRegistry::new());
    ThresholdConfig::from_verbose_level(2).apply(&registry);
    let log = Log::with_registry("any.topic", registry);
    assert!(log.sends(-2));
    assert!(!log.sends(-3));
}

// ============================================================================
// Directive Parsing
// ============================================================================

/// Verifies a mixed directive list configures the hierarchy.
#[test]
fn directive_list_configures_hierarchy() {
    let registry = ThresholdRegistry::new();
    let config: ThresholdConfig = "app=warn, app.worker=debug, =fatal".parse().unwrap();
    config.apply(&registry);

    assert_eq!(registry.resolve_threshold("app"), WARN);
    assert_eq!(registry.resolve_threshold("app.worker.pool"), DEBUG);
    assert_eq!(registry.resolve_threshold("db"), FATAL);
}

/// Verifies every level name is understood regardless of case.
#[test]
fn level_names_are_case_insensitive() {
    let config = ThresholdConfig::parse("a=FATAL,b=Warn,c=info,d=DEBUG,e=Trace,f=pass_all").unwrap();
    let levels: Vec<_> = config.directives().iter().map(|d| d.level).collect();
    assert_eq!(levels, [FATAL, WARN, INFO, DEBUG, TRACE, PASS_ALL]);
}

/// Verifies malformed directives are rejected with a typed error.
#[test]
fn malformed_directives_are_rejected() {
    assert!(matches!(
        ThresholdConfig::parse("app=verbose"),
        Err(DirectiveError::InvalidLevel { .. })
    ));
    assert!(matches!(
        ThresholdConfig::parse("app.=info"),
        Err(DirectiveError::InvalidTopic(_))
    ));
}

/// Verifies nothing is applied when parsing fails partway.
#[test]
fn failed_parse_applies_nothing() {
    let registry = ThresholdRegistry::new();
    if let Ok(config) = ThresholdConfig::parse("ok=warn,bad=???") {
        config.apply(&registry);
    }
    assert!(registry.is_empty());
}
