//! crates/logging/src/registry.rs
//!
//! Process-wide store of explicitly-set verbosity thresholds.
//!
//! Entries are keyed by topic name and live independently of any [`Log`]
//! handle: setting a threshold for `"harness"` before `"harness.slice"` has
//! ever been constructed still governs that child once it appears. Resolution
//! walks the dot-delimited ancestor chain from the most specific name to the
//! root (the empty name) and stops at the first explicit entry.
//!
//! The store uses [`DashMap`] so the hot path (one lookup per ancestor on every
//! send) never contends with the rare writer.
//!
//! [`Log`]: crate::Log

use std::iter::FusedIterator;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;

use crate::levels::{DEFAULT_THRESHOLD, Level};

static GLOBAL: LazyLock<Arc<ThresholdRegistry>> =
    LazyLock::new(|| Arc::new(ThresholdRegistry::new()));

/// Name-prefix-indexed store of explicit thresholds.
///
/// # Examples
///
/// ```
/// use logging::ThresholdRegistry;
/// use logging::levels::{DEBUG, WARN};
///
/// let registry = ThresholdRegistry::new();
/// registry.set_threshold("app", WARN);
/// assert_eq!(registry.resolve_threshold("app.worker.io"), WARN);
///
/// registry.set_threshold("app.worker", DEBUG);
/// assert_eq!(registry.resolve_threshold("app.worker.io"), DEBUG);
/// assert_eq!(registry.resolve_threshold("app"), WARN);
/// ```
#[derive(Debug, Default)]
pub struct ThresholdRegistry {
    entries: DashMap<String, Level>,
}

impl ThresholdRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the registry shared by every [`Log`](crate::Log) that was not
    /// bound to a private one.
    #[must_use]
    pub fn global() -> &'static Arc<Self> {
        &GLOBAL
    }

    /// Installs or overwrites the explicit threshold for `name`.
    pub fn set_threshold(&self, name: &str, level: Level) {
        let previous = self.entries.insert(name.to_owned(), level);
        tracing::debug!(
            target: "logging::registry",
            topic = name,
            level,
            ?previous,
            "threshold set"
        );
    }

    /// Installs the threshold for the root topic (the empty name).
    pub fn set_root_threshold(&self, level: Level) {
        self.set_threshold("", level);
    }

    /// Returns the threshold explicitly stored for `name`, without consulting
    /// its ancestors.
    #[must_use]
    pub fn explicit_threshold(&self, name: &str) -> Option<Level> {
        self.entries.get(name).map(|entry| *entry.value())
    }

    /// Resolves the threshold that applies to `name`.
    ///
    /// The most specific explicit entry among `name` and its ancestors wins.
    /// When none exists, not even for the root, [`DEFAULT_THRESHOLD`] applies.
    #[must_use]
    pub fn resolve_threshold(&self, name: &str) -> Level {
        ancestors(name)
            .find_map(|prefix| self.explicit_threshold(prefix))
            .unwrap_or(DEFAULT_THRESHOLD)
    }

    /// Returns a sorted snapshot of every explicit entry.
    #[must_use]
    pub fn thresholds(&self) -> Vec<(String, Level)> {
        let mut snapshot: Vec<(String, Level)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        snapshot.sort_unstable();
        snapshot
    }

    /// Returns the number of explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no threshold has been set explicitly.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Iterates over `name` followed by each of its dot-delimited ancestors, ending
/// with the root (empty) name.
///
/// ```
/// let chain: Vec<&str> = logging::registry::ancestors("a.b.c").collect();
/// assert_eq!(chain, ["a.b.c", "a.b", "a", ""]);
/// ```
#[must_use]
pub fn ancestors(name: &str) -> Ancestors<'_> {
    Ancestors { next: Some(name) }
}

/// Iterator returned by [`ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current.is_empty() {
            None
        } else {
            Some(current.rfind('.').map_or("", |dot| &current[..dot]))
        };
        Some(current)
    }
}

impl FusedIterator for Ancestors<'_> {}
