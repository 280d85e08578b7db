//! crates/logging/src/config.rs
//! Threshold configuration built from `-v` counts, directive strings or the
//! environment, and applied to a [`ThresholdRegistry`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::levels::{INFO, Level, level_name, parse_level};
use crate::registry::ThresholdRegistry;

/// Environment variable read by [`ThresholdConfig::from_env`].
pub const THRESHOLDS_ENV: &str = "LOG_THRESHOLDS";

/// One `topic=level` assignment. An empty topic names the root.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdDirective {
    /// Full topic name.
    pub topic: String,
    /// Threshold to install.
    pub level: Level,
}

impl fmt::Display for ThresholdDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.topic, self.level)
    }
}

/// Errors raised while parsing threshold directives.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum DirectiveError {
    /// The level part was neither an integer nor a known level name.
    #[error("invalid level {level:?} in threshold directive {directive:?}")]
    InvalidLevel {
        /// The offending directive.
        directive: String,
        /// The unparsable level text.
        level: String,
    },
    /// The topic part contained an empty segment or whitespace.
    #[error("invalid topic name {0:?}")]
    InvalidTopic(String),
}

/// Ordered list of threshold directives.
///
/// Later directives override earlier ones for the same topic when applied.
///
/// # Examples
///
/// ```
/// use logging::{ThresholdConfig, ThresholdRegistry};
/// use logging::levels::{DEBUG, INFO, WARN};
///
/// let config: ThresholdConfig = "app=warn,app.worker=debug,info".parse().unwrap();
/// let registry = ThresholdRegistry::new();
/// config.apply(&registry);
///
/// assert_eq!(registry.resolve_threshold("app.io"), WARN);
/// assert_eq!(registry.resolve_threshold("app.worker.pool"), DEBUG);
/// assert_eq!(registry.resolve_threshold("other"), INFO);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdConfig {
    directives: Vec<ThresholdDirective>,
}

impl ThresholdConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a `-v` count to a root threshold.
    ///
    /// Zero keeps the root at [`INFO`]; each additional `-v` lets one more
    /// level of debug detail through.
    #[must_use]
    pub fn from_verbose_level(verbose: u8) -> Self {
        let mut config = Self::new();
        config.push("", INFO - Level::from(verbose));
        config
    }

    /// Parses a comma-separated list of directives.
    ///
    /// Each token is `topic=level` or a bare `level`, which applies to the
    /// root. Blank tokens are skipped.
    pub fn parse(input: &str) -> Result<Self, DirectiveError> {
        let mut config = Self::new();
        for token in input.split(',') {
            config.apply_directive(token)?;
        }
        Ok(config)
    }

    /// Reads directives from the [`THRESHOLDS_ENV`] environment variable.
    ///
    /// An unset or non-unicode variable yields an empty configuration.
    pub fn from_env() -> Result<Self, DirectiveError> {
        std::env::var(THRESHOLDS_ENV).map_or_else(|_| Ok(Self::new()), |value| Self::parse(&value))
    }

    /// Appends a directive.
    pub fn push(&mut self, topic: impl Into<String>, level: Level) -> &mut Self {
        self.directives.push(ThresholdDirective {
            topic: topic.into(),
            level,
        });
        self
    }

    /// Parses and appends a single `topic=level` token.
    pub fn apply_directive(&mut self, token: &str) -> Result<(), DirectiveError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(());
        }

        let (topic, level_text) = token.split_once('=').unwrap_or(("", token));
        let topic = topic.trim();
        let level_text = level_text.trim();

        if !is_valid_topic(topic) {
            return Err(DirectiveError::InvalidTopic(topic.to_owned()));
        }
        let level = parse_level(level_text).ok_or_else(|| DirectiveError::InvalidLevel {
            directive: token.to_owned(),
            level: level_text.to_owned(),
        })?;

        self.push(topic, level);
        Ok(())
    }

    /// Returns the directives in application order.
    #[must_use]
    pub fn directives(&self) -> &[ThresholdDirective] {
        &self.directives
    }

    /// Reports whether there are no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Installs every directive into `registry`, in order.
    pub fn apply(&self, registry: &ThresholdRegistry) {
        for directive in &self.directives {
            tracing::debug!(
                target: "logging::config",
                topic = %directive.topic,
                level = directive.level,
                label = level_name(directive.level),
                "applying threshold directive"
            );
            registry.set_threshold(&directive.topic, directive.level);
        }
    }
}

impl FromStr for ThresholdConfig {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ThresholdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, directive) in self.directives.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{directive}")?;
        }
        Ok(())
    }
}

impl Extend<ThresholdDirective> for ThresholdConfig {
    fn extend<T: IntoIterator<Item = ThresholdDirective>>(&mut self, iter: T) {
        self.directives.extend(iter);
    }
}

// Root is the empty name; otherwise dot-separated non-empty segments.
fn is_valid_topic(topic: &str) -> bool {
    topic.is_empty()
        || topic
            .split('.')
            .all(|segment| !segment.is_empty() && !segment.contains(char::is_whitespace))
}
