//! crates/logging/src/formatter.rs
//! Rendering strategies that turn a [`LogRecord`] into text for a sink.

use std::fmt::Write as _;

use crate::levels::{INFO, Level, WARN, level_name};
use crate::record::LogRecord;
#[cfg(feature = "serde")]
use crate::record::PropertyValue;

/// Deepest indentation applied to debug records.
pub const MAX_DEBUG_INDENT: usize = 100;

/// Pluggable rendering strategy of a [`LogDestination`](crate::LogDestination).
///
/// Implementations append to `out`, which the destination clears before each
/// call. Any `Fn(&LogRecord, &mut String)` closure is a formatter too.
pub trait LogFormatter: Send + Sync {
    /// Renders `record` into `out`.
    fn format(&self, record: &LogRecord, out: &mut String);
}

impl<F> LogFormatter for F
where
    F: Fn(&LogRecord, &mut String) + Send + Sync,
{
    fn format(&self, record: &LogRecord, out: &mut String) {
        self(record, out);
    }
}

/// Returns the indentation width for a record at `level`: `-level` spaces for
/// debug records, capped at [`MAX_DEBUG_INDENT`], and none otherwise.
#[must_use]
pub fn debug_indent(level: Level) -> usize {
    if level >= INFO {
        0
    } else {
        usize::try_from(level.unsigned_abs()).map_or(MAX_DEBUG_INDENT, |n| n.min(MAX_DEBUG_INDENT))
    }
}

/// Line-oriented text formatter.
///
/// The brief form renders `<indent><topic>: <LABEL: ><message>`, where the
/// label only appears for warnings and fatal records and debug records are
/// indented by their depth. The verbose form prefixes the send time and lists
/// every caller-supplied property on its own indented line.
///
/// # Examples
///
/// ```
/// use logging::{Log, LogDestination, MemorySink, TextFormatter, ThresholdRegistry};
/// use logging::levels::PASS_ALL;
/// use std::sync::Arc;
///
/// let registry = Arc::new(ThresholdRegistry::new());
/// registry.set_root_threshold(PASS_ALL);
/// let sink = Arc::new(MemorySink::new());
/// let mut log = Log::with_registry("harness", registry);
/// log.add_destination(Arc::new(LogDestination::new(
///     Arc::clone(&sink),
///     TextFormatter::brief(),
///     PASS_ALL,
/// )));
///
/// log.log(-3, "entering loop");
/// log.warn("disk nearly full");
/// assert_eq!(sink.lines(), ["   harness: entering loop", "harness: WARN: disk nearly full"]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    /// Creates the brief formatter.
    #[must_use]
    pub const fn brief() -> Self {
        Self { verbose: false }
    }

    /// Creates the verbose formatter.
    #[must_use]
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }

    /// Reports whether properties are rendered.
    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }
}

impl LogFormatter for TextFormatter {
    fn format(&self, record: &LogRecord, out: &mut String) {
        let level = record.level().unwrap_or(INFO);
        let indent = debug_indent(level);
        push_indent(out, indent);

        if self.verbose {
            if let Some(at) = record.timestamp() {
                let _ = write!(out, "[{}] ", at.format("%Y-%m-%dT%H:%M:%S%.3fZ"));
            }
        }
        if let Some(topic) = record.topic().filter(|topic| !topic.is_empty()) {
            out.push_str(topic);
            out.push_str(": ");
        }
        if level >= WARN {
            out.push_str(level_name(level));
            out.push_str(": ");
        }

        let mut parts = record.message_parts().iter();
        if let Some(first) = parts.next() {
            out.push_str(first);
            for part in parts {
                out.push(' ');
                out.push_str(part);
            }
        }

        if self.verbose {
            for (name, value) in record.user_properties() {
                out.push('\n');
                push_indent(out, indent + 4);
                let _ = write!(out, "{name}: {value}");
            }
        }
    }
}

fn push_indent(out: &mut String, width: usize) {
    out.extend(std::iter::repeat_n(' ', width));
}

/// Formatter that renders each record as a single-line JSON object.
///
/// Standard properties keep their names (`LOG`, `LEVEL`, `TIMESTAMP`), the
/// message text is stored under `MESSAGE` and every other property follows
/// under its own name.
#[cfg(feature = "serde")]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct JsonFormatter;

#[cfg(feature = "serde")]
impl LogFormatter for JsonFormatter {
    fn format(&self, record: &LogRecord, out: &mut String) {
        let mut object = serde_json::Map::new();
        for (name, value) in record.properties() {
            object.insert(name.to_owned(), json_value(value));
        }
        object.insert(
            "MESSAGE".to_owned(),
            serde_json::Value::String(record.message()),
        );
        out.push_str(&serde_json::Value::Object(object).to_string());
    }
}

// Renders a property as an untagged JSON scalar.
#[cfg(feature = "serde")]
fn json_value(value: &PropertyValue) -> serde_json::Value {
    use serde_json::Value;

    match value {
        PropertyValue::Int(v) => Value::from(*v),
        PropertyValue::Long(v) => Value::from(*v),
        PropertyValue::Float(v) => Value::from(f64::from(*v)),
        PropertyValue::Double(v) => Value::from(*v),
        PropertyValue::Bool(v) => Value::from(*v),
        PropertyValue::Text(v) => Value::from(v.as_str()),
        PropertyValue::Timestamp(v) => {
            Value::from(v.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
        }
    }
}
