//! crates/logging/src/record.rs
//! Log records: a timestamped, named bag of typed properties plus message text.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::levels::Level;

/// Property naming the topic of the Log that sent the record.
pub const LOG: &str = "LOG";

/// Property carrying the record's verbosity level.
pub const LEVEL: &str = "LEVEL";

/// Property carrying the time the record was sent.
pub const TIMESTAMP: &str = "TIMESTAMP";

/// Properties only a sending [`Log`](crate::Log) may set.
pub const STANDARD_PROPERTIES: [&str; 3] = [LOG, LEVEL, TIMESTAMP];

/// Reports whether `name` is one of the [`STANDARD_PROPERTIES`].
#[must_use]
pub fn is_standard_property(name: &str) -> bool {
    STANDARD_PROPERTIES.contains(&name)
}

/// A typed property value.
///
/// With the `serde` feature, values serialize adjacently tagged
/// (`{"type": "long", "value": 12}`) so every variant survives a round trip.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "value", rename_all = "lowercase")
)]
pub enum PropertyValue {
    /// Narrow signed integer.
    Int(i32),
    /// Wide signed integer.
    Long(i64),
    /// Single-precision float.
    Float(f32),
    /// Double-precision float.
    Double(f64),
    /// Boolean flag.
    Bool(bool),
    /// Text string.
    Text(String),
    /// Point in time.
    Timestamp(DateTime<Utc>),
}

impl PropertyValue {
    /// Converts a dynamically-typed value into a property value.
    ///
    /// Returns `None` when `value` is not one of the supported scalar types.
    /// Narrower signed and unsigned integers that fit an `i32` widen to
    /// [`PropertyValue::Int`]; `u32` widens to [`PropertyValue::Long`], as
    /// with the `From` conversions.
    #[must_use]
    pub fn from_any(value: &dyn Any) -> Option<Self> {
        if let Some(value) = value.downcast_ref::<Self>() {
            return Some(value.clone());
        }
        if let Some(v) = value.downcast_ref::<i32>() {
            return Some(Self::Int(*v));
        }
        if let Some(v) = value.downcast_ref::<i64>() {
            return Some(Self::Long(*v));
        }
        if let Some(v) = value.downcast_ref::<i16>() {
            return Some(Self::Int(i32::from(*v)));
        }
        if let Some(v) = value.downcast_ref::<i8>() {
            return Some(Self::Int(i32::from(*v)));
        }
        if let Some(v) = value.downcast_ref::<u32>() {
            return Some(Self::Long(i64::from(*v)));
        }
        if let Some(v) = value.downcast_ref::<u16>() {
            return Some(Self::Int(i32::from(*v)));
        }
        if let Some(v) = value.downcast_ref::<u8>() {
            return Some(Self::Int(i32::from(*v)));
        }
        if let Some(v) = value.downcast_ref::<f32>() {
            return Some(Self::Float(*v));
        }
        if let Some(v) = value.downcast_ref::<f64>() {
            return Some(Self::Double(*v));
        }
        if let Some(v) = value.downcast_ref::<bool>() {
            return Some(Self::Bool(*v));
        }
        if let Some(v) = value.downcast_ref::<String>() {
            return Some(Self::Text(v.clone()));
        }
        if let Some(v) = value.downcast_ref::<&'static str>() {
            return Some(Self::Text((*v).to_owned()));
        }
        if let Some(v) = value.downcast_ref::<DateTime<Utc>>() {
            return Some(Self::Timestamp(*v));
        }
        None
    }

    /// Returns the value as a wide integer when it holds an integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text when the value holds a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the type name used by verbose formatters.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Bool(_) => "bool",
            Self::Text(_) => "string",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Timestamp(v) => f.write_str(&v.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

macro_rules! property_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

property_from! {
    i32 => Int,
    i16 => Int,
    i8 => Int,
    u16 => Int,
    u8 => Int,
    i64 => Long,
    u32 => Long,
    f32 => Float,
    f64 => Double,
    bool => Bool,
    String => Text,
    &str => Text,
    DateTime<Utc> => Timestamp,
}

/// One log message and its attached properties.
///
/// Records are assembled incrementally and become immutable once a
/// [`Log`](crate::Log) hands them to its destinations. For caller-attached
/// properties the last write for a name wins. The standard properties
/// ([`LOG`], [`LEVEL`], [`TIMESTAMP`]) are reserved: [`attach`](Self::attach)
/// ignores them and only the sending Log stamps them.
///
/// # Examples
///
/// ```
/// use logging::{LogRecord, PropertyValue};
///
/// let mut record = LogRecord::new();
/// record.append("visit").append("done");
/// record.attach("visit", 1042).attach("ccd", 7);
/// record.attach("ccd", 9);
/// record.attach("LEVEL", 99);
///
/// assert_eq!(record.message(), "visit done");
/// assert_eq!(record.get("ccd"), Some(&PropertyValue::Int(9)));
/// assert_eq!(record.level(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogRecord {
    message: Vec<String>,
    properties: BTreeMap<String, PropertyValue>,
}

impl LogRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record holding a single message part.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.append(message);
        record
    }

    /// Appends a part to the message text.
    pub fn append(&mut self, part: impl Into<String>) -> &mut Self {
        self.message.push(part.into());
        self
    }

    /// Attaches a typed property, replacing any earlier value of the same name.
    ///
    /// Standard property names are ignored.
    pub fn attach(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> &mut Self {
        let name = name.into();
        if !is_standard_property(&name) {
            self.properties.insert(name, value.into());
        }
        self
    }

    /// Attaches a dynamically-typed property.
    ///
    /// Values of unsupported types are dropped without error so that logging
    /// never fails the instrumented code.
    pub fn attach_any(&mut self, name: impl Into<String>, value: &dyn Any) -> &mut Self {
        if let Some(value) = PropertyValue::from_any(value) {
            self.attach(name, value);
        }
        self
    }

    /// Merges properties without overwriting names already present.
    pub(crate) fn attach_defaults<'a, I>(&mut self, defaults: I)
    where
        I: IntoIterator<Item = (&'a String, &'a PropertyValue)>,
    {
        for (name, value) in defaults {
            if !is_standard_property(name) {
                self.properties
                    .entry(name.clone())
                    .or_insert_with(|| value.clone());
            }
        }
    }

    /// Sets the standard properties. Only the sending Log calls this.
    pub(crate) fn stamp(&mut self, topic: &str, level: Level, timestamp: DateTime<Utc>) {
        self.properties
            .insert(LOG.to_owned(), PropertyValue::Text(topic.to_owned()));
        self.properties
            .insert(LEVEL.to_owned(), PropertyValue::Int(level));
        self.properties
            .insert(TIMESTAMP.to_owned(), PropertyValue::Timestamp(timestamp));
    }

    /// Returns the message parts joined with single spaces.
    #[must_use]
    pub fn message(&self) -> String {
        self.message.join(" ")
    }

    /// Returns the individual message parts.
    #[must_use]
    pub fn message_parts(&self) -> &[String] {
        &self.message
    }

    /// Returns the property stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Reports whether a property named `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Returns the topic stamped by the sending Log.
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.get(LOG).and_then(PropertyValue::as_str)
    }

    /// Returns the level stamped by the sending Log.
    #[must_use]
    pub fn level(&self) -> Option<Level> {
        match self.get(LEVEL) {
            Some(PropertyValue::Int(level)) => Some(*level),
            _ => None,
        }
    }

    /// Returns the send time stamped by the sending Log.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self.get(TIMESTAMP) {
            Some(PropertyValue::Timestamp(at)) => Some(*at),
            _ => None,
        }
    }

    /// Iterates over every property in name order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates over the properties that are not standard ones, in name order.
    pub fn user_properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties().filter(|(name, _)| !is_standard_property(name))
    }

    /// Returns the number of properties, standard ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Reports whether the record carries no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
