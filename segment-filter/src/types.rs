//! Core types for the segment filter library
//!
//! Events are dynamically typed key-value records. Each property value is a tagged
//! union so that filter comparisons can follow the runtime kind of the property
//! instead of a schema declared up front.

use crate::coerce::{format_number, parse_number};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Result type for segment filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors raised while building events or filter lists from external input
///
/// Evaluation itself never fails; these only surface on the parsing boundary.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid event JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Event must be a JSON object, got {0}")]
    NotAnObject(ValueKind),

    #[error("Invalid filter list: {0}")]
    InvalidFilters(#[source] serde_json::Error),
}

/// Runtime kind of a property, as seen by type coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The property is absent from the event
    Undefined,
    Null,
    Boolean,
    Number,
    /// Large integer kind, distinct from floating-point numbers
    BigInt,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Lowercase type name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::BigInt => "bigint",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single property value inside an event
///
/// JSON numbers always land in `Number`; `BigInt` is only produced by callers
/// that construct values directly (e.g. from an `i128`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Array(Vec<PropertyValue>),
    Object(HashMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Runtime kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Null => ValueKind::Null,
            PropertyValue::Boolean(_) => ValueKind::Boolean,
            PropertyValue::Number(_) => ValueKind::Number,
            PropertyValue::BigInt(_) => ValueKind::BigInt,
            PropertyValue::String(_) => ValueKind::String,
            PropertyValue::Array(_) => ValueKind::Array,
            PropertyValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// True only for the empty string; empty arrays and objects are not empty strings
    pub fn is_empty_string(&self) -> bool {
        matches!(self, PropertyValue::String(s) if s.is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Step one segment into a nested value
    ///
    /// Objects are indexed by key, arrays by a decimal index. Scalars have no children.
    pub fn get(&self, segment: &str) -> Option<&PropertyValue> {
        match self {
            PropertyValue::Object(map) => map.get(segment),
            PropertyValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Numeric form of the value, used by ordering conditions
    ///
    /// Booleans become 1/0; strings, arrays and objects go through their string
    /// form and standard numeric parsing, so non-numeric text yields NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            PropertyValue::Number(n) => *n,
            PropertyValue::BigInt(n) => *n as f64,
            PropertyValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            PropertyValue::Null => 0.0,
            PropertyValue::String(s) => parse_number(s),
            PropertyValue::Array(_) | PropertyValue::Object(_) => parse_number(&self.to_string()),
        }
    }
}

/// String form of the value, used by the substring, prefix and suffix conditions
impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => f.write_str("null"),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::Number(n) => f.write_str(&format_number(*n)),
            PropertyValue::BigInt(n) => write!(f, "{}", n),
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    // null elements render as nothing inside a joined array
                    if !item.is_null() {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            PropertyValue::Object(_) => f.write_str("[object Object]"),
        }
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropertyValue::Null,
            serde_json::Value::Bool(b) => PropertyValue::Boolean(b),
            serde_json::Value::Number(n) => PropertyValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => PropertyValue::String(s),
            serde_json::Value::Array(items) => {
                PropertyValue::Array(items.into_iter().map(PropertyValue::from).collect())
            }
            serde_json::Value::Object(map) => PropertyValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, PropertyValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<PropertyValue> for serde_json::Value {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Null => serde_json::Value::Null,
            PropertyValue::Boolean(b) => serde_json::Value::Bool(b),
            // NaN and infinities have no JSON representation
            PropertyValue::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            PropertyValue::BigInt(n) => match i64::try_from(n) {
                Ok(small) => serde_json::Value::from(small),
                Err(_) => serde_json::Value::String(n.to_string()),
            },
            PropertyValue::String(s) => serde_json::Value::String(s),
            PropertyValue::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            PropertyValue::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

/// Plain integers are ordinary numbers; use `i128` for the large-integer kind
impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<i128> for PropertyValue {
    fn from(value: i128) -> Self {
        PropertyValue::BigInt(value)
    }
}

/// An event record: property names mapped to dynamically typed values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    properties: HashMap<String, PropertyValue>,
}

impl Event {
    /// Create an empty event
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set a property
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a property, returning the previous value if any
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(name.into(), value.into())
    }

    /// Top-level lookup by exact key
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Dotted-path lookup using `.` as the separator
    pub fn lookup(&self, path: &str) -> Option<&PropertyValue> {
        self.lookup_with(path, '.')
    }

    /// Path lookup through nested objects and arrays
    ///
    /// An exact top-level key wins over path traversal, so a property literally
    /// named `"a.b"` is still reachable. Missing intermediates resolve to `None`.
    pub fn lookup_with(&self, path: &str, separator: char) -> Option<&PropertyValue> {
        if let Some(value) = self.properties.get(path) {
            return Some(value);
        }

        let mut segments = path.split(separator);
        let mut current = self.properties.get(segments.next()?)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Parse an event from JSON text; the document must be an object
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Event::try_from(value)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.properties.iter()
    }
}

impl TryFrom<serde_json::Value> for Event {
    type Error = FilterError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match PropertyValue::from(value) {
            PropertyValue::Object(properties) => Ok(Event { properties }),
            other => Err(FilterError::NotAnObject(other.kind())),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Event
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Event {
            properties: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
