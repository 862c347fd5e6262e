//! Filter definitions
//!
//! A filter is a `(propertyName, condition, propertyValue)` triple as stored in a
//! segment or trigger definition. The condition set is closed; any text outside
//! it is kept as [`Condition::Unknown`] so that definitions written for newer
//! rule sets still load.

use crate::coerce::format_number;
use crate::types::{FilterError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Comparison applied to a single event property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    Is,
    IsNot,
    Contains,
    DoesNotContain,
    StartsWith,
    DoesNotStartWith,
    EndsWith,
    DoesNotEndWith,
    IsMoreThan,
    IsLessThan,
    IsEmpty,
    IsNotEmpty,
    /// Any condition text outside the supported set; always satisfied
    Unknown(String),
}

impl Condition {
    /// Every supported condition, in definition order
    pub const SUPPORTED: [Condition; 12] = [
        Condition::Is,
        Condition::IsNot,
        Condition::Contains,
        Condition::DoesNotContain,
        Condition::StartsWith,
        Condition::DoesNotStartWith,
        Condition::EndsWith,
        Condition::DoesNotEndWith,
        Condition::IsMoreThan,
        Condition::IsLessThan,
        Condition::IsEmpty,
        Condition::IsNotEmpty,
    ];

    /// Parse condition text; matching is exact, including case and spacing
    pub fn parse(text: &str) -> Self {
        match text {
            "is" => Condition::Is,
            "is not" => Condition::IsNot,
            "contains" => Condition::Contains,
            "does not contain" => Condition::DoesNotContain,
            "starts with" => Condition::StartsWith,
            "does not start with" => Condition::DoesNotStartWith,
            "ends with" => Condition::EndsWith,
            "does not end with" => Condition::DoesNotEndWith,
            "is more than" => Condition::IsMoreThan,
            "is less than" => Condition::IsLessThan,
            "is empty" => Condition::IsEmpty,
            "is not empty" => Condition::IsNotEmpty,
            other => Condition::Unknown(other.to_owned()),
        }
    }

    /// Canonical condition text
    pub fn as_str(&self) -> &str {
        match self {
            Condition::Is => "is",
            Condition::IsNot => "is not",
            Condition::Contains => "contains",
            Condition::DoesNotContain => "does not contain",
            Condition::StartsWith => "starts with",
            Condition::DoesNotStartWith => "does not start with",
            Condition::EndsWith => "ends with",
            Condition::DoesNotEndWith => "does not end with",
            Condition::IsMoreThan => "is more than",
            Condition::IsLessThan => "is less than",
            Condition::IsEmpty => "is empty",
            Condition::IsNotEmpty => "is not empty",
            Condition::Unknown(text) => text,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Condition::Unknown(_))
    }
}

impl FromStr for Condition {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Condition::parse(s))
    }
}

impl From<&str> for Condition {
    fn from(text: &str) -> Self {
        Condition::parse(text)
    }
}

impl From<String> for Condition {
    fn from(text: String) -> Self {
        match Condition::parse(&text) {
            Condition::Unknown(_) => Condition::Unknown(text),
            known => known,
        }
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Unknown(text) => text,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single property rule
///
/// Serialized with the field names used by stored segment definitions
/// (`propertyName`, `condition`, `propertyValue`); snake_case names are accepted
/// as aliases for hand-written config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Property to test; may be a dotted path into nested values
    #[serde(alias = "property_name")]
    pub property_name: String,

    pub condition: Condition,

    /// Comparison operand, always held as text
    #[serde(
        default,
        alias = "property_value",
        deserialize_with = "deserialize_property_value"
    )]
    pub property_value: String,
}

impl Filter {
    /// Create a new filter
    pub fn new(
        property_name: impl Into<String>,
        condition: impl Into<Condition>,
        property_value: impl Into<String>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            condition: condition.into(),
            property_value: property_value.into(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.property_name, self.condition, self.property_value)
    }
}

/// Parse a JSON array of filters
pub fn parse_filters(json: &str) -> Result<Vec<Filter>> {
    serde_json::from_str(json).map_err(FilterError::InvalidFilters)
}

/// Scalar operands written without quotes in JSON or TOML
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPropertyValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

fn deserialize_property_value<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawPropertyValue::deserialize(deserializer)? {
        RawPropertyValue::Text(text) => text,
        RawPropertyValue::Integer(n) => n.to_string(),
        RawPropertyValue::Float(n) => format_number(n),
        RawPropertyValue::Flag(b) => b.to_string(),
    })
}
