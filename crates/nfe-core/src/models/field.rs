//! Leaf values carried from the extraction output into the record.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::invoice::rules::amounts::parse_brl_amount;

/// A value exactly as the extraction layer supplied it.
///
/// Record leaves are `Option<FieldValue>`: `None` means the key was absent
/// (or `null`), which is never conflated with an empty string or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A JSON string.
    Text(String),
    /// A JSON number, kept in its original representation.
    Number(Number),
    /// A JSON boolean.
    Bool(bool),
    /// An array or object found where a scalar was expected.
    Structured(Value),
}

impl FieldValue {
    /// Convert a JSON value, treating `null` as absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Number(n) => Some(FieldValue::Number(n.clone())),
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            other => Some(FieldValue::Structured(other.clone())),
        }
    }

    /// Borrow the text, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the number as `f64`, if this is a numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Interpret the value as a monetary amount.
    ///
    /// Numbers convert exactly; text is read as a Brazilian-formatted amount
    /// ("1.234,56") or a plain decimal ("1234.56").
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(n) => {
                let repr = n.to_string();
                Decimal::from_str(&repr)
                    .or_else(|_| Decimal::from_scientific(&repr))
                    .ok()
            }
            FieldValue::Text(s) => parse_brl_amount(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Structured(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

/// Name of a JSON value's kind, for diagnostics.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
