//! # Literal Encoding
//!
//! Every user-supplied value that reaches a statement parameter or a
//! sub-document write goes through this module. The store only ever sees
//! [`EncodedValue`]s, so raw input cannot be spliced into a statement.

use std::fmt;

use serde::Serialize;
use serde_json::{Number, Value};

/// A value rendered as a JSON literal, ready to be bound as a parameter.
///
/// The only constructors are [`encode_scalar`], [`encode_list`] and
/// [`encode_document`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EncodedValue(String);

impl EncodedValue {
    /// The JSON literal text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the literal back into a JSON value
    pub fn decode(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

impl fmt::Display for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A scalar accepted by the encoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Text(&'a str),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Scalar<'_> {
    fn to_json(self) -> Value {
        match self {
            Scalar::Text(s) => Value::String(s.to_owned()),
            Scalar::Int(n) => Value::Number(n.into()),
            // Non-finite floats have no JSON representation.
            Scalar::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Null => Value::Null,
        }
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(s: &'a str) -> Self {
        Scalar::Text(s)
    }
}

impl<'a> From<&'a String> for Scalar<'a> {
    fn from(s: &'a String) -> Self {
        Scalar::Text(s.as_str())
    }
}

impl From<i64> for Scalar<'_> {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<u32> for Scalar<'_> {
    fn from(n: u32) -> Self {
        Scalar::Int(i64::from(n))
    }
}

impl From<f64> for Scalar<'_> {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<bool> for Scalar<'_> {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl<'a> From<Option<&'a str>> for Scalar<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map(Scalar::Text).unwrap_or(Scalar::Null)
    }
}

/// Encode one scalar as a JSON literal.
///
/// Strings come out quoted with embedded quotes, backslashes and control
/// characters escaped.
pub fn encode_scalar<'a>(value: impl Into<Scalar<'a>>) -> EncodedValue {
    EncodedValue(value.into().to_json().to_string())
}

/// Encode a sequence of scalars as a JSON array literal, preserving order.
pub fn encode_list<'a, I>(values: I) -> EncodedValue
where
    I: IntoIterator,
    I::Item: Into<Scalar<'a>>,
{
    let items: Vec<Value> = values.into_iter().map(|v| v.into().to_json()).collect();
    EncodedValue(Value::Array(items).to_string())
}

/// Encode an already-structured JSON value.
pub fn encode_document(value: &Value) -> EncodedValue {
    EncodedValue(value.to_string())
}
