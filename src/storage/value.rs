//! Tagged scalar values held by the storage engine.

use crate::storage::numeric::{self, NumericError};
use bytes::Bytes;

/// The value half of a stored entry.
///
/// The tag decides how the value renders and whether numeric commands can
/// use it directly or must parse it first. Every tag renders back to the
/// exact text it was created from.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A canonical 64-bit integer
    Integer(i64),
    /// A float whose minimal rendering is the text it was set from
    Float(f64),
    /// Anything else, kept as raw bytes
    String(Bytes),
}

impl Value {
    /// Chooses a tag for a client-supplied value.
    ///
    /// Only text that renders back identically is tagged numeric, so
    /// `SET k 1.50` stays a string while `SET k 1.5` becomes a float.
    pub fn from_input(raw: Bytes) -> Self {
        if let Ok(n) = numeric::parse_integer(&raw) {
            return Value::Integer(n);
        }
        if numeric::is_canonical_float(&raw) {
            if let Ok(number) = numeric::parse_float(&raw) {
                return Value::Float(number.as_f64());
            }
        }
        Value::String(raw)
    }

    /// Creates a string-tagged value.
    pub fn string(data: impl Into<Bytes>) -> Self {
        Value::String(data.into())
    }

    /// Renders the value as the bytes a client sees.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Value::Integer(n) => Bytes::from(n.to_string()),
            // Float tags are only created from finite, canonical input
            Value::Float(f) => Bytes::from(numeric::format_float(*f).unwrap_or_default()),
            Value::String(b) => b.clone(),
        }
    }

    /// Reads the value as a float, parsing strings on demand.
    pub fn as_float(&self) -> Result<f64, NumericError> {
        match self {
            Value::Integer(n) => Ok(*n as f64),
            Value::Float(f) => Ok(*f),
            Value::String(b) => numeric::parse_float(b).map(|n| n.as_f64()),
        }
    }

    /// Reads the value as an integer, parsing strings on demand.
    ///
    /// Floats never convert, even whole ones.
    pub fn as_integer(&self) -> Result<i64, NumericError> {
        match self {
            Value::Integer(n) => Ok(*n),
            Value::Float(_) => Err(NumericError::NotAnInteger),
            Value::String(b) => numeric::parse_integer(b),
        }
    }
}
