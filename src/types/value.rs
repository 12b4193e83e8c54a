//! Driver-native and canonical cell values.

use chrono::NaiveDateTime;
use serde_json::Value;

use super::CanonicalType;
use crate::kernels::scalar::format_datetime;

/// A single cell as handed over by a `SourceConnector`, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// The driver reported no value (SQL NULL).
    Missing,
    Int(i64),
    Float(f64),
    /// Exact numerics are carried as their decimal text to avoid a lossy hop.
    Decimal(String),
    Text(String),
    Bool(bool),
    Timestamp(NaiveDateTime),
    Bytes(Vec<u8>),
}

/// A cell after normalization: one of the canonical types, or null.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    Null,
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    /// Always truncated to whole seconds.
    DateTime(NaiveDateTime),
    Binary(Vec<u8>),
}

impl CanonicalValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CanonicalValue::Null)
    }

    pub fn canonical_type(&self) -> CanonicalType {
        match self {
            CanonicalValue::Null => CanonicalType::Null,
            CanonicalValue::Integer(_) => CanonicalType::Integer,
            CanonicalValue::Float(_) => CanonicalType::Float,
            CanonicalValue::String(_) => CanonicalType::String,
            CanonicalValue::Boolean(_) => CanonicalType::Boolean,
            CanonicalValue::DateTime(_) => CanonicalType::DateTime,
            CanonicalValue::Binary(_) => CanonicalType::Binary,
        }
    }

    /// The value as JSON, without any recipe transform applied.
    ///
    /// JSON has no binary type, so binary payloads render as `0x`-prefixed hex.
    /// Non-finite floats have no JSON form either and become `null`.
    pub fn into_json(self) -> Value {
        match self {
            CanonicalValue::Null => Value::Null,
            CanonicalValue::Integer(i) => Value::from(i),
            CanonicalValue::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CanonicalValue::String(s) => Value::String(s),
            CanonicalValue::Boolean(b) => Value::Bool(b),
            CanonicalValue::DateTime(dt) => Value::String(format_datetime(&dt)),
            CanonicalValue::Binary(bytes) => {
                Value::String(crate::kernels::hex::blob_to_hex(&bytes))
            }
        }
    }
}
