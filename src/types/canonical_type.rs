//! This module defines the canonical, type-safe set of column types that every
//! driver-reported type is folded into before value transformation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::RawValue;

/// The canonical, internal representation of a column type.
///
/// Drivers report their own type names (`int`, `varchar`, `long binary`, ...).
/// Those names are mapped here once, so no later stage has to know which driver
/// produced a row.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalType {
    Integer,
    Float,
    String,
    Boolean,
    DateTime,
    Binary,
    Null,
}

impl CanonicalType {
    /// Maps a driver type name to a canonical type.
    ///
    /// Returns `None` for names we do not recognise; the normalizer then infers
    /// the type from the value itself.
    pub fn from_driver_type(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        let canonical = match tag.as_str() {
            "int" | "integer" | "smallint" | "tinyint" | "bigint" | "unsigned int"
            | "unsigned smallint" | "unsigned bigint" | "int64" => Self::Integer,
            "float" | "double" | "real" | "decimal" | "numeric" | "money" | "float64" => {
                Self::Float
            }
            "str" | "string" | "char" | "varchar" | "nchar" | "nvarchar" | "text"
            | "long varchar" | "long nvarchar" | "uniqueidentifierstr" | "xml" => Self::String,
            "bool" | "boolean" | "bit" => Self::Boolean,
            "datetime" | "timestamp" | "date" | "time" | "timestamp with time zone" => {
                Self::DateTime
            }
            "bytes" | "bytearray" | "binary" | "varbinary" | "long binary" | "image" => {
                Self::Binary
            }
            "nonetype" | "null" => Self::Null,
            _ => return None,
        };
        Some(canonical)
    }

    /// Infers a canonical type from a single value, for unrecognised driver tags.
    pub fn infer(value: &RawValue) -> Self {
        match value {
            RawValue::Missing => Self::Null,
            RawValue::Int(_) => Self::Integer,
            RawValue::Float(_) | RawValue::Decimal(_) => Self::Float,
            RawValue::Text(_) => Self::String,
            RawValue::Bool(_) => Self::Boolean,
            RawValue::Timestamp(_) => Self::DateTime,
            RawValue::Bytes(_) => Self::Binary,
        }
    }
}

/// Provides the canonical string representation for a `CanonicalType`.
impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::Binary => "binary",
            Self::Null => "null",
        };
        write!(f, "{}", s)
    }
}
