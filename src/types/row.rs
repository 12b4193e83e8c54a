//! Row shapes that flow between pipeline stages.
//!
//! Each stage consumes the previous stage's row type by value, so a chunk's
//! rows exist in exactly one representation at a time.

use serde_json::{Map, Value};

use super::value::{CanonicalValue, RawValue};

/// Name and driver-reported type tag of one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub driver_type: String,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, driver_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver_type: driver_type.into(),
        }
    }
}

/// A fully materialized result of one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Vec<RawValue>>,
}

impl ResultSet {
    pub fn new(columns: Vec<ColumnMeta>, rows: Vec<Vec<RawValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column called `name`, ignoring ASCII case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// A row whose values have been folded into the canonical type set.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub columns: Vec<(String, CanonicalValue)>,
}

/// A row whose every column has passed through its declared transform.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformedRow {
    pub columns: Vec<(String, Value)>,
}

impl TransformedRow {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }
}

/// A nested output document: logical table name -> sub-object (or null).
pub type Document = Map<String, Value>;
