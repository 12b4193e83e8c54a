//! This module defines the core, strongly-typed data representations used
//! throughout the extraction pipeline.
//!
//! It includes the canonical `CanonicalType` enum which replaces the driver's
//! loosely-named type tags, the raw and canonical cell values, and the row
//! shapes handed from one pipeline stage to the next.

pub mod canonical_type;
pub mod row;
pub mod tokens;
pub mod value;

// Re-export the main type(s) for easier access.
pub use canonical_type::CanonicalType;
pub use row::{ColumnMeta, Document, NormalizedRow, ResultSet, TransformedRow};
pub use value::{CanonicalValue, RawValue};
