// In: src/chunk_pipeline/models.rs

//! Declarative value-transform vocabulary shared by the recipes and the
//! transformer.
//!
//! Recipes name transforms with these enums; `traits::TransformBehavior` gives
//! each variant its behaviour. The string tags (`array_of_float`, ...) are the
//! stable serialized names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::CanonicalType;

/// The element-level coercions, usable on their own or inside `ArrayOf`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Bool,
    DateTime,
}

impl ScalarKind {
    fn tag(&self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::String => "string",
            ScalarKind::Bool => "bool",
            ScalarKind::DateTime => "datetime",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "int" => Some(ScalarKind::Int),
            "float" => Some(ScalarKind::Float),
            "string" => Some(ScalarKind::String),
            "bool" => Some(ScalarKind::Bool),
            "datetime" => Some(ScalarKind::DateTime),
            _ => None,
        }
    }
}

/// Every transform a recipe can declare for a column.
///
/// The built-in recipes declare transforms directly. The string tags
/// (`from_tag`, `FromStr`, `Display`, serde) are the interchange form for
/// recipes serialized outside this crate, which is the only way `Memo` is
/// currently selected.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// The canonical value, unchanged.
    Identity,
    /// Coerce a single value; failure yields `null`.
    Scalar(ScalarKind),
    /// Strip control characters from long free text, keeping its spacing.
    Memo,
    /// Decode a `LIST(...)` aggregation and coerce each element.
    ArrayOf(ScalarKind),
    /// Decode a packed little-endian `f32` curve.
    DecodeCurveValues,
    /// Render binary as `0x`-prefixed hex.
    BlobToHex,
}

impl TransformKind {
    /// The transform applied to a column the recipe does not mention.
    pub fn default_for(canonical: CanonicalType) -> Self {
        match canonical {
            CanonicalType::Integer => TransformKind::Scalar(ScalarKind::Int),
            CanonicalType::Float => TransformKind::Scalar(ScalarKind::Float),
            CanonicalType::String => TransformKind::Scalar(ScalarKind::String),
            CanonicalType::Boolean => TransformKind::Scalar(ScalarKind::Bool),
            CanonicalType::DateTime => TransformKind::Scalar(ScalarKind::DateTime),
            CanonicalType::Binary => TransformKind::BlobToHex,
            CanonicalType::Null => TransformKind::Identity,
        }
    }

    /// Resolves a serialized tag. Unregistered tags resolve to `Identity`, so
    /// an unknown transform passes values through untouched.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(TransformKind::Identity)
    }
}

impl FromStr for TransformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        if let Some(inner) = tag.strip_prefix("array_of_") {
            return ScalarKind::from_tag(inner)
                .map(TransformKind::ArrayOf)
                .ok_or_else(|| format!("unknown array element type '{}'", inner));
        }
        match tag.as_str() {
            "identity" => Ok(TransformKind::Identity),
            "memo" | "memo_to_string" => Ok(TransformKind::Memo),
            "decode_curve_values" => Ok(TransformKind::DecodeCurveValues),
            "blob_to_hex" => Ok(TransformKind::BlobToHex),
            other => ScalarKind::from_tag(other)
                .map(TransformKind::Scalar)
                .ok_or_else(|| format!("unknown transform tag '{}'", other)),
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformKind::Identity => write!(f, "identity"),
            TransformKind::Scalar(kind) => write!(f, "{}", kind.tag()),
            TransformKind::Memo => write!(f, "memo"),
            TransformKind::ArrayOf(kind) => write!(f, "array_of_{}", kind.tag()),
            TransformKind::DecodeCurveValues => write!(f, "decode_curve_values"),
            TransformKind::BlobToHex => write!(f, "blob_to_hex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_parse() {
        assert_eq!(
            "array_of_float".parse::<TransformKind>().unwrap(),
            TransformKind::ArrayOf(ScalarKind::Float)
        );
        assert_eq!("bool".parse::<TransformKind>().unwrap(), TransformKind::Scalar(ScalarKind::Bool));
        assert_eq!("memo_to_string".parse::<TransformKind>().unwrap(), TransformKind::Memo);
        assert!("array_of_blob".parse::<TransformKind>().is_err());
    }

    #[test]
    fn test_unknown_tag_falls_back_to_identity() {
        assert_eq!(TransformKind::from_tag("decode_depth_registration"), TransformKind::Identity);
    }

    #[test]
    fn test_display_matches_parse() {
        for kind in [
            TransformKind::Identity,
            TransformKind::Scalar(ScalarKind::DateTime),
            TransformKind::ArrayOf(ScalarKind::Int),
            TransformKind::DecodeCurveValues,
            TransformKind::BlobToHex,
            TransformKind::Memo,
        ] {
            assert_eq!(kind.to_string().parse::<TransformKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_binary_defaults_to_hex() {
        assert_eq!(TransformKind::default_for(CanonicalType::Binary), TransformKind::BlobToHex);
        assert_eq!(TransformKind::default_for(CanonicalType::Null), TransformKind::Identity);
    }
}
