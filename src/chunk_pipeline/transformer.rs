// In: src/chunk_pipeline/transformer.rs

//! Applies each column's declared transform to a normalized row.

use crate::chunk_pipeline::models::TransformKind;
use crate::chunk_pipeline::traits::TransformBehavior;
use crate::recipes::Recipe;
use crate::types::{CanonicalType, NormalizedRow, TransformedRow};

/// The transform for `column`: the recipe's declaration, or the default for the
/// value's canonical type.
fn resolve(recipe: &Recipe, column: &str, value_type: CanonicalType) -> TransformKind {
    recipe
        .transform_for(column)
        .unwrap_or_else(|| TransformKind::default_for(value_type))
}

pub fn transform_row(row: NormalizedRow, recipe: &Recipe) -> TransformedRow {
    let columns = row
        .columns
        .into_iter()
        .map(|(name, value)| {
            let kind = resolve(recipe, &name, value.canonical_type());
            let out = kind.apply(value);
            (name, out)
        })
        .collect();
    TransformedRow { columns }
}
