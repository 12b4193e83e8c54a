// In: src/chunk_pipeline/assembler.rs

//! Folds a flat transformed row into a nested document.
//!
//! Each column goes to the sub-object of its longest declared prefix, under its
//! name with that prefix stripped. Columns with no declared prefix (join keys,
//! `max_row_changed_date`) are dropped. The primary sub-object always leads the
//! document; any other sub-object whose every field is null is an absent
//! relation and is written as `null`.

use serde_json::{Map, Value};

use crate::recipes::Recipe;
use crate::types::{Document, TransformedRow};

pub fn assemble(row: TransformedRow, recipe: &Recipe) -> Document {
    let primary = recipe.primary_table();
    let mut tables: Vec<(&'static str, Map<String, Value>)> = Vec::new();
    if let Some(table) = primary {
        tables.push((table, Map::new()));
    }

    for (column, value) in row.columns {
        let Some((prefix, table)) = recipe.table_for(&column) else {
            continue;
        };
        let field = column[prefix.len()..].to_string();
        match tables.iter_mut().find(|(name, _)| *name == table) {
            Some((_, fields)) => {
                fields.insert(field, value);
            }
            None => {
                let mut fields = Map::new();
                fields.insert(field, value);
                tables.push((table, fields));
            }
        }
    }

    tables
        .into_iter()
        .map(|(table, fields)| {
            let absent = Some(table) != primary && fields.values().all(Value::is_null);
            let value = if absent {
                Value::Null
            } else {
                Value::Object(fields)
            };
            (table.to_string(), value)
        })
        .collect()
}
