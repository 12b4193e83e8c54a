// In: src/chunk_pipeline/post_process.rs

//! Per-well rollup of transformed rows.
//!
//! Some selectors return several rows per well (one per test, per curve, per
//! zone interval). A recipe that names a `PostProcessKey` has those rows folded
//! into one row per `w_uwi` before assembly:
//!
//! - a column under one of the key's grouped prefixes becomes the list of that
//!   column's value on every contributing row, in arrival order;
//! - every other column keeps its first non-null value.
//!
//! Because the planner never splits a well across chunks, grouping a single
//! chunk is complete.

use std::fmt;
use std::str::FromStr;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chunk_pipeline::query::PRIMARY_KEY_COLUMN;
use crate::error::CollectError;
use crate::types::TransformedRow;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PostProcessKey {
    CoreAgg,
    DstAgg,
    IpAgg,
    ProductionAgg,
    RasterLogAgg,
    SurveyAgg,
    VectorLogAgg,
    ZoneAgg,
}

impl PostProcessKey {
    pub const ALL: [PostProcessKey; 8] = [
        PostProcessKey::CoreAgg,
        PostProcessKey::DstAgg,
        PostProcessKey::IpAgg,
        PostProcessKey::ProductionAgg,
        PostProcessKey::RasterLogAgg,
        PostProcessKey::SurveyAgg,
        PostProcessKey::VectorLogAgg,
        PostProcessKey::ZoneAgg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostProcessKey::CoreAgg => "core_agg",
            PostProcessKey::DstAgg => "dst_agg",
            PostProcessKey::IpAgg => "ip_agg",
            PostProcessKey::ProductionAgg => "production_agg",
            PostProcessKey::RasterLogAgg => "raster_log_agg",
            PostProcessKey::SurveyAgg => "survey_agg",
            PostProcessKey::VectorLogAgg => "vector_log_agg",
            PostProcessKey::ZoneAgg => "zone_agg",
        }
    }

    /// Column prefixes whose values are collected into lists.
    pub fn grouped_prefixes(&self) -> &'static [&'static str] {
        match self {
            PostProcessKey::CoreAgg => &["c_", "s_"],
            PostProcessKey::DstAgg => &["t_", "s_", "p_", "f_"],
            PostProcessKey::IpAgg => &["t_"],
            PostProcessKey::ProductionAgg => &["p_", "m_"],
            PostProcessKey::RasterLogAgg => &["v_", "r_"],
            PostProcessKey::SurveyAgg => &["s_", "d_"],
            PostProcessKey::VectorLogAgg => &["c_", "s_", "v_"],
            PostProcessKey::ZoneAgg => &["i_", "v_", "z_"],
        }
    }

    /// Grouped columns whose null entries are collected as `[]` instead of `null`.
    pub fn preserve_empty(&self) -> &'static [&'static str] {
        match self {
            PostProcessKey::DstAgg => &["p_recovery_amt"],
            _ => &[],
        }
    }

    fn is_grouped(&self, column: &str) -> bool {
        self.grouped_prefixes().iter().any(|p| column.starts_with(p))
    }
}

impl FromStr for PostProcessKey {
    type Err = CollectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PostProcessKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| CollectError::Config(format!("unknown post-process key '{}'", s)))
    }
}

impl fmt::Display for PostProcessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one output column is accumulated.
enum Slot {
    List(Vec<Value>),
    First(Value),
}

impl Slot {
    fn push(&mut self, value: Value, preserve_empty: bool) {
        match self {
            Slot::List(items) => items.push(match value {
                Value::Null if preserve_empty => Value::Array(Vec::new()),
                other => other,
            }),
            Slot::First(kept) => {
                if kept.is_null() {
                    *kept = value;
                }
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            Slot::List(items) => Value::Array(items),
            Slot::First(value) => value,
        }
    }
}

struct Group {
    key: Value,
    slots: Vec<(String, Slot)>,
}

/// Folds `rows` into one row per primary key, in first-seen key order.
///
/// Rows without a primary key column are grouped together under `null`. The
/// primary key itself is never listed.
pub fn aggregate(rows: Vec<TransformedRow>, key: PostProcessKey) -> Vec<TransformedRow> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let pk = row.get(PRIMARY_KEY_COLUMN).cloned().unwrap_or(Value::Null);
        let pk_text = pk.to_string();

        let slot_idx = match index.get(&pk_text) {
            Some(&idx) => idx,
            None => {
                index.insert(pk_text, groups.len());
                groups.push(Group {
                    key: pk,
                    slots: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[slot_idx];

        for (column, value) in row.columns {
            if column == PRIMARY_KEY_COLUMN {
                continue;
            }
            let preserve = key.preserve_empty().contains(&column.as_str());
            match group.slots.iter_mut().find(|(name, _)| *name == column) {
                Some((_, slot)) => slot.push(value, preserve),
                None => {
                    let mut slot = if key.is_grouped(&column) {
                        Slot::List(Vec::new())
                    } else {
                        Slot::First(Value::Null)
                    };
                    slot.push(value, preserve);
                    group.slots.push((column, slot));
                }
            }
        }
    }

    groups
        .into_iter()
        .map(|group| {
            let mut columns = Vec::with_capacity(group.slots.len() + 1);
            columns.push((PRIMARY_KEY_COLUMN.to_string(), group.key));
            columns.extend(group.slots.into_iter().map(|(name, slot)| (name, slot.finish())));
            TransformedRow { columns }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> TransformedRow {
        TransformedRow {
            columns: pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_rows_fold_per_well_in_arrival_order() {
        // Arrange
        let rows = vec![
            row(&[("w_uwi", json!("B")), ("w_well_name", json!("Bravo")), ("t_test_number", json!(1))]),
            row(&[("w_uwi", json!("A")), ("w_well_name", json!("Alpha")), ("t_test_number", json!(7))]),
            row(&[("w_uwi", json!("B")), ("w_well_name", json!("Bravo")), ("t_test_number", json!(2))]),
        ];

        // Act
        let out = aggregate(rows, PostProcessKey::IpAgg);

        // Assert
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get("w_uwi"), Some(&json!("B")));
        assert_eq!(out[0].get("t_test_number"), Some(&json!([1, 2])));
        assert_eq!(out[0].get("w_well_name"), Some(&json!("Bravo")));
        assert_eq!(out[1].get("t_test_number"), Some(&json!([7])));
    }

    #[test]
    fn test_preserve_empty_column_turns_null_into_empty_list() {
        let rows = vec![
            row(&[
                ("w_uwi", json!("A")),
                ("p_recovery_amt", json!([12.5])),
                ("p_recovery_desc", json!("MUD")),
            ]),
            row(&[
                ("w_uwi", json!("A")),
                ("p_recovery_amt", Value::Null),
                ("p_recovery_desc", Value::Null),
            ]),
        ];

        let out = aggregate(rows, PostProcessKey::DstAgg);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("p_recovery_amt"), Some(&json!([[12.5], []])));
        assert_eq!(out[0].get("p_recovery_desc"), Some(&json!(["MUD", null])));
    }

    #[test]
    fn test_first_keeps_first_non_null_value() {
        let rows = vec![
            row(&[("w_uwi", json!("A")), ("w_county", Value::Null), ("c_top", json!(1.0))]),
            row(&[("w_uwi", json!("A")), ("w_county", json!("WELD")), ("c_top", json!(2.0))]),
            row(&[("w_uwi", json!("A")), ("w_county", json!("ADAMS")), ("c_top", json!(3.0))]),
        ];

        let out = aggregate(rows, PostProcessKey::CoreAgg);

        assert_eq!(out[0].get("w_county"), Some(&json!("WELD")));
        assert_eq!(out[0].get("c_top"), Some(&json!([1.0, 2.0, 3.0])));
    }

    #[test]
    fn test_primary_key_leads_and_is_not_listed() {
        let rows = vec![row(&[("s_id", json!(1)), ("w_uwi", json!("A"))])];
        let out = aggregate(rows, PostProcessKey::SurveyAgg);
        assert_eq!(out[0].columns[0], ("w_uwi".to_string(), json!("A")));
        assert_eq!(out[0].get("s_id"), Some(&json!([1])));
    }

    #[test]
    fn test_keys_parse_and_display() {
        for key in PostProcessKey::ALL {
            assert_eq!(key.to_string().parse::<PostProcessKey>().unwrap(), key);
        }
        assert!("formation_agg".parse::<PostProcessKey>().is_err());
    }
}
