// In: src/chunk_pipeline/normalizer.rs

//! Folds a driver result set into canonical rows.
//!
//! Each column's canonical type is decided once: from the driver's type tag
//! when it is recognised, otherwise from the first non-missing value in the
//! column. Every cell is then coerced into that type. Anything the driver
//! reports as missing, and the blank sentinels some drivers emit for text,
//! become `CanonicalValue::Null`.

use crate::kernels::scalar;
use crate::types::{CanonicalType, CanonicalValue, NormalizedRow, RawValue, ResultSet};

/// Text some drivers hand back in place of a SQL NULL.
const TEXT_NULL_SENTINELS: &[&str] = &["<NA>"];

/// Resolves the canonical type of column `idx`.
fn column_type(result: &ResultSet, idx: usize) -> CanonicalType {
    let declared = result
        .columns
        .get(idx)
        .and_then(|c| CanonicalType::from_driver_type(&c.driver_type));
    if let Some(canonical) = declared {
        return canonical;
    }
    result
        .rows
        .iter()
        .filter_map(|row| row.get(idx))
        .find(|v| !matches!(v, RawValue::Missing))
        .map(CanonicalType::infer)
        .unwrap_or(CanonicalType::Null)
}

/// Strips trailing NULs left by fixed-width driver buffers and maps the blank
/// sentinels to `None`.
fn clean_text(s: String) -> Option<String> {
    let trimmed = s.trim_end_matches('\0');
    if TEXT_NULL_SENTINELS.contains(&trimmed) {
        return None;
    }
    if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_string())
    }
}

fn raw_text(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Missing => None,
        RawValue::Int(i) => Some(i.to_string()),
        RawValue::Float(f) => Some(f.to_string()),
        RawValue::Decimal(s) | RawValue::Text(s) => Some(s.clone()),
        RawValue::Bool(b) => Some(b.to_string()),
        RawValue::Timestamp(dt) => Some(scalar::format_datetime(dt)),
        RawValue::Bytes(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Coerces one cell into `target`. Never fails: an unreadable cell is null.
pub fn normalize_value(value: RawValue, target: CanonicalType) -> CanonicalValue {
    use CanonicalValue as C;

    let value = match value {
        RawValue::Missing => return C::Null,
        RawValue::Text(s) => match clean_text(s) {
            Some(s) => RawValue::Text(s),
            None => return C::Null,
        },
        other => other,
    };

    match (target, value) {
        (CanonicalType::Null, _) => C::Null,

        // Integers widen to i64; an integral float is still an integer.
        (CanonicalType::Integer, RawValue::Int(i)) => C::Integer(i),
        (CanonicalType::Integer, RawValue::Bool(b)) => C::Integer(i64::from(b)),
        (CanonicalType::Integer, RawValue::Float(f)) if f.fract() == 0.0 => {
            scalar::float_to_int(f).map_or(C::Null, C::Integer)
        }
        (CanonicalType::Integer, RawValue::Float(f)) => C::Float(f),
        (CanonicalType::Integer, RawValue::Decimal(s) | RawValue::Text(s)) => {
            match scalar::parse_int(&s) {
                Some(i) => C::Integer(i),
                None => scalar::parse_float(&s).map_or(C::Null, C::Float),
            }
        }

        (CanonicalType::Float, RawValue::Int(i)) => C::Float(i as f64),
        (CanonicalType::Float, RawValue::Float(f)) => C::Float(f),
        (CanonicalType::Float, RawValue::Bool(b)) => C::Float(if b { 1.0 } else { 0.0 }),
        (CanonicalType::Float, RawValue::Decimal(s) | RawValue::Text(s)) => {
            scalar::parse_float(&s).map_or(C::Null, C::Float)
        }

        (CanonicalType::Boolean, RawValue::Bool(b)) => C::Boolean(b),
        (CanonicalType::Boolean, RawValue::Int(i)) => C::Boolean(i != 0),
        (CanonicalType::Boolean, RawValue::Text(s) | RawValue::Decimal(s)) => {
            scalar::parse_bool(&s).map_or(C::Null, C::Boolean)
        }

        (CanonicalType::DateTime, RawValue::Timestamp(dt)) => {
            C::DateTime(scalar::truncate_to_seconds(dt))
        }
        (CanonicalType::DateTime, RawValue::Text(s)) => scalar::parse_datetime(&s)
            .map_or(C::Null, |dt| C::DateTime(scalar::truncate_to_seconds(dt))),

        (CanonicalType::Binary, RawValue::Bytes(bytes)) => C::Binary(bytes),
        (CanonicalType::Binary, RawValue::Text(s)) => C::Binary(s.into_bytes()),

        (CanonicalType::String, other) => raw_text(&other).map_or(C::Null, C::String),

        _ => C::Null,
    }
}

/// Normalizes every row of `result`, consuming it.
pub fn normalize(result: ResultSet) -> Vec<NormalizedRow> {
    let types: Vec<CanonicalType> = (0..result.columns.len())
        .map(|idx| column_type(&result, idx))
        .collect();
    let names: Vec<String> = result.columns.into_iter().map(|c| c.name).collect();

    result
        .rows
        .into_iter()
        .map(|row| {
            let mut cells = row.into_iter();
            let columns = names
                .iter()
                .zip(types.iter())
                .map(|(name, &target)| {
                    let raw = cells.next().unwrap_or(RawValue::Missing);
                    (name.clone(), normalize_value(raw, target))
                })
                .collect();
            NormalizedRow { columns }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnMeta;
    use chrono::NaiveDate;

    #[test]
    fn test_declared_types_drive_coercion() {
        // Arrange
        let result = ResultSet::new(
            vec![
                ColumnMeta::new("w_uwi", "varchar"),
                ColumnMeta::new("w_gx_wsn", "integer"),
                ColumnMeta::new("c_depth", "decimal"),
                ColumnMeta::new("w_row_changed_date", "timestamp"),
            ],
            vec![vec![
                RawValue::Text("05-1\0\0".into()),
                RawValue::Decimal("42".into()),
                RawValue::Decimal("1234.50".into()),
                RawValue::Text("2019-04-05 06:07:08.123".into()),
            ]],
        );

        // Act
        let rows = normalize(result);

        // Assert
        let dt = NaiveDate::from_ymd_opt(2019, 4, 5).unwrap().and_hms_opt(6, 7, 8).unwrap();
        assert_eq!(
            rows[0].columns,
            vec![
                ("w_uwi".to_string(), CanonicalValue::String("05-1".into())),
                ("w_gx_wsn".to_string(), CanonicalValue::Integer(42)),
                ("c_depth".to_string(), CanonicalValue::Float(1234.5)),
                ("w_row_changed_date".to_string(), CanonicalValue::DateTime(dt)),
            ]
        );
    }

    #[test]
    fn test_missing_and_sentinels_become_null() {
        let result = ResultSet::new(
            vec![ColumnMeta::new("a", "varchar"), ColumnMeta::new("b", "int")],
            vec![
                vec![RawValue::Text("<NA>".into()), RawValue::Missing],
                vec![RawValue::Missing, RawValue::Text("n/a".into())],
            ],
        );
        let rows = normalize(result);
        assert!(rows.iter().flat_map(|r| &r.columns).all(|(_, v)| v.is_null()));
    }

    #[test]
    fn test_unknown_driver_tag_infers_from_first_value() {
        let result = ResultSet::new(
            vec![ColumnMeta::new("x", "geometry")],
            vec![vec![RawValue::Missing], vec![RawValue::Bytes(vec![1, 2])]],
        );
        let rows = normalize(result);
        assert_eq!(rows[0].columns[0].1, CanonicalValue::Null);
        assert_eq!(rows[1].columns[0].1, CanonicalValue::Binary(vec![1, 2]));
    }

    #[test]
    fn test_short_rows_are_padded_with_null() {
        let result = ResultSet::new(
            vec![ColumnMeta::new("a", "int"), ColumnMeta::new("b", "int")],
            vec![vec![RawValue::Int(1)]],
        );
        let rows = normalize(result);
        assert_eq!(rows[0].columns[1].1, CanonicalValue::Null);
    }

    #[test]
    fn test_integer_column_keeps_fractional_values() {
        assert_eq!(normalize_value(RawValue::Float(2.0), CanonicalType::Integer), CanonicalValue::Integer(2));
        assert_eq!(normalize_value(RawValue::Float(2.5), CanonicalType::Integer), CanonicalValue::Float(2.5));
        assert_eq!(normalize_value(RawValue::Int(7), CanonicalType::String), CanonicalValue::String("7".into()));
    }
}
