// In: src/source/odbc.rs

//! A live `SourceConnector` backed by `odbc-api` and the SQL Anywhere driver.
//!
//! Only compiled with the `odbc` feature. Text is fetched as UTF-16 so that the
//! driver, not this crate, owns code-page conversion.

use odbc_api::{ConnectionOptions, Cursor, DataType, Environment, IntoParameter, ResultSetMetadata};

use super::{ConnectionDescriptor, SourceConnector, SourceError};
use crate::chunk_pipeline::query::BoundQuery;
use crate::types::{ColumnMeta, RawValue, ResultSet};

/// How a column's cells are fetched and what type tag is reported for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Numeric,
    Boolean,
    DateTime,
    Binary,
    Text,
}

impl ColumnKind {
    fn from_data_type(data_type: &DataType) -> Self {
        match data_type {
            DataType::Integer | DataType::SmallInt | DataType::TinyInt | DataType::BigInt => {
                ColumnKind::Integer
            }
            DataType::Float { .. }
            | DataType::Real
            | DataType::Double
            | DataType::Decimal { .. }
            | DataType::Numeric { .. } => ColumnKind::Numeric,
            DataType::Bit => ColumnKind::Boolean,
            DataType::Date | DataType::Time { .. } | DataType::Timestamp { .. } => {
                ColumnKind::DateTime
            }
            DataType::Binary { .. } | DataType::Varbinary { .. } | DataType::LongVarbinary { .. } => {
                ColumnKind::Binary
            }
            _ => ColumnKind::Text,
        }
    }

    /// The tag handed to the normalizer via `ColumnMeta::driver_type`.
    fn driver_tag(self) -> &'static str {
        match self {
            ColumnKind::Integer => "bigint",
            ColumnKind::Numeric => "decimal",
            ColumnKind::Boolean => "bit",
            ColumnKind::DateTime => "timestamp",
            ColumnKind::Binary => "long binary",
            ColumnKind::Text => "varchar",
        }
    }

    fn text_cell(self, text: String) -> RawValue {
        match self {
            ColumnKind::Integer => match text.trim().parse::<i64>() {
                Ok(i) => RawValue::Int(i),
                Err(_) => RawValue::Decimal(text),
            },
            ColumnKind::Numeric => RawValue::Decimal(text),
            ColumnKind::Boolean => RawValue::Bool(text.trim() == "1"),
            _ => RawValue::Text(text),
        }
    }
}

pub struct OdbcConnector {
    env: Environment,
}

impl OdbcConnector {
    pub fn new() -> Result<Self, SourceError> {
        let env = Environment::new().map_err(|e| SourceError::Connection(e.to_string()))?;
        Ok(Self { env })
    }
}

fn query_err(e: odbc_api::Error) -> SourceError {
    SourceError::Query(e.to_string())
}

impl SourceConnector for OdbcConnector {
    fn execute(
        &self,
        descriptor: &ConnectionDescriptor,
        query: &BoundQuery,
    ) -> Result<ResultSet, SourceError> {
        let connection = self
            .env
            .connect_with_connection_string(
                &descriptor.to_connection_string(),
                ConnectionOptions::default(),
            )
            .map_err(|e| SourceError::from_connect_message(e.to_string()))?;

        let params: Vec<_> = query
            .params
            .iter()
            .map(|p| p.as_str().into_parameter())
            .collect();

        let Some(mut cursor) = connection
            .execute(&query.sql, params.as_slice())
            .map_err(query_err)?
        else {
            return Ok(ResultSet::default());
        };

        let num_cols = u16::try_from(cursor.num_result_cols().map_err(query_err)?)
            .map_err(|_| SourceError::Query("negative column count".to_string()))?;

        let mut columns = Vec::with_capacity(num_cols as usize);
        let mut kinds = Vec::with_capacity(num_cols as usize);
        for col in 1..=num_cols {
            let name = cursor.col_name(col).map_err(query_err)?;
            let kind = ColumnKind::from_data_type(&cursor.col_data_type(col).map_err(query_err)?);
            columns.push(ColumnMeta::new(name, kind.driver_tag()));
            kinds.push(kind);
        }

        let mut rows = Vec::new();
        let mut wide: Vec<u16> = Vec::new();
        let mut binary: Vec<u8> = Vec::new();
        while let Some(mut row) = cursor.next_row().map_err(query_err)? {
            let mut cells = Vec::with_capacity(kinds.len());
            for (col, kind) in (1..=num_cols).zip(kinds.iter().copied()) {
                let cell = if kind == ColumnKind::Binary {
                    if row.get_binary(col, &mut binary).map_err(query_err)? {
                        RawValue::Bytes(binary.clone())
                    } else {
                        RawValue::Missing
                    }
                } else if row.get_wide_text(col, &mut wide).map_err(query_err)? {
                    kind.text_cell(String::from_utf16_lossy(&wide))
                } else {
                    RawValue::Missing
                };
                cells.push(cell);
            }
            rows.push(cells);
        }

        Ok(ResultSet::new(columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_types_map_to_column_kinds() {
        assert_eq!(ColumnKind::from_data_type(&DataType::Integer), ColumnKind::Integer);
        assert_eq!(ColumnKind::from_data_type(&DataType::BigInt), ColumnKind::Integer);
        assert_eq!(ColumnKind::from_data_type(&DataType::Double), ColumnKind::Numeric);
        assert_eq!(ColumnKind::from_data_type(&DataType::Real), ColumnKind::Numeric);
        assert_eq!(ColumnKind::from_data_type(&DataType::Bit), ColumnKind::Boolean);
        assert_eq!(ColumnKind::from_data_type(&DataType::Date), ColumnKind::DateTime);
        assert_eq!(ColumnKind::from_data_type(&DataType::Unknown), ColumnKind::Text);
    }

    #[test]
    fn test_driver_tags_resolve_to_canonical_types() {
        use crate::types::CanonicalType;

        assert_eq!(CanonicalType::from_driver_type(ColumnKind::Integer.driver_tag()), Some(CanonicalType::Integer));
        assert_eq!(CanonicalType::from_driver_type(ColumnKind::Numeric.driver_tag()), Some(CanonicalType::Float));
        assert_eq!(CanonicalType::from_driver_type(ColumnKind::Boolean.driver_tag()), Some(CanonicalType::Boolean));
        assert_eq!(CanonicalType::from_driver_type(ColumnKind::DateTime.driver_tag()), Some(CanonicalType::DateTime));
        assert_eq!(CanonicalType::from_driver_type(ColumnKind::Binary.driver_tag()), Some(CanonicalType::Binary));
        assert_eq!(CanonicalType::from_driver_type(ColumnKind::Text.driver_tag()), Some(CanonicalType::String));
    }

    #[test]
    fn test_text_cells_keep_their_kind() {
        assert_eq!(ColumnKind::Integer.text_cell(" 42 ".into()), RawValue::Int(42));
        assert_eq!(ColumnKind::Integer.text_cell("4.0".into()), RawValue::Decimal("4.0".into()));
        assert_eq!(ColumnKind::Numeric.text_cell("12.50".into()), RawValue::Decimal("12.50".into()));
        assert_eq!(ColumnKind::Boolean.text_cell("1".into()), RawValue::Bool(true));
        assert_eq!(ColumnKind::Boolean.text_cell("0".into()), RawValue::Bool(false));
        assert_eq!(ColumnKind::Text.text_cell("05-1".into()), RawValue::Text("05-1".into()));
    }
}
