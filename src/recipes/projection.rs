// In: src/recipes/projection.rs

//! Typed builders for the SQL fragments recipes are written in.
//!
//! A `Projection` is the select list of one CTE. It records every column it
//! emits together with the transform that column needs, so a recipe cannot
//! declare a `LIST(...)` rollup and forget to decode it.

use crate::chunk_pipeline::models::{ScalarKind, TransformKind};
use crate::types::tokens::{DELIM_TOKEN, NULL_TOKEN, WHERE_TOKEN};

const INDENT: &str = "            ";

/// The well header every recipe projects under the `w_` prefix.
const WELL_COLUMNS: &[&str] = &[
    "gx_wsn",
    "uwi",
    "well_name",
    "well_number",
    "operator",
    "lease_name",
    "lease_number",
    "county",
    "province_state",
    "row_changed_date",
];

#[derive(Debug, Clone, Default)]
pub(crate) struct Projection {
    lines: Vec<String>,
    transforms: Vec<(String, TransformKind)>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// `expr AS alias`, left to the default transform for its type.
    pub fn plain(mut self, expr: &str, alias: &str) -> Self {
        self.lines.push(format!("{} AS {}", expr, alias));
        self
    }

    /// `col AS <prefix><col>` for each column.
    pub fn plains(self, prefix: &str, columns: &[&str]) -> Self {
        columns
            .iter()
            .fold(self, |p, col| p.plain(col, &format!("{}{}", prefix, col)))
    }

    /// `expr AS alias` with an explicit transform.
    pub fn transformed(mut self, expr: &str, alias: &str, kind: TransformKind) -> Self {
        self.lines.push(format!("{} AS {}", expr, alias));
        self.transforms.push((alias.to_string(), kind));
        self
    }

    /// A `LIST(...)` rollup of `expr`, decoded element-wise as `element`.
    pub fn list(
        mut self,
        expr: &str,
        alias: &str,
        element: ScalarKind,
        order_by: Option<&str>,
    ) -> Self {
        let order = order_by
            .map(|col| format!(" ORDER BY {}", col))
            .unwrap_or_default();
        self.lines.push(format!(
            "LIST(IFNULL({expr}, '{null}', CAST({expr} AS VARCHAR)), '{delim}'{order}) AS {alias}",
            expr = expr,
            null = NULL_TOKEN,
            delim = DELIM_TOKEN,
            order = order,
            alias = alias,
        ));
        self.transforms
            .push((alias.to_string(), TransformKind::ArrayOf(element)));
        self
    }

    /// `LIST(...)` rollups of each `(column, element)`, aliased `<prefix><column>`.
    pub fn lists(self, prefix: &str, order_by: &str, columns: &[(&str, ScalarKind)]) -> Self {
        columns.iter().fold(self, |p, (col, kind)| {
            p.list(col, &format!("{}{}", prefix, col), *kind, Some(order_by))
        })
    }

    /// The select list, one column per line.
    pub fn sql(&self) -> String {
        self.lines.join(&format!(",\n{}", INDENT))
    }

    pub fn transforms(&self) -> &[(String, TransformKind)] {
        &self.transforms
    }
}

/// `w AS (...)`, the shared well header CTE.
pub(crate) fn well_cte() -> String {
    cte("w", &Projection::new().plains("w_", WELL_COLUMNS), "FROM well")
}

/// `name AS (SELECT <projection> <tail>)`.
pub(crate) fn cte(name: &str, projection: &Projection, tail: &str) -> String {
    format!(
        "{name} AS (\n        SELECT\n{indent}{cols}\n        {tail}\n    )",
        name = name,
        indent = INDENT,
        cols = projection.sql(),
        tail = tail,
    )
}

/// `SELECT DISTINCT <key_expr> AS w_uwi FROM <from> _purrWHERE_`.
pub(crate) fn identifier_sql(key_expr: &str, from: &str) -> String {
    format!(
        "SELECT DISTINCT {} AS w_uwi\n    FROM {}\n    {}",
        key_expr, from, WHERE_TOKEN
    )
}

/// `WITH <ctes> SELECT <select> FROM w <joins> _purrWHERE_`.
pub(crate) fn selector_sql(ctes: &[String], select: &str, joins: &str) -> String {
    format!(
        "WITH {}\n    SELECT {}\n    FROM w\n    {}\n    {}",
        ctes.join(",\n    "),
        select,
        joins,
        WHERE_TOKEN
    )
}

/// Every transform declared across `projections`.
pub(crate) fn collect_transforms(projections: &[&Projection]) -> Vec<(String, TransformKind)> {
    projections
        .iter()
        .flat_map(|p| p.transforms().iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_renders_sentinels_and_records_transform() {
        let p = Projection::new().list("c.top", "c_top", ScalarKind::Float, Some("obs_no"));
        assert_eq!(
            p.sql(),
            "LIST(IFNULL(c.top, '_purrNULL_', CAST(c.top AS VARCHAR)), '_purrDELIM_' ORDER BY obs_no) AS c_top"
        );
        assert_eq!(
            p.transforms(),
            &[("c_top".to_string(), TransformKind::ArrayOf(ScalarKind::Float))]
        );
    }

    #[test]
    fn test_unordered_list_has_no_order_clause() {
        let p = Projection::new().list("g.domain", "g_domain", ScalarKind::String, None);
        assert!(p.sql().ends_with("'_purrDELIM_') AS g_domain"));
    }

    #[test]
    fn test_well_cte_projects_every_header_column() {
        let sql = well_cte();
        assert!(sql.starts_with("w AS ("));
        for col in WELL_COLUMNS {
            assert!(sql.contains(&format!("{} AS w_{}", col, col)));
        }
        assert!(sql.contains("FROM well"));
    }

    #[test]
    fn test_selector_has_one_placeholder() {
        let sql = selector_sql(&[well_cte()], "w.*", "");
        assert_eq!(sql.matches(WHERE_TOKEN).count(), 1);
    }
}
