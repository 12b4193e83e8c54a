// In: src/chunk_pipeline/query.rs

//! The query builder.
//!
//! Recipe SQL is stored as a `QueryTemplate` holding one placeholder token.
//! The builder produces a `Predicate` (text plus bound values) and composes the
//! two into a `BoundQuery`. Caller-supplied values are always bound with `?`
//! markers and never spliced into the query text.

use crate::chunk_pipeline::planner::Chunk;
use crate::error::CollectError;
use crate::types::tokens::WHERE_TOKEN;

/// The column every identifier and selector query exposes for the well key.
pub const PRIMARY_KEY_COLUMN: &str = "w_uwi";

//==================================================================================
// 1. Core Types
//==================================================================================

/// Recipe SQL with exactly one predicate placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate(String);

impl QueryTemplate {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    pub fn sql(&self) -> &str {
        &self.0
    }

    pub fn placeholder_count(&self) -> usize {
        self.0.matches(WHERE_TOKEN).count()
    }

    /// Splices `predicate` into the placeholder.
    pub fn compose(&self, predicate: &Predicate) -> Result<BoundQuery, CollectError> {
        let (head, tail) = self.0.split_once(WHERE_TOKEN).ok_or_else(|| {
            CollectError::InternalError("query template has no placeholder".to_string())
        })?;
        if tail.contains(WHERE_TOKEN) {
            return Err(CollectError::InternalError(
                "query template has more than one placeholder".to_string(),
            ));
        }
        Ok(BoundQuery {
            sql: format!("{}{}{}", head, predicate.text, tail),
            params: predicate.params.clone(),
        })
    }
}

/// A `WHERE` clause and the values bound to its `?` markers, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    text: String,
    params: Vec<String>,
}

impl Predicate {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// Query text ready for execution plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    pub sql: String,
    pub params: Vec<String>,
}

impl BoundQuery {
    /// The query with each `?` replaced by its quoted value. For log output
    /// only; never executed.
    pub fn render_literal(&self) -> String {
        let mut out = String::with_capacity(self.sql.len());
        let mut params = self.params.iter();
        for c in self.sql.chars() {
            match (c, c == '?') {
                (_, true) => match params.next() {
                    Some(p) => {
                        out.push('\'');
                        out.push_str(&p.replace('\'', "''"));
                        out.push('\'');
                    }
                    None => out.push('?'),
                },
                (c, false) => out.push(c),
            }
        }
        out
    }
}

//==================================================================================
// 2. Builders
//==================================================================================

/// Builds the identifier query's filter: a disjunction of `LIKE` patterns over
/// the key column, or an always-true predicate when there are none.
pub fn build_identifier_filter(patterns: &[String]) -> Predicate {
    if patterns.is_empty() {
        return Predicate {
            text: "WHERE 1=1".to_string(),
            params: Vec::new(),
        };
    }
    let clauses = vec![format!("{} LIKE ?", PRIMARY_KEY_COLUMN); patterns.len()];
    Predicate {
        text: format!("WHERE 1=1 AND ({})", clauses.join(" OR ")),
        params: patterns.to_vec(),
    }
}

/// Builds the membership predicate for one chunk.
pub fn chunk_predicate(chunk: &[String]) -> Predicate {
    let markers = vec!["?"; chunk.len()].join(",");
    Predicate {
        text: format!("WHERE 1=1 AND {} IN ({})", PRIMARY_KEY_COLUMN, markers),
        params: chunk.to_vec(),
    }
}

/// One bounded selector query per chunk, in chunk order.
pub fn build_selectors(
    chunks: &[Chunk],
    selector: &QueryTemplate,
) -> Result<Vec<BoundQuery>, CollectError> {
    chunks
        .iter()
        .map(|chunk| selector.compose(&chunk_predicate(chunk)))
        .collect()
}

/// Splits free-form caller input (e.g. `"05-123*, 05-124*"`) into `LIKE`
/// patterns: commas and whitespace separate, double quotes are dropped and `*`
/// becomes `%`.
pub fn parse_identifier_patterns(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|token| token.replace('"', "").replace('*', "%"))
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> QueryTemplate {
        QueryTemplate::new("SELECT * FROM w _purrWHERE_ ORDER BY 1")
    }

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identifier_filter_defaults_to_true() {
        let p = build_identifier_filter(&[]);
        assert_eq!(p.text(), "WHERE 1=1");
        assert!(p.params().is_empty());
    }

    #[test]
    fn test_identifier_filter_is_parenthesized_disjunction() {
        let p = build_identifier_filter(&strings(&["05%", "42-1%"]));
        assert_eq!(p.text(), "WHERE 1=1 AND (w_uwi LIKE ? OR w_uwi LIKE ?)");
        assert_eq!(p.params(), &strings(&["05%", "42-1%"])[..]);
    }

    #[test]
    fn test_selectors_bind_chunk_values() {
        let chunks = vec![strings(&["1-62", "1-82"]), strings(&["3-84"])];
        let queries = build_selectors(&chunks, &template()).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(
            queries[0].sql,
            "SELECT * FROM w WHERE 1=1 AND w_uwi IN (?,?) ORDER BY 1"
        );
        assert_eq!(queries[0].params, strings(&["1-62", "1-82"]));
        assert_eq!(queries[1].params, strings(&["3-84"]));
    }

    #[test]
    fn test_hostile_values_never_reach_query_text() {
        let chunk = strings(&["x'); DROP TABLE well; --"]);
        let q = template().compose(&chunk_predicate(&chunk)).unwrap();
        assert!(!q.sql.contains("DROP"));
        assert_eq!(
            q.render_literal(),
            "SELECT * FROM w WHERE 1=1 AND w_uwi IN ('x''); DROP TABLE well; --') ORDER BY 1"
        );
    }

    #[test]
    fn test_compose_rejects_bad_templates() {
        let none = QueryTemplate::new("SELECT 1");
        let two = QueryTemplate::new("_purrWHERE_ _purrWHERE_");
        let p = build_identifier_filter(&[]);
        assert!(none.compose(&p).is_err());
        assert!(two.compose(&p).is_err());
        assert_eq!(two.placeholder_count(), 2);
    }

    #[test]
    fn test_parse_identifier_patterns() {
        assert_eq!(
            parse_identifier_patterns("\"05-123*\", 05-124*\n 42"),
            strings(&["05-123%", "05-124%", "42"])
        );
        assert!(parse_identifier_patterns(" , ").is_empty());
    }
}
