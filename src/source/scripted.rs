//! An in-memory `SourceConnector` for tests.
//!
//! Responses are matched by substring against the query text, in registration
//! order. A response can optionally be filtered down to the rows whose key
//! column is among the query's bound parameters, which mimics the selector's
//! `IN (...)` predicate.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ConnectionDescriptor, SourceConnector, SourceError};
use crate::chunk_pipeline::query::BoundQuery;
use crate::types::{RawValue, ResultSet};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub sql: String,
    pub params: Vec<String>,
    pub had_database_file: bool,
}

struct Response {
    needle: String,
    result: ResultSet,
    filter_column: Option<String>,
}

#[derive(Default)]
pub(crate) struct ScriptedConnector {
    responses: Vec<Response>,
    failures: Mutex<VecDeque<SourceError>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers any query containing `needle` with `result`, unfiltered.
    pub fn on(mut self, needle: &str, result: ResultSet) -> Self {
        self.responses.push(Response {
            needle: needle.to_string(),
            result,
            filter_column: None,
        });
        self
    }

    /// Answers any query containing `needle` with the rows of `result` whose
    /// `column` value is one of the query's bound parameters.
    pub fn on_filtered(mut self, needle: &str, column: &str, result: ResultSet) -> Self {
        self.responses.push(Response {
            needle: needle.to_string(),
            result,
            filter_column: Some(column.to_string()),
        });
        self
    }

    /// Queues failures returned, in order, before any response is served.
    pub fn failing_with(self, failures: Vec<SourceError>) -> Self {
        if let Ok(mut queue) = self.failures.lock() {
            queue.extend(failures);
        }
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

fn cell_text(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Text(s) | RawValue::Decimal(s) => Some(s.clone()),
        RawValue::Int(i) => Some(i.to_string()),
        _ => None,
    }
}

impl SourceConnector for ScriptedConnector {
    fn execute(
        &self,
        descriptor: &ConnectionDescriptor,
        query: &BoundQuery,
    ) -> Result<ResultSet, SourceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                sql: query.sql.clone(),
                params: query.params.clone(),
                had_database_file: descriptor.dbf.is_some(),
            });
        }

        if let Some(failure) = self.failures.lock().ok().and_then(|mut q| q.pop_front()) {
            return Err(failure);
        }

        let response = self
            .responses
            .iter()
            .find(|r| query.sql.contains(&r.needle))
            .ok_or_else(|| SourceError::Query(format!("no scripted response for: {}", query.sql)))?;

        let Some(column) = &response.filter_column else {
            return Ok(response.result.clone());
        };
        let idx = response
            .result
            .column_index(column)
            .ok_or_else(|| SourceError::Query(format!("Column '{}' not found", column)))?;
        let rows = response
            .result
            .rows
            .iter()
            .filter(|row| {
                row.get(idx)
                    .and_then(cell_text)
                    .is_some_and(|key| query.params.contains(&key))
            })
            .cloned()
            .collect();
        Ok(ResultSet::new(response.result.columns.clone(), rows))
    }
}
