// In: src/chunk_pipeline/executor.rs

//! Runs one bound query through a `SourceConnector`.
//!
//! This is the only place that knows the retry policy. When the server reports
//! that the database is already being served under another handle, the
//! descriptor's file locator is dropped and the query is issued again, so the
//! next connect attaches to the running database by name. Every other failure
//! is terminal for the request.

use crate::chunk_pipeline::query::BoundQuery;
use crate::error::CollectError;
use crate::source::{ConnectionDescriptor, SourceConnector, SourceError};
use crate::types::ResultSet;

/// Executes `query`, retrying on handle-not-unique up to `max_attempts` total
/// attempts.
///
/// `descriptor` is the request's own copy. A dropped file locator stays
/// dropped for the rest of the request, so later chunks connect by name.
pub fn execute_with_retry(
    connector: &dyn SourceConnector,
    descriptor: &mut ConnectionDescriptor,
    query: &BoundQuery,
    max_attempts: usize,
) -> Result<ResultSet, CollectError> {
    let max_attempts = max_attempts.max(1);
    log::debug!("Executing: {}", query.render_literal());

    let mut attempt = 0;
    loop {
        attempt += 1;
        match connector.execute(descriptor, query) {
            Ok(result) => {
                log::debug!("Query returned {} row(s) on attempt {}", result.len(), attempt);
                return Ok(result);
            }
            Err(SourceError::HandleNotUnique(message)) if attempt < max_attempts => {
                let dropped = descriptor.drop_database_file();
                log::warn!(
                    "Database handle not unique (attempt {}/{}), retrying{}: {}",
                    attempt,
                    max_attempts,
                    if dropped { " without database file" } else { "" },
                    message
                );
            }
            Err(SourceError::HandleNotUnique(message)) => {
                return Err(CollectError::TransientConnection {
                    attempts: attempt,
                    message,
                });
            }
            Err(other) => return Err(other.into()),
        }
    }
}
