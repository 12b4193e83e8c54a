// In: src/error.rs

//! This module defines the single, unified error type for the entire collector.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Note that value transforms never produce errors: a malformed field is coerced
//! to `null` so that one corrupt value cannot fail a whole extraction.

use thiserror::Error;

use crate::source::SourceError;

#[derive(Error, Debug)]
pub enum CollectError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    #[error("Unknown asset type: {0}")]
    UnknownAssetType(String),

    #[error("Recipe '{asset}' is malformed: {reason}")]
    InvalidRecipe { asset: String, reason: String },

    /// The "handle not unique" condition survived every reconnect attempt.
    #[error("Connection handle not unique after {attempts} attempts: {message}")]
    TransientConnection { attempts: usize, message: String },

    /// Unreachable host, bad credentials, missing driver.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// A referenced table or column is absent, or the statement was rejected.
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Invalid transition for task '{task_id}': {from} -> {to}")]
    InvalidTransition {
        task_id: String,
        from: String,
        to: String,
    },

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g. unwritable depot).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while writing a document
    /// or reading a config file.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    // =========================================================================
    // === Pipeline Errors
    // =========================================================================
    #[error("Pipeline execution failed at stage '{stage}': {source}")]
    PipelineError {
        stage: String,
        #[source]
        source: Box<CollectError>,
    },
}

impl CollectError {
    /// Wraps `self` with the name of the orchestration stage that produced it.
    pub fn at_stage(self, stage: &str) -> Self {
        CollectError::PipelineError {
            stage: stage.to_string(),
            source: Box::new(self),
        }
    }
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

// Only reached once the executor has given up on retrying.
impl From<SourceError> for CollectError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::HandleNotUnique(message) => CollectError::TransientConnection {
                attempts: 1,
                message,
            },
            SourceError::Connection(message) => CollectError::Connection(message),
            SourceError::Query(message) => CollectError::Query(message),
        }
    }
}
