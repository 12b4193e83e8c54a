// In: src/source/mod.rs

//! The boundary between the pipeline and the relational source store.
//!
//! The pipeline never talks to a driver directly. It hands a
//! `ConnectionDescriptor` and a `BoundQuery` to a `SourceConnector` and gets
//! back a fully materialized `ResultSet`. The live ODBC implementation sits
//! behind the `odbc` cargo feature; tests use an in-memory connector.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunk_pipeline::query::BoundQuery;
use crate::types::ResultSet;

#[cfg(feature = "odbc")]
pub mod odbc;

#[cfg(test)]
pub(crate) mod scripted;

/// Driver name registered by the SQL Anywhere client install.
pub const SQLANY_DRIVER: &str = "SQL Anywhere 17";

/// Substring of the server diagnostic raised when a database file is already
/// being served under another name.
pub const HANDLE_NOT_UNIQUE_MARKER: &str = "Database name not unique";

//==================================================================================
// 1. Connector Errors
//==================================================================================

/// The failure classes a connector must distinguish. Retry policy lives in the
/// executor, not in connectors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("database handle not unique: {0}")]
    HandleNotUnique(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),
}

impl SourceError {
    /// Classifies a connect-time diagnostic.
    pub fn from_connect_message(message: String) -> Self {
        if message.contains(HANDLE_NOT_UNIQUE_MARKER) {
            SourceError::HandleNotUnique(message)
        } else {
            SourceError::Connection(message)
        }
    }
}

//==================================================================================
// 2. Connection Descriptor
//==================================================================================

/// Everything needed to reach one GeoGraphix project database.
///
/// Opaque to the pipeline except for `dbf`, which the executor drops when the
/// server reports that the database is already running under another handle.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub driver: String,
    pub uid: String,
    pub pwd: String,
    pub host: String,
    /// Path to the `gxdb.db` file; `None` once dropped for a retry.
    #[serde(default)]
    pub dbf: Option<String>,
    pub dbn: String,
    pub server: String,
    pub astart: String,
}

impl ConnectionDescriptor {
    /// Derives connection parameters from a project directory, e.g.
    /// `C:/ggx/projects/Stratton` served by `scarab`.
    ///
    /// The database name is `<project>-<home>`, where home is the directory that
    /// contains the project.
    pub fn for_repo(project_path: &str, host: Option<&str>) -> Self {
        let host = host.filter(|h| !h.is_empty()).unwrap_or("localhost");
        let fs_path = project_path.replace('\\', "/");
        let fs_path = fs_path.trim_end_matches('/');

        let mut segments = fs_path.rsplit('/');
        let name = segments.next().unwrap_or_default();
        let home = segments.next().unwrap_or_default();

        Self {
            driver: SQLANY_DRIVER.to_string(),
            uid: "dba".to_string(),
            pwd: "sql".to_string(),
            host: host.to_string(),
            dbf: Some(format!("{}/gxdb.db", fs_path)),
            dbn: format!("{}-{}", name.replace(' ', "_"), home.replace(' ', "_")),
            server: format!("GGX_{}", host.to_uppercase()),
            astart: "YES".to_string(),
        }
    }

    /// Forgets the database file so the next connect attaches to the running
    /// database by name instead of starting it again.
    pub fn drop_database_file(&mut self) -> bool {
        self.dbf.take().is_some()
    }

    /// Renders an ODBC connection string with keys in a fixed order.
    pub fn to_connection_string(&self) -> String {
        self.render(&self.pwd)
    }

    fn render(&self, pwd: &str) -> String {
        let mut s = format!(
            "DRIVER={{{}}};UID={};PWD={};HOST={};",
            self.driver, self.uid, pwd, self.host
        );
        if let Some(dbf) = &self.dbf {
            s.push_str(&format!("DBF={};", dbf));
        }
        s.push_str(&format!(
            "DBN={};SERVER={};ASTART={};",
            self.dbn, self.server, self.astart
        ));
        s
    }
}

// Credentials never reach the logs.
impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionDescriptor({})", self.render("***"))
    }
}

//==================================================================================
// 3. The Connector Contract
//==================================================================================

/// **CONTRACT:** executes one query against the store described by
/// `descriptor` and materializes every row.
///
/// Implementations open a fresh connection per call and must be shareable
/// across the worker threads that run concurrent requests.
pub trait SourceConnector: Send + Sync {
    fn execute(
        &self,
        descriptor: &ConnectionDescriptor,
        query: &BoundQuery,
    ) -> Result<ResultSet, SourceError>;
}
