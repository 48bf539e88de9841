//! Error types for schema reconciliation.

use std::path::PathBuf;

use tabula_ddl::{DefinitionError, ParseError};

/// Errors that can occur while reconciling a table.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The definition violates a structural invariant.
    #[error("Invalid definition: {0}")]
    Definition(#[from] DefinitionError),

    /// The SQL input could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The table does not exist.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// The database rejected a DDL statement.
    #[error("Failed to execute `{statement}`: {source}")]
    Execution {
        /// The rejected statement.
        statement: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },

    /// Database error outside statement execution (catalog queries).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading SQL files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A SQL file is not valid UTF-8.
    #[error("File is not valid UTF-8: {0}")]
    InvalidEncoding(PathBuf),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The database URL names an engine without a catalog.
    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabaseUrl(String),
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;
