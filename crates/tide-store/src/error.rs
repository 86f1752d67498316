//! Store error types.

use thiserror::Error;

/// Errors that can occur in the lake access layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `DuckDB` operation failed outside of query execution.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// The store rejected a query (syntax, missing object, type mismatch).
    /// Carries the offending query so the failure can be diagnosed without
    /// re-running anything.
    #[error("SQL error: {message}\nQUERY:\n{query}")]
    Execution {
        /// Store-level error message.
        message: String,
        /// The query that was rejected.
        query: String,
    },

    /// The lake database file does not exist.
    #[error("Database not found at: {0}")]
    NotFound(String),
}
