//! Store error types

use thiserror::Error;

/// Errors that can occur during store operations
///
/// These are persistence failures, distinct from the validation and
/// not-found kinds raised by the engine: the engine never retries them and
/// surfaces them as a generic failure to the transport layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to establish a store connection
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Generic SQL error
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}
