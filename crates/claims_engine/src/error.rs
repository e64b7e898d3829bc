//! Engine error taxonomy
//!
//! Three kinds, so callers can tell bad input from a stale reference from a
//! persistence failure. The engine never retries internally.

use thiserror::Error;

use claims_domain::UnsupportedStatus;
use claims_store::StoreError;

/// Errors surfaced by engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested status is outside the fixed lifecycle set
    #[error(transparent)]
    InvalidStatus(#[from] UnsupportedStatus),

    /// The claim id does not exist (or vanished between lookup and write)
    #[error("Claim {0} not found")]
    NotFound(String),

    /// The persistent store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn not_found(claim_id: impl Into<String>) -> Self {
        EngineError::NotFound(claim_id.into())
    }
}
