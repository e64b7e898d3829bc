//! Claims domain errors

use thiserror::Error;

/// Raised when a requested status value is outside the fixed lifecycle set
///
/// The message enumerates the allowed values so the caller can correct the
/// request without consulting documentation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported status '{supplied}'. Allowed values: approved, denied, flagged, pending")]
pub struct UnsupportedStatus {
    pub supplied: String,
}
