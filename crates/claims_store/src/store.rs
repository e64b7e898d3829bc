//! The claim store port
//!
//! The engine depends on this trait rather than on any concrete storage so
//! tests can substitute a fake store/cache pair.

use async_trait::async_trait;

use claims_domain::{Provider, RawClaim, StatusChanges};

use crate::error::StoreError;

/// Read-all / targeted-update access to the persistent claims store
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Loads every claim row
    async fn fetch_claims(&self) -> Result<Vec<RawClaim>, StoreError>;

    /// Loads every provider row
    async fn fetch_providers(&self) -> Result<Vec<Provider>, StoreError>;

    /// Applies a planned status change to one claim by id
    ///
    /// Returns the number of rows affected; zero means the claim vanished
    /// between lookup and write, which the engine maps to not-found.
    async fn apply_status_change(
        &self,
        claim_id: &str,
        changes: &StatusChanges,
    ) -> Result<u64, StoreError>;

    /// Replaces the processor notes on one claim by id
    ///
    /// `None` clears the stored note. Returns the number of rows affected.
    async fn update_notes(&self, claim_id: &str, note: Option<&str>) -> Result<u64, StoreError>;
}
