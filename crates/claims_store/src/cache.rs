//! In-memory read cache
//!
//! A process-wide secondary copy of the claims and providers tables used to
//! serve fast reads. The persistent store stays authoritative: the status
//! workflow writes there first, then patches the cache, so a concurrent
//! reader sees either the old row or the fully patched row, never a partial
//! update. Concurrent patches to the same id are last-write-wins.

use std::sync::{PoisonError, RwLock};

use claims_domain::{Provider, RawClaim};

/// Shared read cache for claims and providers
#[derive(Debug, Default)]
pub struct ReadCache {
    claims: RwLock<Option<Vec<RawClaim>>>,
    providers: RwLock<Option<Vec<Provider>>>,
}

impl ReadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the cached claims, if warm
    pub fn claims(&self) -> Option<Vec<RawClaim>> {
        self.claims
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the cached claims wholesale
    pub fn store_claims(&self, rows: Vec<RawClaim>) {
        *self
            .claims
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(rows);
    }

    /// Returns a snapshot of the cached providers, if warm
    pub fn providers(&self) -> Option<Vec<Provider>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the cached providers wholesale
    pub fn store_providers(&self, rows: Vec<Provider>) {
        *self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(rows);
    }

    /// Replaces one cached claim row under the write lock
    ///
    /// The row swap is a single merge, so readers never observe a
    /// half-patched record. Returns false when the cache is cold or the id
    /// is absent; the next full read will pick the row up from the store.
    pub fn patch_claim(&self, claim_id: &str, patched: RawClaim) -> bool {
        let mut guard = self
            .claims
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(rows) = guard.as_mut() else {
            return false;
        };
        match rows
            .iter_mut()
            .find(|row| row.id.as_deref() == Some(claim_id))
        {
            Some(row) => {
                *row = patched;
                true
            }
            None => false,
        }
    }

    /// Drops both cached tables, forcing a reload on the next read
    pub fn clear(&self) {
        *self
            .claims
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        *self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}
