//! In-memory claim store
//!
//! Implements the same contract as the SQL store against mutex-guarded
//! vectors. Used by the engine and API test suites, and handy for running
//! the server against fixture data without a database.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use claims_domain::{Provider, RawClaim, StatusChanges};

use crate::error::StoreError;
use crate::store::ClaimStore;

/// A claim store holding its rows in memory
#[derive(Debug, Default)]
pub struct MemoryClaimStore {
    claims: Mutex<Vec<RawClaim>>,
    providers: Mutex<Vec<Provider>>,
}

impl MemoryClaimStore {
    pub fn new(claims: Vec<RawClaim>, providers: Vec<Provider>) -> Self {
        Self {
            claims: Mutex::new(claims),
            providers: Mutex::new(providers),
        }
    }
}

#[async_trait]
impl ClaimStore for MemoryClaimStore {
    async fn fetch_claims(&self) -> Result<Vec<RawClaim>, StoreError> {
        Ok(self
            .claims
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn fetch_providers(&self) -> Result<Vec<Provider>, StoreError> {
        Ok(self
            .providers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn apply_status_change(
        &self,
        claim_id: &str,
        changes: &StatusChanges,
    ) -> Result<u64, StoreError> {
        let mut rows = self.claims.lock().unwrap_or_else(PoisonError::into_inner);
        match rows
            .iter_mut()
            .find(|row| row.id.as_deref() == Some(claim_id))
        {
            Some(row) => {
                *row = changes.apply_to(row.clone());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_notes(&self, claim_id: &str, note: Option<&str>) -> Result<u64, StoreError> {
        let mut rows = self.claims.lock().unwrap_or_else(PoisonError::into_inner);
        match rows
            .iter_mut()
            .find(|row| row.id.as_deref() == Some(claim_id))
        {
            Some(row) => {
                row.processor_notes = note.map(str::to_string);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
