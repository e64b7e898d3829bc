//! The claims review engine
//!
//! Wires the store, the read cache, and the pure domain functions into the
//! operations the transport layer exposes. Reads are served from the cache
//! once warm; the status workflow is the only writer and always hits the
//! store before patching the cache.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use claims_domain::{
    normalize_claim, plan_status_change, quick_stats, risk::parse_claim_date, ClaimFilter,
    ClaimRecord, ClaimStatus, CollectionSummary, Page, ProviderIndex, ProviderMetrics, QuickStats,
    RawClaim, RiskDistribution, SortDirection,
};
use claims_store::{ClaimStore, ReadCache};

use crate::error::EngineError;

/// Offset-based listing parameters for the claims endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default = "ListParams::default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl ListParams {
    fn default_limit() -> usize {
        100
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            status: None,
            start_date: None,
            end_date: None,
            limit: Self::default_limit(),
            offset: 0,
        }
    }
}

/// One offset-based page of claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimsList {
    pub claims: Vec<ClaimRecord>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Page-number query for the reviewer dashboard
#[derive(Debug, Clone, Default)]
pub struct ClaimQuery {
    pub filter: ClaimFilter,
    pub sort_column: Option<String>,
    pub sort_direction: Option<SortDirection>,
    pub page: usize,
    pub page_size: usize,
}

/// Risk analysis summary for the analytics surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub high_risk_count: usize,
    pub distribution: RiskDistribution,
    pub top_risks: Vec<ClaimRecord>,
}

/// The claims review engine
pub struct ClaimsEngine {
    store: Arc<dyn ClaimStore>,
    cache: ReadCache,
}

impl ClaimsEngine {
    pub fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self {
            store,
            cache: ReadCache::new(),
        }
    }

    /// Reloads both cached tables from the store
    pub async fn refresh(&self) -> Result<(), EngineError> {
        let claims = self.store.fetch_claims().await?;
        let providers = self.store.fetch_providers().await?;
        tracing::info!(
            claims = claims.len(),
            providers = providers.len(),
            "refreshed read cache"
        );
        self.cache.store_claims(claims);
        self.cache.store_providers(providers);
        Ok(())
    }

    async fn raw_claims(&self) -> Result<Vec<RawClaim>, EngineError> {
        if let Some(rows) = self.cache.claims() {
            return Ok(rows);
        }
        let rows = self.store.fetch_claims().await?;
        self.cache.store_claims(rows.clone());
        Ok(rows)
    }

    async fn provider_index(&self) -> Result<ProviderIndex, EngineError> {
        if let Some(rows) = self.cache.providers() {
            return Ok(ProviderIndex::new(rows));
        }
        let rows = self.store.fetch_providers().await?;
        self.cache.store_providers(rows.clone());
        Ok(ProviderIndex::new(rows))
    }

    /// Loads and normalizes the full collection
    pub async fn records(&self) -> Result<Vec<ClaimRecord>, EngineError> {
        let raws = self.raw_claims().await?;
        let providers = self.provider_index().await?;
        let now = Utc::now();
        Ok(raws
            .iter()
            .map(|raw| normalize_claim(raw, &providers, now))
            .collect())
    }

    /// Aggregate counts over the full collection
    pub async fn summary(&self) -> Result<CollectionSummary, EngineError> {
        let records = self.records().await?;
        Ok(claims_domain::summarize(&records))
    }

    /// Offset-based claim listing with status and date filters
    pub async fn list_claims(&self, params: &ListParams) -> Result<ClaimsList, EngineError> {
        let records = self.records().await?;

        let filter = ClaimFilter {
            status: params.status.clone(),
            date_start: params.start_date.as_deref().and_then(parse_claim_date),
            date_end: params.end_date.as_deref().and_then(parse_claim_date),
            ..ClaimFilter::default()
        };
        let filtered = filter.apply(&records);

        let limit = params.limit.max(1);
        let total = filtered.len();
        let claims: Vec<ClaimRecord> = filtered
            .into_iter()
            .skip(params.offset)
            .take(limit)
            .collect();

        Ok(ClaimsList {
            claims,
            total,
            page: params.offset / limit,
            page_size: limit,
        })
    }

    /// Filtered, sorted, 1-indexed page for the reviewer dashboard
    pub async fn dashboard_page(&self, query: &ClaimQuery) -> Result<Page<ClaimRecord>, EngineError> {
        let records = self.records().await?;
        let mut filtered = query.filter.apply(&records);

        if let Some(column) = query.sort_column.as_deref() {
            let direction = query.sort_direction.unwrap_or(SortDirection::Asc);
            claims_domain::sort_claims(&mut filtered, column, direction);
        }

        Ok(claims_domain::paginate(
            &filtered,
            query.page_size,
            query.page,
        ))
    }

    /// Per-provider aggregate metrics
    pub async fn provider_metrics(&self) -> Result<Vec<ProviderMetrics>, EngineError> {
        let records = self.records().await?;
        let providers = self.provider_index().await?;
        Ok(claims_domain::provider_metrics(&records, &providers))
    }

    /// Risk distribution plus the highest-risk claims
    pub async fn risk_analysis(&self, limit: usize) -> Result<RiskAnalysis, EngineError> {
        let records = self.records().await?;
        let distribution = claims_domain::risk_distribution(&records);
        let top_risks = claims_domain::high_risk_claims(&records, limit);
        Ok(RiskAnalysis {
            high_risk_count: distribution.high,
            distribution,
            top_risks,
        })
    }

    /// Loads one claim with its quick stats
    pub async fn claim(&self, claim_id: &str) -> Result<(ClaimRecord, QuickStats), EngineError> {
        let records = self.records().await?;
        let record = records
            .iter()
            .find(|c| c.id == claim_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(claim_id))?;
        let stats = quick_stats(&record, &records);
        Ok((record, stats))
    }

    /// Applies a reviewer's status decision to one claim
    ///
    /// Validation happens before any lookup, the lookup before any write, and
    /// the store write before the cache patch; a failure at any step leaves
    /// earlier state untouched.
    pub async fn update_status(
        &self,
        claim_id: &str,
        status: &str,
        reason: Option<&str>,
    ) -> Result<(ClaimRecord, QuickStats), EngineError> {
        let status = ClaimStatus::parse(status)?;

        let raws = self.raw_claims().await?;
        let raw = raws
            .iter()
            .find(|row| row.id.as_deref() == Some(claim_id))
            .ok_or_else(|| EngineError::not_found(claim_id))?;

        let now = Utc::now();
        let changes = plan_status_change(raw, status, reason, now);

        let affected = self.store.apply_status_change(claim_id, &changes).await?;
        if affected == 0 {
            // The row vanished between lookup and write.
            return Err(EngineError::not_found(claim_id));
        }

        let mut merged = changes.apply_to(raw.clone());
        // Force a re-score; the stale stored score must not survive the
        // transition.
        merged.risk_score = None;

        let providers = self.provider_index().await?;
        let record = normalize_claim(&merged, &providers, now);
        merged.risk_score = Some(record.risk_score);

        let patched_records: Vec<ClaimRecord> = raws
            .iter()
            .map(|row| {
                if row.id.as_deref() == Some(claim_id) {
                    record.clone()
                } else {
                    normalize_claim(row, &providers, now)
                }
            })
            .collect();
        let stats = quick_stats(&record, &patched_records);

        self.cache.patch_claim(claim_id, merged);

        tracing::info!(
            claim_id,
            status = %status,
            "claim status updated"
        );
        Ok((record, stats))
    }

    /// Replaces the processor notes on one claim
    pub async fn update_notes(
        &self,
        claim_id: &str,
        note: Option<&str>,
    ) -> Result<ClaimRecord, EngineError> {
        let cleaned = note.map(str::trim).filter(|s| !s.is_empty());

        let affected = self.store.update_notes(claim_id, cleaned).await?;
        if affected == 0 {
            return Err(EngineError::not_found(claim_id));
        }

        let raws = self.raw_claims().await?;
        let raw = raws
            .iter()
            .find(|row| row.id.as_deref() == Some(claim_id))
            .ok_or_else(|| EngineError::not_found(claim_id))?;

        let mut patched = raw.clone();
        patched.processor_notes = cleaned.map(str::to_string);
        self.cache.patch_claim(claim_id, patched.clone());

        let providers = self.provider_index().await?;
        Ok(normalize_claim(&patched, &providers, Utc::now()))
    }
}
