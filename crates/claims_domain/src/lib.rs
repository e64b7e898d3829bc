//! Claims Review Domain
//!
//! This crate implements the decision logic of the claims review engine:
//! record normalization, deterministic risk scoring, collection queries,
//! status-transition planning, and per-claim quick stats.
//!
//! # Data Flow
//!
//! ```text
//! raw rows -> normalize -> score -> filter/sort/paginate -> review actions
//! ```
//!
//! Everything here is pure and synchronous; storage and caching live in
//! `claims_store`, orchestration in `claims_engine`.

pub mod claim;
pub mod error;
pub mod query;
pub mod risk;
pub mod stats;
pub mod transition;

pub use claim::{normalize_claim, ClaimRecord, ClaimStatus, Provider, ProviderIndex, RawClaim};
pub use error::UnsupportedStatus;
pub use query::{
    high_risk_claims, paginate, provider_metrics, risk_distribution, sort_claims, summarize,
    ClaimFilter, CollectionSummary, Page, ProviderMetrics, RiskDistribution, SortDirection,
};
pub use risk::{risk_level, risk_score, RiskLevel, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
pub use stats::{quick_stats, QuickStats};
pub use transition::{plan_status_change, StatusChanges};
