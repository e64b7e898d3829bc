//! Status transition planning
//!
//! A status change carries side effects beyond the status field itself:
//! processing timestamps, denial bookkeeping, and approved-amount defaulting.
//! [`plan_status_change`] computes the complete field set up front so the
//! store write, the cache patch, and the returned record all apply the same
//! merge - there is no partially-applied state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::claim::{ClaimStatus, RawClaim};
use crate::risk::parse_claim_date;

/// Default denial reason when the reviewer supplies none
pub const DEFAULT_DENIAL_REASON: &str = "Manual denial";

/// The full set of fields written by one status change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChanges {
    pub status: ClaimStatus,
    pub processed_date: DateTime<Utc>,
    pub days_to_process: f64,
    /// `Some` sets the reason, `None` clears the stored column
    pub denial_reason: Option<String>,
    /// `Some` overwrites the approved amount, `None` leaves it untouched
    pub approved_amount: Option<f64>,
}

impl StatusChanges {
    /// Merges these changes into a raw claim row
    ///
    /// This is the single merge used everywhere a patched view of the claim
    /// is needed, so every observer sees the same record.
    pub fn apply_to(&self, mut claim: RawClaim) -> RawClaim {
        claim.status = Some(self.status.as_str().to_string());
        claim.processed_date = Some(self.processed_date.to_rfc3339());
        claim.days_to_process = Some(self.days_to_process);
        claim.denial_reason = self.denial_reason.clone();
        if let Some(amount) = self.approved_amount {
            claim.approved_amount = Some(amount);
        }
        claim
    }
}

/// Computes the side-effect fields for a requested status change
///
/// - `processed_date` is `now`; `days_to_process` is the non-negative span
///   from the claim date, 0.0 when the date is unparsable
/// - denied: the supplied reason (or the default literal) plus a zeroed
///   approved amount
/// - approved: the approved amount defaults to the claim amount when the row
///   has none
/// - any other target clears the denial reason
pub fn plan_status_change(
    claim: &RawClaim,
    status: ClaimStatus,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> StatusChanges {
    let days_to_process = claim
        .claim_date
        .as_deref()
        .and_then(parse_claim_date)
        .map(|date| (now.date_naive() - date).num_days().max(0) as f64)
        .unwrap_or(0.0);

    let (denial_reason, approved_amount) = match status {
        ClaimStatus::Denied => {
            let reason = reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .unwrap_or(DEFAULT_DENIAL_REASON);
            (Some(reason.to_string()), Some(0.0))
        }
        ClaimStatus::Approved => {
            let approved = match claim.approved_amount {
                Some(v) if v.is_finite() => None,
                _ => Some(claim.claim_amount.filter(|v| v.is_finite()).unwrap_or(0.0)),
            };
            (None, approved)
        }
        ClaimStatus::Pending | ClaimStatus::Flagged => (None, None),
    };

    StatusChanges {
        status,
        processed_date: now,
        days_to_process,
        denial_reason,
        approved_amount,
    }
}
