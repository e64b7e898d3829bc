//! Per-claim quick stats
//!
//! Transient contextual text for the review modal: provider history, similar
//! claims, and processing time. Computed on demand, never persisted.

use serde::{Deserialize, Serialize};

use crate::claim::{ClaimRecord, FIELD_PLACEHOLDER};

/// Contextual text for a single selected claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickStats {
    pub provider_summary: String,
    pub similar_summary: String,
    pub days_pending_label: String,
}

impl Default for QuickStats {
    fn default() -> Self {
        QuickStats {
            provider_summary: "No provider history available.".to_string(),
            similar_summary: "No similar claims found.".to_string(),
            days_pending_label: "0 days pending".to_string(),
        }
    }
}

/// Computes quick stats for one claim against the full collection
///
/// The collection is expected to contain the claim itself; provider history
/// counts all of that provider's claims while the similar-claims counts
/// exclude the claim by id. Placeholder codes never match anything.
pub fn quick_stats(claim: &ClaimRecord, collection: &[ClaimRecord]) -> QuickStats {
    if collection.is_empty() {
        return QuickStats::default();
    }

    let provider_claims: Vec<&ClaimRecord> = collection
        .iter()
        .filter(|c| c.provider_id == claim.provider_id)
        .collect();
    let total = provider_claims.len();
    let approvals = provider_claims
        .iter()
        .filter(|c| c.status == "approved")
        .count();
    let approval_rate = if total > 0 {
        approvals as f64 / total as f64
    } else {
        0.0
    };

    let provider_summary = if total <= 1 {
        "First time filing with ClaimSight.".to_string()
    } else {
        format!(
            "Returning provider ({} prior claims, {}% approval).",
            total - 1,
            (approval_rate * 100.0).round() as i64
        )
    };

    let same_diagnosis = count_sharing(collection, &claim.id, &claim.diagnosis_code, |c| {
        &c.diagnosis_code
    });
    let same_procedure = count_sharing(collection, &claim.id, &claim.procedure_code, |c| {
        &c.procedure_code
    });

    let mut similar_parts: Vec<String> = Vec::new();
    if same_diagnosis > 0 {
        similar_parts.push(format!("{same_diagnosis} share diagnosis"));
    }
    if same_procedure > 0 {
        similar_parts.push(format!("{same_procedure} share procedure"));
    }
    let similar_summary = if similar_parts.is_empty() {
        "No similar claims found.".to_string()
    } else {
        similar_parts.join(", ")
    };

    let days_pending = claim.days_pending.max(0.0) as i64;
    let days_pending_label = if claim.status == "pending" {
        if days_pending > 0 {
            format!("{days_pending} days pending")
        } else {
            "Pending (no timer)".to_string()
        }
    } else if days_pending == 0 {
        "Processed today".to_string()
    } else {
        format!("Processed in {days_pending} days")
    };

    QuickStats {
        provider_summary,
        similar_summary,
        days_pending_label,
    }
}

fn count_sharing<'a>(
    collection: &'a [ClaimRecord],
    claim_id: &str,
    code: &str,
    field: impl Fn(&'a ClaimRecord) -> &'a String,
) -> usize {
    if code.is_empty() || code == FIELD_PLACEHOLDER {
        return 0;
    }
    collection
        .iter()
        .filter(|c| c.id != claim_id && field(c) == code)
        .count()
}
