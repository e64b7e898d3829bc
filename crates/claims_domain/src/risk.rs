//! Deterministic risk scoring
//!
//! The score is a fixed, inspectable heuristic in [0, 1] indicating review
//! priority. It is not a trained probability; every contribution is a named
//! rule so a reviewer can reconstruct why a claim ranks where it does.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::claim::{ProviderIndex, RawClaim};

/// Scores at or above this are high risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Scores at or above this (and below high) are medium risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Bucketed risk label derived from the score via fixed thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buckets a score into its risk level
pub fn risk_level(score: f64) -> RiskLevel {
    if score >= HIGH_RISK_THRESHOLD {
        RiskLevel::High
    } else if score >= MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Computes the risk score for a raw claim row
///
/// Additive point system, capped at 1.0 and rounded to 2 decimals:
/// - amount tier: +0.4 over $10,000, +0.3 over $5,000, +0.1 over $2,000
/// - status: +0.2 pending, +0.3 flagged
/// - age: +0.3 over 30 days since claim date, +0.15 over 14
/// - unknown provider: +0.2 when the provider id is set but absent from a
///   non-empty provider index
///
/// Never fails: missing fields contribute zero, as does an unparsable date.
/// The empty provider index (cold start) suppresses the unknown-provider
/// penalty entirely.
pub fn risk_score(claim: &RawClaim, providers: &ProviderIndex, now: DateTime<Utc>) -> f64 {
    let mut score: f64 = 0.0;

    let amount = claim.claim_amount.filter(|v| v.is_finite()).unwrap_or(0.0);
    if amount > 10_000.0 {
        score += 0.4;
    } else if amount > 5_000.0 {
        score += 0.3;
    } else if amount > 2_000.0 {
        score += 0.1;
    }

    match claim.status.as_deref().map(str::to_lowercase).as_deref() {
        Some("pending") => score += 0.2,
        Some("flagged") => score += 0.3,
        _ => {}
    }

    if let Some(date) = claim.claim_date.as_deref().and_then(parse_claim_date) {
        let age_days = (now.date_naive() - date).num_days();
        if age_days > 30 {
            score += 0.3;
        } else if age_days > 14 {
            score += 0.15;
        }
    }

    if let Some(provider_id) = claim.provider_id.as_deref().filter(|s| !s.is_empty()) {
        if !providers.is_empty() && !providers.contains(provider_id) {
            score += 0.2;
        }
    }

    round2(score.min(1.0))
}

/// Parses a claim date in any of the forms seen in source data
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and bare `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_claim_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.date());
    }
    None
}

/// Rounds to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
