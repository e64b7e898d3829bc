//! Claim records and normalization
//!
//! Source rows arrive with missing columns, mixed types, and NaN markers.
//! [`normalize_claim`] turns any such row into a [`ClaimRecord`] with every
//! field guaranteed, so downstream listing and summary operations never have
//! to re-check individual fields.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UnsupportedStatus;
use crate::risk::{self, RiskLevel};

/// Sentinel shown for absent free-form fields
pub const FIELD_PLACEHOLDER: &str = "—";

/// Sentinel shown for an absent provider reference
pub const UNKNOWN_PROVIDER: &str = "Unknown";

/// Claim lifecycle status
///
/// This is a manual-override workflow: a reviewer may move a claim from any
/// status to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Denied,
    Flagged,
}

impl ClaimStatus {
    /// Allowed status values, sorted, as surfaced in validation errors
    pub const ALLOWED: [&'static str; 4] = ["approved", "denied", "flagged", "pending"];

    /// Parses a status value case-insensitively
    pub fn parse(value: &str) -> Result<Self, UnsupportedStatus> {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Ok(ClaimStatus::Pending),
            "approved" => Ok(ClaimStatus::Approved),
            "denied" => Ok(ClaimStatus::Denied),
            "flagged" => Ok(ClaimStatus::Flagged),
            _ => Err(UnsupportedStatus {
                supplied: value.to_string(),
            }),
        }
    }

    /// Canonical lower-case form
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Denied => "denied",
            ClaimStatus::Flagged => "flagged",
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A claim row as loaded from the store
///
/// Every field is optional; amounts stay `f64` so non-finite markers from the
/// source survive loading and can be degraded deliberately during
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawClaim {
    pub id: Option<String>,
    pub claim_amount: Option<f64>,
    pub approved_amount: Option<f64>,
    pub claim_date: Option<String>,
    pub status: Option<String>,
    pub risk_score: Option<f64>,
    pub days_pending: Option<f64>,
    pub denial_reason: Option<String>,
    pub processed_date: Option<String>,
    pub provider_id: Option<String>,
    pub provider_name: Option<String>,
    pub patient_id: Option<String>,
    pub procedure_code: Option<String>,
    pub diagnosis_code: Option<String>,
    pub processor_notes: Option<String>,
    pub days_to_process: Option<f64>,
}

/// A fully normalized, UI-ready claim record
///
/// Invariants:
/// - `risk_score` is finite, rounded to 2 decimals
/// - `status` is canonical lower-case (`"unknown"` when the source row had none)
/// - `ui_risk_level` is derived from `risk_score` via the fixed thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: String,
    pub claim_amount: f64,
    pub claim_amount_formatted: String,
    pub approved_amount: Option<f64>,
    pub approved_amount_formatted: String,
    pub claim_date: String,
    pub status: String,
    pub risk_score: f64,
    pub days_pending: f64,
    pub denial_reason: Option<String>,
    pub processed_date: Option<String>,
    pub provider_id: String,
    pub provider_name: String,
    pub patient_id: String,
    pub procedure_code: String,
    pub diagnosis_code: String,
    pub processor_notes: String,
    pub days_to_process: f64,
    pub ui_risk_reason: String,
    pub ui_has_reason: bool,
    pub ui_risk_level: RiskLevel,
}

impl From<&ClaimRecord> for RawClaim {
    fn from(record: &ClaimRecord) -> Self {
        RawClaim {
            id: Some(record.id.clone()),
            claim_amount: Some(record.claim_amount),
            approved_amount: record.approved_amount,
            claim_date: Some(record.claim_date.clone()),
            status: Some(record.status.clone()),
            risk_score: Some(record.risk_score),
            days_pending: Some(record.days_pending),
            denial_reason: record.denial_reason.clone(),
            processed_date: record.processed_date.clone(),
            provider_id: Some(record.provider_id.clone()),
            provider_name: Some(record.provider_name.clone()),
            patient_id: Some(record.patient_id.clone()),
            procedure_code: Some(record.procedure_code.clone()),
            diagnosis_code: Some(record.diagnosis_code.clone()),
            processor_notes: Some(record.processor_notes.clone()),
            days_to_process: Some(record.days_to_process),
        }
    }
}

/// A healthcare provider, read-only from the engine's perspective
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub npi: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub provider_type: Option<String>,
    pub specialty: Option<String>,
}

/// Lookup index over the known-providers set
///
/// An empty index represents the cold-start state (no providers loaded yet);
/// the risk scorer skips the unknown-provider penalty in that state to avoid
/// penalizing every claim before providers exist.
#[derive(Debug, Clone, Default)]
pub struct ProviderIndex {
    by_id: HashMap<String, Provider>,
}

impl ProviderIndex {
    pub fn new(providers: Vec<Provider>) -> Self {
        let by_id = providers.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self { by_id }
    }

    pub fn contains(&self, provider_id: &str) -> bool {
        self.by_id.contains_key(provider_id)
    }

    pub fn name(&self, provider_id: &str) -> Option<&str> {
        self.by_id.get(provider_id).and_then(|p| p.name.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }
}

/// Coerces a loose numeric field to a finite float, defaulting on failure
fn safe_f64(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Coerces a loose string field, collapsing absent/empty to the default
fn safe_str(value: Option<&str>, default: &str) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

/// Formats an amount as a currency string with thousands separators
pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{frac:02}")
}

/// Normalizes a raw claim row into a canonical [`ClaimRecord`]
///
/// Total over its input domain: malformed numerics degrade to 0.0, malformed
/// strings to sentinels, and a missing or non-finite risk score is recomputed
/// from the row itself. Applying the function to its own output yields the
/// same record.
pub fn normalize_claim(raw: &RawClaim, providers: &ProviderIndex, now: DateTime<Utc>) -> ClaimRecord {
    let id = safe_str(raw.id.as_deref(), "");

    let claim_amount = safe_f64(raw.claim_amount, 0.0);
    let claim_amount_formatted = format_currency(claim_amount);

    // Absent stays absent; a non-finite marker degrades to 0.0 rather than
    // poisoning downstream arithmetic.
    let approved_amount = raw
        .approved_amount
        .map(|v| if v.is_finite() { v } else { 0.0 });
    let approved_amount_formatted = match approved_amount {
        Some(v) => format_currency(v),
        None => FIELD_PLACEHOLDER.to_string(),
    };

    let claim_date = safe_str(raw.claim_date.as_deref(), FIELD_PLACEHOLDER);
    let status = safe_str(raw.status.as_deref(), "unknown").to_lowercase();

    let risk_score = match raw.risk_score {
        Some(v) if v.is_finite() && (0.0..=1.0).contains(&v) => risk::round2(v),
        _ => {
            tracing::trace!(claim_id = %id, "recomputing missing or invalid risk score");
            risk::risk_score(raw, providers, now)
        }
    };

    let days_pending = safe_f64(raw.days_pending, 0.0);

    let denial_reason = raw
        .denial_reason
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let processed_date = raw
        .processed_date
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let provider_id = safe_str(raw.provider_id.as_deref(), UNKNOWN_PROVIDER);
    let provider_name = safe_str(raw.provider_name.as_deref(), &provider_id);

    let patient_id = safe_str(raw.patient_id.as_deref(), FIELD_PLACEHOLDER);
    let procedure_code = safe_str(raw.procedure_code.as_deref(), FIELD_PLACEHOLDER);
    let diagnosis_code = safe_str(raw.diagnosis_code.as_deref(), FIELD_PLACEHOLDER);
    let processor_notes = safe_str(raw.processor_notes.as_deref(), "");
    let days_to_process = safe_f64(raw.days_to_process, 0.0);

    // Review reasons in fixed order, de-duplicated.
    let mut reasons: Vec<String> = Vec::new();
    if claim_amount > 5_000.0 {
        reasons.push("Amount > $5,000".to_string());
    }
    if status == "pending" && days_pending > 30.0 {
        reasons.push("Pending > 30 days".to_string());
    }
    if let Some(reason) = &denial_reason {
        if !reasons.contains(reason) {
            reasons.push(reason.clone());
        }
    }
    let ui_risk_reason = reasons.join(" • ");
    let ui_has_reason = !ui_risk_reason.is_empty();

    ClaimRecord {
        id,
        claim_amount,
        claim_amount_formatted,
        approved_amount,
        approved_amount_formatted,
        claim_date,
        status,
        risk_score,
        days_pending,
        denial_reason,
        processed_date,
        provider_id,
        provider_name,
        patient_id,
        procedure_code,
        diagnosis_code,
        processor_notes,
        days_to_process,
        ui_risk_reason,
        ui_has_reason,
        ui_risk_level: risk::risk_level(risk_score),
    }
}
