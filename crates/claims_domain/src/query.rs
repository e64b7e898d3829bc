//! Queries over the claim collection
//!
//! Filtering, sorting, pagination, and aggregates are pure functions over a
//! slice of normalized records. Every operation yields a well-formed,
//! zero-valued result on an empty collection; a single malformed record can
//! never fail a listing.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::claim::{ClaimRecord, ProviderIndex};
use crate::risk::{self, parse_claim_date, RiskLevel, HIGH_RISK_THRESHOLD};

/// Aggregate counts over the full collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub total_claims: usize,
    pub approved_count: usize,
    pub pending_count: usize,
    pub flagged_count: usize,
    pub approval_rate: f64,
}

/// Summarizes status counts and the overall approval rate
pub fn summarize(claims: &[ClaimRecord]) -> CollectionSummary {
    let total_claims = claims.len();
    let approved_count = claims.iter().filter(|c| c.status == "approved").count();
    let pending_count = claims.iter().filter(|c| c.status == "pending").count();
    let flagged_count = claims.iter().filter(|c| c.status == "flagged").count();

    let approval_rate = if total_claims > 0 {
        risk::round2(approved_count as f64 / total_claims as f64)
    } else {
        0.0
    };

    CollectionSummary {
        total_claims,
        approved_count,
        pending_count,
        flagged_count,
        approval_rate,
    }
}

/// Composable filter over the claim collection
///
/// Absent criteria match everything; `status` of `"all"` is treated as
/// absent. The risk-level filter evaluates against the computed
/// `ui_risk_level`, never a stored field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimFilter {
    pub status: Option<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub risk_levels: Option<Vec<RiskLevel>>,
    pub search: Option<String>,
}

impl ClaimFilter {
    /// Applies the filter, preserving collection order
    pub fn apply(&self, claims: &[ClaimRecord]) -> Vec<ClaimRecord> {
        claims
            .iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect()
    }

    fn matches(&self, claim: &ClaimRecord) -> bool {
        if let Some(status) = self.status.as_deref() {
            if !status.is_empty() && status != "all" && claim.status != status.to_lowercase() {
                return false;
            }
        }

        if self.date_start.is_some() || self.date_end.is_some() {
            // A record whose date cannot be parsed drops out of any dated view.
            let Some(date) = parse_claim_date(&claim.claim_date) else {
                return false;
            };
            if let Some(start) = self.date_start {
                if date < start {
                    return false;
                }
            }
            if let Some(end) = self.date_end {
                if date > end {
                    return false;
                }
            }
        }

        if let Some(levels) = &self.risk_levels {
            if !levels.is_empty() && !levels.contains(&claim.ui_risk_level) {
                return false;
            }
        }

        if let Some(query) = self.search.as_deref() {
            let query = query.trim().to_lowercase();
            if !query.is_empty() {
                let hit = claim.id.to_lowercase().contains(&query)
                    || claim.status.contains(&query)
                    || claim.provider_name.to_lowercase().contains(&query)
                    || claim.provider_id.to_lowercase().contains(&query);
                if !hit {
                    return false;
                }
            }
        }

        true
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses a direction parameter, defaulting to ascending
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

fn cmp_opt_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
}

fn compare_column(a: &ClaimRecord, b: &ClaimRecord, column: &str) -> Ordering {
    match column {
        "id" => a.id.cmp(&b.id),
        "claim_date" => a.claim_date.cmp(&b.claim_date),
        "claim_amount" => a.claim_amount.total_cmp(&b.claim_amount),
        "approved_amount" => cmp_opt_f64(a.approved_amount, b.approved_amount),
        "status" => a.status.cmp(&b.status),
        "risk_score" => a.risk_score.total_cmp(&b.risk_score),
        "days_pending" => a.days_pending.total_cmp(&b.days_pending),
        "days_to_process" => a.days_to_process.total_cmp(&b.days_to_process),
        "processed_date" => a.processed_date.cmp(&b.processed_date),
        "provider_id" => a.provider_id.cmp(&b.provider_id),
        "provider_name" => a.provider_name.cmp(&b.provider_name),
        "patient_id" => a.patient_id.cmp(&b.patient_id),
        "procedure_code" => a.procedure_code.cmp(&b.procedure_code),
        "diagnosis_code" => a.diagnosis_code.cmp(&b.diagnosis_code),
        // Unknown columns compare equal, so a stable sort leaves the
        // collection order untouched instead of failing.
        _ => Ordering::Equal,
    }
}

/// Stable sort by a named column
pub fn sort_claims(claims: &mut [ClaimRecord], column: &str, direction: SortDirection) {
    claims.sort_by(|a, b| {
        let ordering = compare_column(a, b, column);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// One page of a sorted/filtered sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// 1-based index of the first item on this page, for display
    pub page_start: usize,
    /// 1-based index of the last item on this page
    pub page_end: usize,
}

/// Slices out one 1-indexed page
///
/// `total_pages` is at least 1 even for an empty collection; an out-of-range
/// page number is clamped into `1..=total_pages`.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = (total.div_ceil(page_size)).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total);
    let items: Vec<T> = items[start.min(total)..end].to_vec();

    Page {
        page_start: start + 1,
        page_end: end,
        items,
        total,
        page,
        page_size,
        total_pages,
    }
}

/// Per-provider aggregate metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetrics {
    pub provider_id: String,
    pub name: String,
    pub total_claims: usize,
    pub approval_rate: f64,
    pub avg_claim_amount: f64,
    pub is_unusual: bool,
}

/// Linearly interpolated quantile over unsorted values
fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = position - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

/// Groups claims by provider and computes per-provider metrics
///
/// A provider is unusual when its approval rate beats the overall rate by
/// more than 0.15, or its mean claim amount exceeds the 90th percentile of
/// all claim amounts. The provider name falls back to "Unknown Provider"
/// when the provider set is loaded but has no match, and to
/// `"Provider {id}"` when no provider set exists at all.
pub fn provider_metrics(claims: &[ClaimRecord], providers: &ProviderIndex) -> Vec<ProviderMetrics> {
    if claims.is_empty() {
        return Vec::new();
    }

    let mut groups: BTreeMap<&str, Vec<&ClaimRecord>> = BTreeMap::new();
    for claim in claims {
        groups.entry(claim.provider_id.as_str()).or_default().push(claim);
    }

    let overall_approval =
        claims.iter().filter(|c| c.status == "approved").count() as f64 / claims.len() as f64;
    let amounts: Vec<f64> = claims.iter().map(|c| c.claim_amount).collect();
    let amount_p90 = quantile(&amounts, 0.9);

    groups
        .into_iter()
        .map(|(provider_id, group)| {
            let total_claims = group.len();
            let approved = group.iter().filter(|c| c.status == "approved").count();
            let approval_rate = approved as f64 / total_claims as f64;
            let avg_claim_amount =
                group.iter().map(|c| c.claim_amount).sum::<f64>() / total_claims as f64;

            let name = if providers.is_empty() {
                format!("Provider {provider_id}")
            } else {
                providers
                    .name(provider_id)
                    .unwrap_or("Unknown Provider")
                    .to_string()
            };

            let is_unusual =
                approval_rate > overall_approval + 0.15 || avg_claim_amount > amount_p90;

            ProviderMetrics {
                provider_id: provider_id.to_string(),
                name,
                total_claims,
                approval_rate,
                avg_claim_amount,
                is_unusual,
            }
        })
        .collect()
}

/// Claim counts per risk bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Buckets the collection by computed risk level
pub fn risk_distribution(claims: &[ClaimRecord]) -> RiskDistribution {
    let mut distribution = RiskDistribution::default();
    for claim in claims {
        match claim.ui_risk_level {
            RiskLevel::Low => distribution.low += 1,
            RiskLevel::Medium => distribution.medium += 1,
            RiskLevel::High => distribution.high += 1,
        }
    }
    distribution
}

/// Returns the highest-risk claims, descending by score
pub fn high_risk_claims(claims: &[ClaimRecord], limit: usize) -> Vec<ClaimRecord> {
    let mut high: Vec<ClaimRecord> = claims
        .iter()
        .filter(|c| c.risk_score >= HIGH_RISK_THRESHOLD)
        .cloned()
        .collect();
    high.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    high.truncate(limit);
    high
}
