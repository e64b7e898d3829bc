//! Engine tests against the in-memory store

use std::sync::Arc;

use chrono::{Duration, Utc};

use claims_domain::{
    plan_status_change, ClaimFilter, ClaimStatus, Provider, RawClaim, RiskLevel,
};
use claims_engine::{ClaimQuery, ClaimsEngine, EngineError, ListParams};
use claims_store::{ClaimStore, MemoryClaimStore};

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn raw(id: &str, status: &str, amount: f64, age_days: i64, provider_id: &str) -> RawClaim {
    RawClaim {
        id: Some(id.to_string()),
        status: Some(status.to_string()),
        claim_amount: Some(amount),
        claim_date: Some(days_ago(age_days)),
        days_pending: Some(age_days as f64),
        provider_id: Some(provider_id.to_string()),
        ..RawClaim::default()
    }
}

fn provider(id: &str, name: &str) -> Provider {
    Provider {
        id: id.to_string(),
        name: Some(name.to_string()),
        ..Provider::default()
    }
}

/// Four claims across every status, two known providers and one unknown.
fn fixture_store() -> Arc<MemoryClaimStore> {
    let mut denied = raw("CLM-004", "denied", 6_000.0, 20, "PRV-9");
    denied.denial_reason = Some("Missing documentation".to_string());
    denied.approved_amount = Some(0.0);

    Arc::new(MemoryClaimStore::new(
        vec![
            raw("CLM-001", "pending", 4_200.0, 5, "PRV-1"),
            raw("CLM-002", "approved", 1_500.0, 40, "PRV-1"),
            raw("CLM-003", "flagged", 15_000.0, 45, "PRV-2"),
            denied,
        ],
        vec![
            provider("PRV-1", "Alpha Clinic"),
            provider("PRV-2", "Beta Medical"),
        ],
    ))
}

fn engine() -> ClaimsEngine {
    ClaimsEngine::new(fixture_store())
}

#[tokio::test]
async fn test_summary_over_fixture() {
    let summary = engine().summary().await.unwrap();

    assert_eq!(summary.total_claims, 4);
    assert_eq!(summary.approved_count, 1);
    assert_eq!(summary.pending_count, 1);
    assert_eq!(summary.flagged_count, 1);
    assert_eq!(summary.approval_rate, 0.25);
}

#[tokio::test]
async fn test_records_are_scored_against_the_provider_set() {
    let engine = engine();
    let records = engine.records().await.unwrap();

    // Flagged, high value, 45 days old: the score saturates.
    let flagged = records.iter().find(|c| c.id == "CLM-003").unwrap();
    assert_eq!(flagged.risk_score, 1.0);
    assert_eq!(flagged.ui_risk_level, RiskLevel::High);

    // Unknown provider takes the extra 0.2 on top of amount and age.
    let denied = records.iter().find(|c| c.id == "CLM-004").unwrap();
    assert_eq!(denied.risk_score, 0.65);
    assert_eq!(denied.ui_risk_level, RiskLevel::Medium);
    assert_eq!(denied.provider_name, "PRV-9");
}

#[tokio::test]
async fn test_list_claims_filters_and_pages() {
    let engine = engine();

    let approved = engine
        .list_claims(&ListParams {
            status: Some("approved".to_string()),
            ..ListParams::default()
        })
        .await
        .unwrap();
    assert_eq!(approved.total, 1);
    assert_eq!(approved.claims[0].id, "CLM-002");

    let page = engine
        .list_claims(&ListParams {
            limit: 2,
            offset: 2,
            ..ListParams::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.claims.len(), 2);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 2);
}

#[tokio::test]
async fn test_list_claims_date_window() {
    let engine = engine();

    let recent = engine
        .list_claims(&ListParams {
            start_date: Some(days_ago(30)),
            ..ListParams::default()
        })
        .await
        .unwrap();
    let ids: Vec<String> = recent.claims.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, vec!["CLM-001", "CLM-004"]);
}

#[tokio::test]
async fn test_dashboard_page_sorts_and_paginates() {
    let engine = engine();
    let page = engine
        .dashboard_page(&ClaimQuery {
            filter: ClaimFilter::default(),
            sort_column: Some("claim_amount".to_string()),
            sort_direction: Some(claims_domain::SortDirection::Desc),
            page: 1,
            page_size: 2,
        })
        .await
        .unwrap();

    assert_eq!(page.total, 4);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page_start, 1);
    assert_eq!(page.page_end, 2);
    let ids: Vec<String> = page.items.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, vec!["CLM-003", "CLM-004"]);
}

#[tokio::test]
async fn test_risk_analysis() {
    let analysis = engine().risk_analysis(10).await.unwrap();

    assert_eq!(analysis.high_risk_count, 1);
    assert_eq!(analysis.distribution.high, 1);
    assert_eq!(analysis.distribution.medium, 1);
    assert_eq!(analysis.distribution.low, 2);
    assert_eq!(analysis.top_risks.len(), 1);
    assert_eq!(analysis.top_risks[0].id, "CLM-003");
}

#[tokio::test]
async fn test_claim_detail_with_quick_stats() {
    let engine = engine();
    let (record, stats) = engine.claim("CLM-001").await.unwrap();

    assert_eq!(record.id, "CLM-001");
    // PRV-1 filed CLM-002 as well, and that one was approved.
    assert_eq!(
        stats.provider_summary,
        "Returning provider (1 prior claims, 50% approval)."
    );
    assert_eq!(stats.days_pending_label, "5 days pending");
}

#[tokio::test]
async fn test_claim_not_found() {
    let err = engine().claim("CLM-999").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
    assert_eq!(err.to_string(), "Claim CLM-999 not found");
}

#[tokio::test]
async fn test_denial_workflow() {
    let engine = engine();
    let (record, _stats) = engine
        .update_status("CLM-001", "denied", Some("Incomplete docs"))
        .await
        .unwrap();

    assert_eq!(record.status, "denied");
    assert_eq!(record.denial_reason.as_deref(), Some("Incomplete docs"));
    assert_eq!(record.approved_amount, Some(0.0));
    assert_eq!(record.approved_amount_formatted, "$0.00");
    assert!(record.processed_date.is_some());
    assert!(record.days_to_process >= 5.0);
    // Denied status sheds the pending bonus; the re-scored claim is low risk.
    assert_eq!(record.risk_score, 0.1);

    // A subsequent read reflects the transition without a refresh.
    let (reread, _) = engine.claim("CLM-001").await.unwrap();
    assert_eq!(reread.status, "denied");
    assert_eq!(reread.denial_reason.as_deref(), Some("Incomplete docs"));
    assert_eq!(reread.risk_score, 0.1);
}

#[tokio::test]
async fn test_denial_defaults_reason() {
    let engine = engine();
    let (record, _) = engine.update_status("CLM-001", "denied", None).await.unwrap();
    assert_eq!(record.denial_reason.as_deref(), Some("Manual denial"));
}

#[tokio::test]
async fn test_approval_defaults_approved_amount() {
    let engine = engine();
    let (record, _) = engine.update_status("CLM-003", "approved", None).await.unwrap();

    assert_eq!(record.status, "approved");
    assert_eq!(record.approved_amount, Some(15_000.0));
    assert_eq!(record.denial_reason, None);
}

#[tokio::test]
async fn test_invalid_status_is_rejected_before_any_write() {
    let store = fixture_store();
    let engine = ClaimsEngine::new(store.clone());

    let err = engine
        .update_status("CLM-001", "archived", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatus(_)));
    assert!(err.to_string().contains("Unsupported status 'archived'"));

    // The stored row is untouched.
    let rows = store.fetch_claims().await.unwrap();
    let row = rows
        .iter()
        .find(|r| r.id.as_deref() == Some("CLM-001"))
        .unwrap();
    assert_eq!(row.status.as_deref(), Some("pending"));
    assert!(row.processed_date.is_none());
}

#[tokio::test]
async fn test_update_status_unknown_claim() {
    let store = fixture_store();
    let engine = ClaimsEngine::new(store.clone());

    let err = engine
        .update_status("CLM-999", "approved", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let rows = store.fetch_claims().await.unwrap();
    assert!(rows.iter().all(|r| r.processed_date.is_none()));
}

#[tokio::test]
async fn test_update_notes_trims_and_persists() {
    let store = fixture_store();
    let engine = ClaimsEngine::new(store.clone());

    let record = engine
        .update_notes("CLM-001", Some("  needs provider follow-up  "))
        .await
        .unwrap();
    assert_eq!(record.processor_notes, "needs provider follow-up");

    let rows = store.fetch_claims().await.unwrap();
    let row = rows
        .iter()
        .find(|r| r.id.as_deref() == Some("CLM-001"))
        .unwrap();
    assert_eq!(row.processor_notes.as_deref(), Some("needs provider follow-up"));
}

#[tokio::test]
async fn test_update_notes_blank_clears() {
    let store = fixture_store();
    let engine = ClaimsEngine::new(store.clone());

    engine.update_notes("CLM-001", Some("first pass")).await.unwrap();
    let record = engine.update_notes("CLM-001", Some("   ")).await.unwrap();
    assert_eq!(record.processor_notes, "");

    let rows = store.fetch_claims().await.unwrap();
    let row = rows
        .iter()
        .find(|r| r.id.as_deref() == Some("CLM-001"))
        .unwrap();
    assert_eq!(row.processor_notes, None);
}

#[tokio::test]
async fn test_update_notes_unknown_claim() {
    let err = engine().update_notes("CLM-999", Some("note")).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn test_cache_serves_reads_until_refresh() {
    let store = fixture_store();
    let engine = ClaimsEngine::new(store.clone());

    // Warm the cache.
    assert_eq!(engine.summary().await.unwrap().pending_count, 1);

    // Mutate the store behind the engine's back.
    let rows = store.fetch_claims().await.unwrap();
    let row = rows
        .iter()
        .find(|r| r.id.as_deref() == Some("CLM-001"))
        .unwrap();
    let changes = plan_status_change(row, ClaimStatus::Approved, None, Utc::now());
    store.apply_status_change("CLM-001", &changes).await.unwrap();

    // Cached reads still see the old status until an explicit refresh.
    assert_eq!(engine.summary().await.unwrap().pending_count, 1);

    engine.refresh().await.unwrap();
    let summary = engine.summary().await.unwrap();
    assert_eq!(summary.pending_count, 0);
    assert_eq!(summary.approved_count, 2);
}
