//! PostgreSQL-backed claim store
//!
//! Rows are decoded column-by-column with per-type fallbacks so the engine
//! tolerates schema drift: a missing optional column, or an amount stored as
//! an integer or text, decodes to the loose `RawClaim` shape instead of
//! failing the whole load.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use claims_domain::{Provider, RawClaim, StatusChanges};

use crate::error::StoreError;
use crate::store::ClaimStore;

/// Claim store backed by the `claims` and `providers` tables
#[derive(Debug, Clone)]
pub struct PgClaimStore {
    pool: PgPool,
}

impl PgClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Reads an optional string column, absorbing missing columns
fn opt_str(row: &PgRow, column: &str) -> Option<String> {
    if let Ok(value) = row.try_get::<Option<String>, _>(column) {
        return value.filter(|s| !s.is_empty());
    }
    // Imported datasets sometimes store identifiers as integers.
    if let Ok(value) = row.try_get::<Option<i64>, _>(column) {
        return value.map(|v| v.to_string());
    }
    None
}

/// Reads an optional numeric column stored as float, integer, or text
fn opt_f64(row: &PgRow, column: &str) -> Option<f64> {
    if let Ok(value) = row.try_get::<Option<f64>, _>(column) {
        return value;
    }
    if let Ok(value) = row.try_get::<Option<f32>, _>(column) {
        return value.map(f64::from);
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(column) {
        return value.map(|v| v as f64);
    }
    if let Ok(value) = row.try_get::<Option<i32>, _>(column) {
        return value.map(f64::from);
    }
    row.try_get::<Option<String>, _>(column)
        .ok()
        .flatten()
        .and_then(|s| s.trim().parse().ok())
}

/// Reads an optional date-ish column as its canonical string form
fn opt_date_str(row: &PgRow, column: &str) -> Option<String> {
    if let Ok(value) = row.try_get::<Option<NaiveDate>, _>(column) {
        return value.map(|d| d.format("%Y-%m-%d").to_string());
    }
    if let Ok(value) = row.try_get::<Option<DateTime<Utc>>, _>(column) {
        return value.map(|ts| ts.to_rfc3339());
    }
    if let Ok(value) = row.try_get::<Option<NaiveDateTime>, _>(column) {
        return value.map(|ts| ts.format("%Y-%m-%dT%H:%M:%S").to_string());
    }
    opt_str(row, column)
}

fn claim_from_row(row: &PgRow) -> RawClaim {
    RawClaim {
        id: opt_str(row, "id"),
        claim_amount: opt_f64(row, "claim_amount"),
        approved_amount: opt_f64(row, "approved_amount"),
        claim_date: opt_date_str(row, "claim_date"),
        status: opt_str(row, "status"),
        risk_score: opt_f64(row, "risk_score"),
        days_pending: opt_f64(row, "days_pending"),
        denial_reason: opt_str(row, "denial_reason"),
        processed_date: opt_date_str(row, "processed_date"),
        provider_id: opt_str(row, "provider_id"),
        provider_name: opt_str(row, "provider_name"),
        patient_id: opt_str(row, "patient_id"),
        // Some source datasets carry the plural column name.
        procedure_code: opt_str(row, "procedure_code").or_else(|| opt_str(row, "procedure_codes")),
        diagnosis_code: opt_str(row, "diagnosis_code"),
        processor_notes: opt_str(row, "processor_notes"),
        days_to_process: opt_f64(row, "days_to_process"),
    }
}

fn provider_from_row(row: &PgRow) -> Provider {
    Provider {
        id: opt_str(row, "id").unwrap_or_default(),
        npi: opt_str(row, "npi"),
        name: opt_str(row, "name"),
        provider_type: opt_str(row, "type"),
        specialty: opt_str(row, "specialty"),
    }
}

#[async_trait]
impl ClaimStore for PgClaimStore {
    async fn fetch_claims(&self) -> Result<Vec<RawClaim>, StoreError> {
        let rows = sqlx::query("SELECT * FROM claims")
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = rows.len(), "loaded claims from store");
        Ok(rows.iter().map(claim_from_row).collect())
    }

    async fn fetch_providers(&self) -> Result<Vec<Provider>, StoreError> {
        let rows = sqlx::query("SELECT * FROM providers")
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = rows.len(), "loaded providers from store");
        Ok(rows.iter().map(provider_from_row).collect())
    }

    async fn apply_status_change(
        &self,
        claim_id: &str,
        changes: &StatusChanges,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE claims
            SET status = $2,
                processed_date = $3,
                days_to_process = $4,
                denial_reason = $5,
                approved_amount = COALESCE($6, approved_amount)
            WHERE id = $1
            "#,
        )
        .bind(claim_id)
        .bind(changes.status.as_str())
        .bind(changes.processed_date)
        .bind(changes.days_to_process)
        .bind(changes.denial_reason.as_deref())
        .bind(changes.approved_amount)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn update_notes(&self, claim_id: &str, note: Option<&str>) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE claims SET processor_notes = $2 WHERE id = $1")
            .bind(claim_id)
            .bind(note)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
