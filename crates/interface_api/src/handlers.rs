//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use claims_domain::{CollectionSummary, ProviderMetrics};
use claims_engine::{ClaimsList, ListParams, RiskAnalysis};

use crate::dto::*;
use crate::{error::ApiError, AppState};

/// Liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Aggregate counts over the full collection
pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<CollectionSummary>, ApiError> {
    let summary = state.engine.summary().await?;
    Ok(Json(summary))
}

/// Lists claims with status/date filters and offset pagination
pub async fn list_claims(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ClaimsList>, ApiError> {
    let list = state.engine.list_claims(&params).await?;
    Ok(Json(list))
}

/// Gets one claim with its quick stats
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClaimDetailResponse>, ApiError> {
    let (claim, quick_stats) = state.engine.claim(&id).await?;
    Ok(Json(ClaimDetailResponse { claim, quick_stats }))
}

/// Applies a reviewer's status decision
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    let (claim, quick_stats) = state
        .engine
        .update_status(&id, &request.status, request.reason.as_deref())
        .await?;
    Ok(Json(StatusUpdateResponse {
        success: true,
        claim,
        quick_stats,
    }))
}

/// Replaces the processor notes on one claim
pub async fn update_notes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateNotesRequest>,
) -> Result<Json<NotesUpdateResponse>, ApiError> {
    let claim = state
        .engine
        .update_notes(&id, request.note.as_deref())
        .await?;
    Ok(Json(NotesUpdateResponse {
        success: true,
        claim,
    }))
}

/// Per-provider aggregate metrics
pub async fn provider_metrics(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProviderMetrics>>, ApiError> {
    let metrics = state.engine.provider_metrics().await?;
    Ok(Json(metrics))
}

/// Risk distribution and the highest-risk claims
pub async fn risk_analysis(State(state): State<AppState>) -> Result<Json<RiskAnalysis>, ApiError> {
    let analysis = state.engine.risk_analysis(10).await?;
    Ok(Json(analysis))
}
