//! Request/response DTOs
//!
//! Domain types already serialize in their wire shape; the DTOs here cover
//! only the request bodies and the envelopes that add fields on top.

use serde::{Deserialize, Serialize};

use claims_domain::{ClaimRecord, QuickStats};

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNotesRequest {
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClaimDetailResponse {
    pub claim: ClaimRecord,
    pub quick_stats: QuickStats,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub claim: ClaimRecord,
    pub quick_stats: QuickStats,
}

#[derive(Debug, Serialize)]
pub struct NotesUpdateResponse {
    pub success: bool,
    pub claim: ClaimRecord,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
