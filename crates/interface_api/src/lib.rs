//! HTTP API Layer
//!
//! This crate provides the REST API for the claims review engine using Axum.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, config::ApiConfig};
//!
//! let app = create_router(engine, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use claims_engine::ClaimsEngine;

use crate::config::ApiConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ClaimsEngine>,
    pub config: ApiConfig,
}

/// Creates the main API router
pub fn create_router(engine: Arc<ClaimsEngine>, config: ApiConfig) -> Router {
    let state = AppState { engine, config };

    let claims_routes = Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/", get(handlers::list_claims))
        .route("/:id", get(handlers::get_claim))
        .route("/:id/status", put(handlers::update_status))
        .route("/:id/notes", put(handlers::update_notes));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .route("/providers", get(handlers::provider_metrics))
        .route("/analytics/risks", get(handlers::risk_analysis));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
