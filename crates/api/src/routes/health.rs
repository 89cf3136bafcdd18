use axum::extract::State;
use axum::{routing::get, Json, Router};
use crm_core::entity::EntityKind;
use crm_db::backend::FetchParams;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Configured record backend (`memory` or `http`).
    pub backend: &'static str,
    /// Whether the record backend answered a probe query.
    pub backend_healthy: bool,
}

/// GET /health -- returns service and record backend health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let probe = FetchParams::for_kind(EntityKind::Company).with_limit(1);
    let backend_healthy = state
        .backend
        .fetch(EntityKind::Company.table(), &probe)
        .await
        .is_ok();

    let status = if backend_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        backend: state.config.backend.name(),
        backend_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
