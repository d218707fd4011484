//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/readyz` - Readiness probe (runs a trivial query against storage)

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use coilstock_core::storage::StatsFilter;

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting
/// connections; does not touch storage.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /readyz - Readiness probe.
///
/// Runs an unfiltered aggregate query against the active repository.
/// Returns 200 when storage answers, 503 when it doesn't.
#[axum::debug_handler]
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match state.coils.get_stats(&StatsFilter::default()).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "healthy": true }))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "healthy": false,
                "error": e.to_string(),
            })),
        ),
    }
}
