//! Aggregate statistics handler.

use axum::{
    extract::{Query, State},
    Json,
};

use coilstock_core::coil::AggregateStats;
use coilstock_core::storage::StatsFilter;

use crate::{handlers::AppError, state::AppState};

/// Aggregate statistics over an optional time window
/// (GET /api/statistics/coils).
///
/// An empty selection yields zero-valued aggregates, not an error.
pub async fn coil_stats(
    State(state): State<AppState>,
    Query(filter): Query<StatsFilter>,
) -> Result<Json<AggregateStats>, AppError> {
    let stats = state.coils.get_stats(&filter).await?;
    Ok(Json(stats))
}
