//! Coil CRUD handlers.
//!
//! Thin translations from HTTP to the lifecycle service; all invariant
//! enforcement lives in the core crate.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use coilstock_core::coil::Coil;
use coilstock_core::storage::CoilFilter;

use crate::{
    handlers::AppError,
    models::{DeleteCoilQuery, RegisterCoil, UpdateCoil},
    state::AppState,
};

/// Register a new coil (POST /api/coils).
pub async fn register_coil(
    State(state): State<AppState>,
    Json(body): Json<RegisterCoil>,
) -> Result<impl IntoResponse, AppError> {
    let coil = state.coils.register_coil(body.weight, body.length).await?;
    Ok((StatusCode::CREATED, Json(coil)))
}

/// Get a coil by id, soft-deleted or not (GET /api/coils/{id}).
pub async fn get_coil(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Coil>, AppError> {
    let coil = state.coils.get_coil(id).await?;
    Ok(Json(coil))
}

/// List coils with optional range filters (GET /api/coils).
///
/// `?active=true` restricts the listing to coils that have not been
/// soft-deleted. An empty result is an empty list.
pub async fn list_coils(
    State(state): State<AppState>,
    Query(filter): Query<CoilFilter>,
) -> Result<Json<Vec<Coil>>, AppError> {
    let coils = state.coils.list_coils(&filter).await?;
    Ok(Json(coils))
}

/// Partially update a coil (PATCH /api/coils/{id}).
pub async fn update_coil(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCoil>,
) -> Result<Json<Coil>, AppError> {
    let coil = state.coils.update_coil(id, body.into()).await?;
    Ok(Json(coil))
}

/// Delete a coil (DELETE /api/coils/{id}?mode=soft|hard, default soft).
///
/// Returns the coil as it was immediately before the operation's
/// irreversible effect.
pub async fn delete_coil(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteCoilQuery>,
) -> Result<Json<Coil>, AppError> {
    let coil = state.coils.delete_coil(id, query.mode).await?;
    Ok(Json(coil))
}
