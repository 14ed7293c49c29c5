//! Handlers for inspecting and cancelling in-flight mock generations.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use vidu_core::generation::GenerationKey;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub key: GenerationKey,
}

#[derive(Debug, Serialize)]
pub struct CancelledResponse {
    pub cancelled: Vec<GenerationKey>,
}

/// GET /api/v1/generations
pub async fn in_flight(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Json<Vec<GenerationKey>> {
    Json(state.engine.registry().keys().await)
}

/// POST /api/v1/generations/cancel
///
/// Cancelling a batch key also cancels the records it scheduled.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<CancelRequest>,
) -> AppResult<Json<CancelledResponse>> {
    let cancelled = state.engine.cancel(input.key).await?;
    Ok(Json(CancelledResponse { cancelled }))
}

/// POST /api/v1/generations/cancel-all
pub async fn cancel_all(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<CancelledResponse>> {
    let cancelled = state.engine.cancel_all().await?;
    Ok(Json(CancelledResponse { cancelled }))
}
