//! Handlers for the worldview (faction guidance) entries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use vidu_core::types::DbId;
use vidu_db::models::asset::{CreateWorldviewEntry, UpdateWorldviewEntry, WorldviewEntry};
use vidu_db::repositories::WorldviewRepo;

use crate::error::{not_found, AppResult};
use crate::middleware::rbac::RequireAssetManage;
use crate::query::ConfirmParams;
use crate::state::AppState;

/// GET /api/v1/worldview
pub async fn list(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
) -> AppResult<Json<Vec<WorldviewEntry>>> {
    Ok(Json(WorldviewRepo::list(&state.pool).await?))
}

/// PUT /api/v1/worldview
pub async fn replace(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Json(entries): Json<Vec<CreateWorldviewEntry>>,
) -> AppResult<Json<Vec<WorldviewEntry>>> {
    Ok(Json(WorldviewRepo::replace_all(&state.pool, &entries).await?))
}

/// PUT /api/v1/worldview/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorldviewEntry>,
) -> AppResult<Json<WorldviewEntry>> {
    let entry = WorldviewRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("worldview_entry", id))?;
    Ok(Json(entry))
}

/// DELETE /api/v1/worldview/{id}?confirm=true
pub async fn delete(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(id): Path<DbId>,
    Query(confirm): Query<ConfirmParams>,
) -> AppResult<StatusCode> {
    confirm.require()?;
    if !WorldviewRepo::delete(&state.pool, id).await? {
        return Err(not_found("worldview_entry", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
