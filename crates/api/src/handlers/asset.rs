//! Handlers for the `/assets` resource: assets, states, state images, and
//! the asset-side generation actions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vidu_core::asset::{
    apply_delete, apply_set_main, apply_upload, validate_asset_name, validate_state_name,
    AssetTypeFilter,
};
use vidu_core::error::CoreError;
use vidu_core::types::DbId;
use vidu_db::models::asset::{
    Asset, AssetState, CreateAsset, CreateAssetState, UpdateAsset, UpdateAssetState,
};
use vidu_db::repositories::{AssetRepo, WorkspaceRepo};
use vidu_genai::ExtractedAsset;

use crate::error::{not_found, AppResult};
use crate::middleware::rbac::RequireAssetManage;
use crate::query::ConfirmParams;
use crate::response::{DataResponse, LaunchResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct AssetListParams {
    #[serde(default, rename = "type")]
    pub type_filter: AssetTypeFilter,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: usize,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteImageParams {
    pub url: String,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub script: String,
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// GET /api/v1/assets?type=&search=
pub async fn list(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Query(params): Query<AssetListParams>,
) -> AppResult<Json<Vec<Asset>>> {
    let assets = AssetRepo::list(&state.pool, params.type_filter, &params.search).await?;
    Ok(Json(assets))
}

/// POST /api/v1/assets
///
/// The new asset is listed first and becomes the selection.
pub async fn create(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Json(input): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<Asset>)> {
    validate_asset_name(&input.name)?;
    let asset = AssetRepo::create(&state.pool, &input).await?;
    WorkspaceRepo::update(&state.pool, |ws| {
        ws.select_asset(Some(asset.id));
        Ok(())
    })
    .await?;
    tracing::info!(asset_id = asset.id, asset_type = %asset.asset_type, "Asset created");
    Ok((StatusCode::CREATED, Json(asset)))
}

/// GET /api/v1/assets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(id): Path<DbId>,
) -> AppResult<Json<Asset>> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("asset", id))?;
    Ok(Json(asset))
}

/// PUT /api/v1/assets/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<Json<Asset>> {
    if let Some(name) = &input.name {
        validate_asset_name(name)?;
    }
    let asset = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("asset", id))?;
    Ok(Json(asset))
}

/// DELETE /api/v1/assets/{id}?confirm=true
pub async fn delete(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(id): Path<DbId>,
    Query(confirm): Query<ConfirmParams>,
) -> AppResult<StatusCode> {
    confirm.require()?;
    if !AssetRepo::delete(&state.pool, id).await? {
        return Err(not_found("asset", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/assets/bulk-delete?confirm=true
pub async fn bulk_delete(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Query(confirm): Query<ConfirmParams>,
    Json(input): Json<BulkDeleteRequest>,
) -> AppResult<Json<BulkDeleteResponse>> {
    confirm.require()?;
    let deleted = AssetRepo::bulk_delete(&state.pool, &input.ids).await?;
    tracing::info!(requested = input.ids.len(), deleted, "Bulk asset delete");
    Ok(Json(BulkDeleteResponse { deleted }))
}

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// POST /api/v1/assets/{id}/states
pub async fn add_state(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(asset_id): Path<DbId>,
    Json(input): Json<CreateAssetState>,
) -> AppResult<(StatusCode, Json<AssetState>)> {
    validate_state_name(&input.name)?;
    let added = AssetRepo::add_state(&state.pool, asset_id, &input)
        .await?
        .ok_or_else(|| not_found("asset", asset_id))?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// PUT /api/v1/assets/{id}/states/{state_id}
pub async fn update_state(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path((asset_id, state_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateAssetState>,
) -> AppResult<Json<AssetState>> {
    if let Some(name) = &input.name {
        validate_state_name(name)?;
    }
    let updated = AssetRepo::update_state(&state.pool, asset_id, state_id, &input)
        .await?
        .ok_or_else(|| not_found("asset_state", state_id))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/assets/{id}/states/{state_id}?confirm=true
///
/// Removes exactly that state and closes its detail view if it was open.
pub async fn delete_state(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path((asset_id, state_id)): Path<(DbId, DbId)>,
    Query(confirm): Query<ConfirmParams>,
) -> AppResult<StatusCode> {
    confirm.require()?;
    if !AssetRepo::delete_state(&state.pool, asset_id, state_id).await? {
        return Err(not_found("asset_state", state_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// State images
// ---------------------------------------------------------------------------

/// POST /api/v1/assets/{id}/states/{state_id}/images
///
/// The uploaded image becomes the main image and heads the history.
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path((asset_id, state_id)): Path<(DbId, DbId)>,
    Json(input): Json<ImageRequest>,
) -> AppResult<Json<Asset>> {
    if input.url.trim().is_empty() {
        return Err(CoreError::Validation("Image url must not be empty".to_string()).into());
    }
    let asset = AssetRepo::modify_state(&state.pool, asset_id, state_id, |s| {
        apply_upload(&mut s.main_image_url, &mut s.thumbnail_urls, input.url.trim());
        Ok(())
    })
    .await?
    .ok_or_else(|| not_found("asset_state", state_id))?;
    Ok(Json(asset))
}

/// PUT /api/v1/assets/{id}/states/{state_id}/images/main
pub async fn set_main_image(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path((asset_id, state_id)): Path<(DbId, DbId)>,
    Json(input): Json<ImageRequest>,
) -> AppResult<Json<Asset>> {
    let asset = AssetRepo::modify_state(&state.pool, asset_id, state_id, |s| {
        apply_set_main(&mut s.main_image_url, &mut s.thumbnail_urls, &input.url)
    })
    .await?
    .ok_or_else(|| not_found("asset_state", state_id))?;
    Ok(Json(asset))
}

/// DELETE /api/v1/assets/{id}/states/{state_id}/images?url=&confirm=true
///
/// Deleting the main image promotes the first thumbnail.
pub async fn delete_image(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path((asset_id, state_id)): Path<(DbId, DbId)>,
    Query(params): Query<DeleteImageParams>,
) -> AppResult<Json<Asset>> {
    ConfirmParams {
        confirm: params.confirm,
    }
    .require()?;
    let asset = AssetRepo::modify_state(&state.pool, asset_id, state_id, |s| {
        apply_delete(&mut s.main_image_url, &mut s.thumbnail_urls, &params.url)
    })
    .await?
    .ok_or_else(|| not_found("asset_state", state_id))?;
    Ok(Json(asset))
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// POST /api/v1/assets/extract
pub async fn extract(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
) -> AppResult<LaunchResponse<()>> {
    Ok(state.engine.extract_assets().await?.into())
}

/// POST /api/v1/assets/details
pub async fn generate_details(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
) -> AppResult<LaunchResponse<()>> {
    Ok(state.engine.generate_details().await?.into())
}

/// POST /api/v1/assets/images
///
/// One-click image generation for every state with a prompt; `data` is the
/// number of states scheduled.
pub async fn generate_all_images(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
) -> AppResult<LaunchResponse<usize>> {
    Ok(state.engine.generate_all_images().await?.into())
}

/// POST /api/v1/assets/{id}/states/{state_id}/generate-image
pub async fn generate_state_image(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path((asset_id, state_id)): Path<(DbId, DbId)>,
) -> AppResult<LaunchResponse<()>> {
    Ok(state
        .engine
        .generate_state_image(asset_id, state_id)
        .await?
        .into())
}

/// POST /api/v1/assets/{id}/states/{state_id}/suggest-prompt
///
/// Ask the generative client for an image prompt from the state description
/// and store it as the state's prompt.
pub async fn suggest_prompt(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path((asset_id, state_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<AssetState>> {
    let current = AssetRepo::find_state(&state.pool, asset_id, state_id)
        .await?
        .ok_or_else(|| not_found("asset_state", state_id))?;
    let prompt = state.genai.generate_image_prompt(&current.description).await;
    let input = UpdateAssetState {
        prompt: Some(prompt),
        ..UpdateAssetState::default()
    };
    let updated = AssetRepo::update_state(&state.pool, asset_id, state_id, &input)
        .await?
        .ok_or_else(|| not_found("asset_state", state_id))?;
    Ok(Json(updated))
}

/// POST /api/v1/assets/analyze
///
/// Preview the assets the generative client finds in a script. Nothing is
/// stored.
pub async fn analyze_script(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Json(input): Json<AnalyzeRequest>,
) -> AppResult<Json<DataResponse<Vec<ExtractedAsset>>>> {
    if input.script.trim().is_empty() {
        return Err(CoreError::Validation("Script must not be empty".to_string()).into());
    }
    let assets = state.genai.analyze_script(&input.script).await?;
    Ok(Json(DataResponse { data: assets }))
}
