//! Handlers for the shared master library and its diff against local
//! asset states.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use vidu_core::asset::{AssetType, AssetTypeFilter};
use vidu_core::diff::{compare, diff_stats, item_name, item_uid, ComparisonRow, DiffStats, SortOrder};
use vidu_core::error::CoreError;
use vidu_core::style::detect_style;
use vidu_core::types::DbId;
use vidu_db::models::asset::Asset;
use vidu_db::models::master_library::{MasterLibraryItem, UpdateMasterLibraryItem};
use vidu_db::repositories::{AssetRepo, MasterLibraryRepo};
use vidu_db::DbPool;
use vidu_events::{event_types, StudioEvent};

use crate::error::{not_found, AppError, AppResult};
use crate::middleware::rbac::RequireAssetManage;
use crate::query::{ConfirmParams, SearchParams};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// One local asset state that could be published to the library.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub uid: String,
    pub asset_id: DbId,
    pub state_id: DbId,
    pub asset_name: String,
    pub state_name: String,
    pub asset_type: AssetType,
    pub description: String,
    pub main_image_url: Option<String>,
}

impl Candidate {
    /// Library item for this candidate, or `None` without a main image.
    fn to_item(&self, style: &str) -> Option<MasterLibraryItem> {
        let image_url = self.main_image_url.clone()?;
        Some(MasterLibraryItem {
            uid: self.uid.clone(),
            asset_id: self.asset_id,
            state_id: self.state_id,
            name: item_name(&self.asset_name, &self.state_name),
            style: style.to_string(),
            description: self.description.clone(),
            image_url,
            created_at: Utc::now(),
        })
    }
}

/// Every (asset, state) pair, in asset then state order.
fn candidates_of(assets: &[Asset]) -> Vec<Candidate> {
    assets
        .iter()
        .flat_map(|asset| {
            asset.states.iter().map(move |s| Candidate {
                uid: item_uid(asset.id, s.id),
                asset_id: asset.id,
                state_id: s.id,
                asset_name: asset.name.clone(),
                state_name: s.name.clone(),
                asset_type: asset.asset_type,
                description: s.description.clone(),
                main_image_url: s.main_image_url.clone(),
            })
        })
        .collect()
}

/// Library items for the first state of each flagged asset that has a
/// main image.
fn initial_items(assets: &[Asset]) -> Vec<MasterLibraryItem> {
    let mut rng = rand::rng();
    assets
        .iter()
        .filter(|a| a.in_master_lib)
        .filter_map(|a| {
            let first = candidates_of(std::slice::from_ref(a)).into_iter().next()?;
            first.to_item(detect_style(a.asset_type, &mut rng))
        })
        .collect()
}

async fn load_candidates(pool: &DbPool) -> AppResult<Vec<Candidate>> {
    let assets = AssetRepo::list(pool, AssetTypeFilter::All, "").await?;
    Ok(candidates_of(&assets))
}

async fn synced_uids(pool: &DbPool) -> AppResult<Vec<String>> {
    Ok(MasterLibraryRepo::list(pool)
        .await?
        .into_iter()
        .map(|i| i.uid)
        .collect())
}

async fn unsynced_candidates(pool: &DbPool) -> AppResult<Vec<Candidate>> {
    let synced = synced_uids(pool).await?;
    let mut candidates = load_candidates(pool).await?;
    candidates.retain(|c| !synced.contains(&c.uid));
    Ok(candidates)
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct ComparisonParams {
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub asset_id: DbId,
    pub state_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct BatchSyncResponse {
    pub synced: usize,
    pub items: Vec<MasterLibraryItem>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/master-library
///
/// The first view of an empty library seeds it from flagged assets.
pub async fn view(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
) -> AppResult<Json<Vec<MasterLibraryItem>>> {
    if MasterLibraryRepo::seed_on_first_view(&state.pool, initial_items).await? {
        tracing::info!("Master library seeded from flagged assets");
    }
    Ok(Json(MasterLibraryRepo::list(&state.pool).await?))
}

/// GET /api/v1/master-library/candidates
pub async fn candidates(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
) -> AppResult<Json<Vec<Candidate>>> {
    Ok(Json(load_candidates(&state.pool).await?))
}

/// GET /api/v1/master-library/unsynced
pub async fn unsynced(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
) -> AppResult<Json<Vec<Candidate>>> {
    Ok(Json(unsynced_candidates(&state.pool).await?))
}

/// GET /api/v1/master-library/ready
pub async fn ready(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
) -> AppResult<Json<Vec<Candidate>>> {
    let mut ready = unsynced_candidates(&state.pool).await?;
    ready.retain(|c| c.main_image_url.is_some());
    Ok(Json(ready))
}

/// GET /api/v1/master-library/comparison?sort=UNSYNCED_FIRST|SYNCED_FIRST
pub async fn comparison(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Query(params): Query<ComparisonParams>,
) -> AppResult<Json<Vec<ComparisonRow<Candidate, MasterLibraryItem>>>> {
    let locals = load_candidates(&state.pool)
        .await?
        .into_iter()
        .map(|c| (c.uid.clone(), c))
        .collect();
    let masters = MasterLibraryRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|i| (i.uid.clone(), i))
        .collect();
    Ok(Json(compare(locals, masters, params.sort)))
}

/// GET /api/v1/master-library/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
) -> AppResult<Json<DiffStats>> {
    let locals = load_candidates(&state.pool)
        .await?
        .into_iter()
        .map(|c| (c.uid, ()))
        .collect();
    let masters: Vec<(String, ())> = synced_uids(&state.pool)
        .await?
        .into_iter()
        .map(|uid| (uid, ()))
        .collect();
    let master_total = masters.len();
    let rows = compare(locals, masters, SortOrder::default());
    Ok(Json(diff_stats(&rows, master_total)))
}

/// POST /api/v1/master-library/sync
pub async fn sync(
    State(state): State<AppState>,
    RequireAssetManage(user): RequireAssetManage,
    Json(input): Json<SyncRequest>,
) -> AppResult<(StatusCode, Json<MasterLibraryItem>)> {
    let asset = AssetRepo::find_by_id(&state.pool, input.asset_id)
        .await?
        .ok_or_else(|| not_found("asset", input.asset_id))?;
    let candidate = candidates_of(std::slice::from_ref(&asset))
        .into_iter()
        .find(|c| c.state_id == input.state_id)
        .ok_or_else(|| not_found("asset_state", input.state_id))?;

    let style = detect_style(asset.asset_type, &mut rand::rng());
    let item = candidate.to_item(style).ok_or_else(|| {
        CoreError::Validation("Only states with a main image can be synced".to_string())
    })?;
    let item = MasterLibraryRepo::insert(&state.pool, item).await?;

    state.event_bus.publish(
        StudioEvent::new(event_types::MASTER_LIBRARY_SYNCED)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({ "uids": [item.uid] })),
    );
    Ok((StatusCode::CREATED, Json(item)))
}

/// POST /api/v1/master-library/batch-sync
///
/// Publishes every unsynced state that has a main image. With nothing
/// ready the library is left as it was.
pub async fn batch_sync(
    State(state): State<AppState>,
    RequireAssetManage(user): RequireAssetManage,
) -> AppResult<Json<BatchSyncResponse>> {
    let ready = unsynced_candidates(&state.pool).await?;
    let items: Vec<MasterLibraryItem> = {
        let mut rng = rand::rng();
        ready
            .iter()
            .filter_map(|c| c.to_item(detect_style(c.asset_type, &mut rng)))
            .collect()
    };
    if items.is_empty() {
        return Ok(Json(BatchSyncResponse {
            synced: 0,
            items,
        }));
    }

    let items = MasterLibraryRepo::insert_many(&state.pool, items).await?;
    let uids: Vec<&str> = items.iter().map(|i| i.uid.as_str()).collect();
    tracing::info!(count = items.len(), "Batch synced to master library");
    state.event_bus.publish(
        StudioEvent::new(event_types::MASTER_LIBRARY_SYNCED)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({ "uids": uids })),
    );
    Ok(Json(BatchSyncResponse {
        synced: items.len(),
        items,
    }))
}

/// PUT /api/v1/master-library/{uid}
pub async fn update(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(uid): Path<String>,
    Json(input): Json<UpdateMasterLibraryItem>,
) -> AppResult<Json<MasterLibraryItem>> {
    let item = MasterLibraryRepo::update(&state.pool, &uid, &input)
        .await?
        .ok_or_else(|| missing_item(&uid))?;
    Ok(Json(item))
}

/// DELETE /api/v1/master-library/{uid}?confirm=true
///
/// The local asset is left untouched.
pub async fn remove(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(uid): Path<String>,
    Query(confirm): Query<ConfirmParams>,
) -> AppResult<StatusCode> {
    confirm.require()?;
    if !MasterLibraryRepo::delete(&state.pool, &uid).await? {
        return Err(missing_item(&uid));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/master-library/search?q=
pub async fn search(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<MasterLibraryItem>>> {
    Ok(Json(MasterLibraryRepo::search(&state.pool, &params.q).await?))
}

fn missing_item(uid: &str) -> AppError {
    AppError::NotFound(format!("master_library_item with uid {uid} not found"))
}

#[cfg(test)]
mod tests {
    use vidu_db::models::asset::AssetState;

    use super::*;

    fn asset(id: DbId, flagged: bool, images: &[Option<&str>]) -> Asset {
        Asset {
            id,
            name: format!("资产{id}"),
            asset_type: AssetType::Scene,
            description: String::new(),
            in_master_lib: flagged,
            image_url: None,
            states: images
                .iter()
                .enumerate()
                .map(|(i, url)| AssetState {
                    id: id * 10 + i as DbId,
                    name: format!("状态{i}"),
                    description: "描述".to_string(),
                    main_image_url: url.map(str::to_string),
                    thumbnail_urls: Vec::new(),
                    prompt: None,
                    attributes: Default::default(),
                })
                .collect(),
        }
    }

    #[test]
    fn candidates_cover_every_state() {
        let assets = vec![asset(1, false, &[None, Some("a")]), asset(2, false, &[None])];
        let uids: Vec<String> = candidates_of(&assets).into_iter().map(|c| c.uid).collect();
        assert_eq!(uids, vec!["1-10", "1-11", "2-20"]);
    }

    #[test]
    fn initial_items_use_first_state_of_flagged_assets() {
        let assets = vec![
            asset(1, true, &[Some("a"), Some("b")]),
            asset(2, true, &[None, Some("c")]),
            asset(3, false, &[Some("d")]),
        ];
        let items = initial_items(&assets);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].uid, "1-10");
        assert_eq!(items[0].name, "资产1 - 状态0");
        assert_eq!(items[0].style, "电影质感");
    }
}
