//! Handlers for the studio shell: navigation, theme, and detail selection.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use vidu_core::error::CoreError;
use vidu_core::navigation::{validate_tab_change, AssetSubTab, MainTab, Theme};
use vidu_core::types::DbId;
use vidu_db::models::workspace::Workspace;
use vidu_db::repositories::{AssetRepo, WorkspaceRepo};

use crate::error::{not_found, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub tab: MainTab,
    pub asset_sub_tab: Option<AssetSubTab>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub theme: Theme,
}

#[derive(Debug, Deserialize)]
pub struct SelectAssetRequest {
    pub asset_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct OpenStateRequest {
    pub state_id: Option<DbId>,
}

/// GET /api/v1/workspace
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<Workspace>> {
    Ok(Json(WorkspaceRepo::get(&state.pool).await?))
}

/// PUT /api/v1/workspace/navigation
///
/// Every tab but the project picker needs a current project.
pub async fn navigate(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<NavigateRequest>,
) -> AppResult<Json<Workspace>> {
    let workspace = WorkspaceRepo::update(&state.pool, |ws| {
        validate_tab_change(input.tab, ws.current_project_id.is_some())?;
        ws.current_tab = input.tab;
        if let Some(sub_tab) = input.asset_sub_tab {
            ws.asset_sub_tab = sub_tab;
        }
        Ok(())
    })
    .await?;
    Ok(Json(workspace))
}

/// PUT /api/v1/workspace/theme
pub async fn set_theme(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<ThemeRequest>,
) -> AppResult<Json<Workspace>> {
    let workspace = WorkspaceRepo::update(&state.pool, |ws| {
        ws.theme = input.theme;
        Ok(())
    })
    .await?;
    Ok(Json(workspace))
}

/// PUT /api/v1/workspace/selection
///
/// Select an asset (or clear the selection). Changing the asset closes the
/// open state detail view.
pub async fn select_asset(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<SelectAssetRequest>,
) -> AppResult<Json<Workspace>> {
    if let Some(id) = input.asset_id {
        AssetRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| not_found("asset", id))?;
    }
    let workspace = WorkspaceRepo::update(&state.pool, |ws| {
        ws.select_asset(input.asset_id);
        Ok(())
    })
    .await?;
    Ok(Json(workspace))
}

/// PUT /api/v1/workspace/open-state
///
/// Open the detail view of a state of the selected asset, or close it.
pub async fn open_state(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<OpenStateRequest>,
) -> AppResult<Json<Workspace>> {
    if let Some(state_id) = input.state_id {
        let selected = WorkspaceRepo::get(&state.pool)
            .await?
            .selected_asset_id
            .ok_or_else(|| CoreError::Validation("Select an asset first".to_string()))?;
        AssetRepo::find_state(&state.pool, selected, state_id)
            .await?
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "State {state_id} does not belong to the selected asset"
                ))
            })?;
    }
    let workspace = WorkspaceRepo::update(&state.pool, |ws| {
        ws.open_state_id = input.state_id;
        Ok(())
    })
    .await?;
    Ok(Json(workspace))
}
