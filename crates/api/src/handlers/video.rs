//! Handlers for episodes, shots, shot rendering, the generation error log,
//! video settings, and the export to the editor.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vidu_core::error::CoreError;
use vidu_core::generation::GenerationKey;
use vidu_core::navigation::MainTab;
use vidu_core::settings::validate_video_settings;
use vidu_core::status::GenerationStatus;
use vidu_core::storyboard::validate_shot_duration;
use vidu_core::types::DbId;
use vidu_db::models::episode::{
    CreateShot, Episode, GenerationError, Shot, UpdateShot, VideoSettings,
};
use vidu_db::models::timeline::TimelineClip;
use vidu_db::repositories::{
    EpisodeRepo, GenerationErrorRepo, TimelineRepo, VideoSettingsRepo, WorkspaceRepo,
};
use vidu_events::{event_types, StudioEvent};
use vidu_pipeline::EpisodeMode;

use crate::error::{not_found, AppResult};
use crate::middleware::rbac::RequireVideoGen;
use crate::query::ConfirmParams;
use crate::response::LaunchResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateScriptRequest {
    pub script_content: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectVersionRequest {
    pub url: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateEpisodeRequest {
    #[serde(default)]
    pub mode: EpisodeMode,
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub cleared: usize,
}

// ---------------------------------------------------------------------------
// Episodes
// ---------------------------------------------------------------------------

/// GET /api/v1/episodes
pub async fn list_episodes(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
) -> AppResult<Json<Vec<Episode>>> {
    Ok(Json(EpisodeRepo::list(&state.pool).await?))
}

/// GET /api/v1/episodes/{id}
pub async fn get_episode(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
    Path(id): Path<DbId>,
) -> AppResult<Json<Episode>> {
    let episode = EpisodeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("episode", id))?;
    Ok(Json(episode))
}

/// PUT /api/v1/episodes/{id}/script
pub async fn update_script(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateScriptRequest>,
) -> AppResult<Json<Episode>> {
    let episode = EpisodeRepo::update_script(&state.pool, id, &input.script_content)
        .await?
        .ok_or_else(|| not_found("episode", id))?;
    Ok(Json(episode))
}

// ---------------------------------------------------------------------------
// Shots
// ---------------------------------------------------------------------------

/// POST /api/v1/episodes/{id}/shots
pub async fn add_shot(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
    Path(episode_id): Path<DbId>,
    Json(input): Json<CreateShot>,
) -> AppResult<(StatusCode, Json<Shot>)> {
    if let Some(duration) = input.duration {
        validate_shot_duration(duration)?;
    }
    let shot = EpisodeRepo::add_shot(&state.pool, episode_id, &input)
        .await?
        .ok_or_else(|| not_found("episode", episode_id))?;
    Ok((StatusCode::CREATED, Json(shot)))
}

/// PUT /api/v1/episodes/{id}/shots/{shot_id}
pub async fn update_shot(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
    Path((episode_id, shot_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateShot>,
) -> AppResult<Json<Shot>> {
    if let Some(duration) = input.duration {
        validate_shot_duration(duration)?;
    }
    let shot = EpisodeRepo::update_shot(&state.pool, episode_id, shot_id, &input)
        .await?
        .ok_or_else(|| not_found("shot", shot_id))?;
    Ok(Json(shot))
}

/// DELETE /api/v1/episodes/{id}/shots/{shot_id}?confirm=true
///
/// A render still in flight for the shot is cancelled first.
pub async fn delete_shot(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
    Path((episode_id, shot_id)): Path<(DbId, DbId)>,
    Query(confirm): Query<ConfirmParams>,
) -> AppResult<StatusCode> {
    confirm.require()?;
    state
        .engine
        .cancel(GenerationKey::Shot(shot_id))
        .await?;
    if !EpisodeRepo::delete_shot(&state.pool, episode_id, shot_id).await? {
        return Err(not_found("shot", shot_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/episodes/{id}/shots/{shot_id}/version
pub async fn select_version(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
    Path((episode_id, shot_id)): Path<(DbId, DbId)>,
    Json(input): Json<SelectVersionRequest>,
) -> AppResult<Json<Shot>> {
    let shot = EpisodeRepo::select_version(&state.pool, episode_id, shot_id, &input.url)
        .await?
        .ok_or_else(|| not_found("shot", shot_id))?;
    Ok(Json(shot))
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// POST /api/v1/episodes/{id}/storyboard
pub async fn generate_storyboard(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
    Path(episode_id): Path<DbId>,
) -> AppResult<LaunchResponse<()>> {
    Ok(state.engine.generate_storyboard(episode_id).await?.into())
}

/// POST /api/v1/episodes/{id}/shots/{shot_id}/generate
///
/// Also the retry of a shot in `ERROR`.
pub async fn generate_shot(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
    Path((episode_id, shot_id)): Path<(DbId, DbId)>,
) -> AppResult<LaunchResponse<()>> {
    Ok(state.engine.generate_shot(episode_id, shot_id).await?.into())
}

/// POST /api/v1/episodes/{id}/generate
///
/// `data` is the number of shots scheduled.
pub async fn generate_episode(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
    Path(episode_id): Path<DbId>,
    Json(input): Json<GenerateEpisodeRequest>,
) -> AppResult<LaunchResponse<usize>> {
    tracing::debug!(episode_id, mode = ?input.mode, "Episode render requested");
    Ok(state
        .engine
        .generate_episode(episode_id, input.mode)
        .await?
        .into())
}

// ---------------------------------------------------------------------------
// Error log
// ---------------------------------------------------------------------------

/// GET /api/v1/generation-errors
pub async fn list_errors(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
) -> AppResult<Json<Vec<GenerationError>>> {
    Ok(Json(GenerationErrorRepo::list(&state.pool).await?))
}

/// DELETE /api/v1/generation-errors/{id}
pub async fn clear_error(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !GenerationErrorRepo::delete(&state.pool, id).await? {
        return Err(not_found("generation_error", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/generation-errors
pub async fn clear_errors(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
) -> AppResult<Json<ClearedResponse>> {
    let cleared = GenerationErrorRepo::clear(&state.pool).await?;
    Ok(Json(ClearedResponse { cleared }))
}

// ---------------------------------------------------------------------------
// Video settings
// ---------------------------------------------------------------------------

/// GET /api/v1/video-settings
pub async fn get_video_settings(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
) -> AppResult<Json<VideoSettings>> {
    Ok(Json(VideoSettingsRepo::get(&state.pool).await?))
}

/// PUT /api/v1/video-settings
pub async fn update_video_settings(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
    Json(input): Json<VideoSettings>,
) -> AppResult<Json<VideoSettings>> {
    validate_video_settings(&input.ratio, &input.resolution, &input.duration)?;
    Ok(Json(VideoSettingsRepo::update(&state.pool, input).await?))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// POST /api/v1/episodes/{id}/export
///
/// Completed shots replace the editor's clip list, in shot order, and the
/// workspace switches to the editor.
pub async fn export_to_editor(
    State(state): State<AppState>,
    RequireVideoGen(user): RequireVideoGen,
    Path(episode_id): Path<DbId>,
) -> AppResult<Json<Vec<TimelineClip>>> {
    let episode = EpisodeRepo::find_by_id(&state.pool, episode_id)
        .await?
        .ok_or_else(|| not_found("episode", episode_id))?;
    let completed: Vec<Shot> = episode
        .shots
        .into_iter()
        .filter(|s| s.status == GenerationStatus::Completed)
        .collect();
    if completed.is_empty() {
        return Err(CoreError::Validation("No completed shots to export".to_string()).into());
    }

    let clips = TimelineRepo::replace_from_shots(&state.pool, &completed).await?;
    WorkspaceRepo::update(&state.pool, |ws| {
        ws.current_tab = MainTab::Editor;
        Ok(())
    })
    .await?;

    tracing::info!(episode_id, clips = clips.len(), "Exported episode to editor");
    state.event_bus.publish(
        StudioEvent::new(event_types::TIMELINE_EXPORTED)
            .with_entity("episode", episode_id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({ "clips": clips.len() })),
    );
    Ok(Json(clips))
}
