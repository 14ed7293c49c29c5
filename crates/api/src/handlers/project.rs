//! Handlers for the `/projects` resource and script conversions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use vidu_core::error::CoreError;
use vidu_core::navigation::MainTab;
use vidu_core::project::{
    new_project_name, resolve_draft_content, validate_project_name, validate_script_content,
    DraftKind, ScriptType,
};
use vidu_core::types::DbId;
use vidu_db::models::project::{CreateProject, Project, ScriptConversion, UpdateProject};
use vidu_db::repositories::{ProjectRepo, ScriptConversionRepo, WorkspaceRepo};
use vidu_db::DbPool;
use vidu_events::{event_types, StudioEvent};

use crate::error::{not_found, AppResult};
use crate::middleware::rbac::RequireAssetManage;
use crate::query::ConfirmParams;
use crate::response::LaunchResponse;
use crate::state::AppState;

/// Body of the project creation dialog.
#[derive(Debug, Deserialize)]
pub struct ProjectDraft {
    pub script_type: DraftKind,
    #[serde(default)]
    pub script_content: String,
    pub uploaded_file_name: Option<String>,
    /// Commentary only: the text is already a finished script.
    #[serde(default)]
    pub pre_written: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub content: String,
    pub uploaded_file_name: Option<String>,
}

/// POST /api/v1/projects
///
/// Create a project from a plot or a pre-written commentary. A commentary
/// that still needs writing goes through `/projects/convert` first.
pub async fn create(
    State(state): State<AppState>,
    RequireAssetManage(user): RequireAssetManage,
    Json(draft): Json<ProjectDraft>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if draft.script_type.needs_conversion(draft.pre_written) {
        return Err(CoreError::Validation(
            "Commentary drafts must be converted into a script first".to_string(),
        )
        .into());
    }
    let content = resolve_draft_content(&draft.script_content, draft.uploaded_file_name.as_deref());
    validate_script_content(&content)?;

    let project = open_new_project(&state, draft.script_type.stored_type(), content, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// POST /api/v1/projects/convert
///
/// Start the mock commentary-to-script conversion. Empty content is a no-op.
pub async fn convert(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Json(input): Json<ConvertRequest>,
) -> AppResult<LaunchResponse<ScriptConversion>> {
    let content = resolve_draft_content(&input.content, input.uploaded_file_name.as_deref());
    Ok(state.engine.convert_script(&content).await?.into())
}

/// GET /api/v1/projects/conversions/{id}
pub async fn get_conversion(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(id): Path<DbId>,
) -> AppResult<Json<ScriptConversion>> {
    let conversion = ScriptConversionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("script_conversion", id))?;
    Ok(Json(conversion))
}

/// POST /api/v1/projects/conversions/{id}/project
///
/// Create the project from a completed conversion. Each conversion yields
/// at most one project.
pub async fn create_from_conversion(
    State(state): State<AppState>,
    RequireAssetManage(user): RequireAssetManage,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let name = new_project_name(Utc::now().date_naive());
    let project = ScriptConversionRepo::create_project(&state.pool, id, &name).await?;
    announce_project(&state, &project, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
) -> AppResult<Json<Vec<Project>>> {
    Ok(Json(ProjectRepo::list(&state.pool).await?))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("project", id))?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    if let Some(name) = &input.name {
        validate_project_name(name)?;
    }
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("project", id))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}?confirm=true
pub async fn delete(
    State(state): State<AppState>,
    RequireAssetManage(user): RequireAssetManage,
    Path(id): Path<DbId>,
    Query(confirm): Query<ConfirmParams>,
) -> AppResult<StatusCode> {
    confirm.require()?;
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(not_found("project", id));
    }
    state.event_bus.publish(
        StudioEvent::new(event_types::PROJECT_DELETED)
            .with_entity("project", id)
            .with_actor(user.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/select
///
/// Make the project current and jump to the asset section.
pub async fn select(
    State(state): State<AppState>,
    RequireAssetManage(_user): RequireAssetManage,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("project", id))?;
    make_current(&state.pool, id).await?;
    Ok(Json(project))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert a dated project at the head of the list and open it.
async fn open_new_project(
    state: &AppState,
    script_type: ScriptType,
    script_content: String,
    actor: DbId,
) -> AppResult<Project> {
    let input = CreateProject {
        name: new_project_name(Utc::now().date_naive()),
        script_type,
        script_content,
    };
    let project = ProjectRepo::create(&state.pool, &input).await?;
    announce_project(state, &project, actor).await?;
    Ok(project)
}

/// Open a freshly created project and publish its creation.
async fn announce_project(state: &AppState, project: &Project, actor: DbId) -> AppResult<()> {
    make_current(&state.pool, project.id).await?;
    tracing::info!(project_id = project.id, script_type = %project.script_type, "Project created");
    state.event_bus.publish(
        StudioEvent::new(event_types::PROJECT_CREATED)
            .with_entity("project", project.id)
            .with_actor(actor),
    );
    Ok(())
}

async fn make_current(pool: &DbPool, project_id: DbId) -> AppResult<()> {
    WorkspaceRepo::update(pool, |ws| {
        ws.current_project_id = Some(project_id);
        ws.current_tab = MainTab::Assets;
        Ok(())
    })
    .await?;
    Ok(())
}
