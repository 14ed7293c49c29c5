//! Back-office handlers: prompt configurations, prompt types, configuration
//! templates, users, roles, the permission catalog, and the chatbot.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vidu_core::catalog::{is_template_key, ADMIN_MODEL_OPTIONS};
use vidu_core::error::CoreError;
use vidu_core::permissions::{effective_permissions, is_known_permission, PermissionDef, PERMISSIONS};
use vidu_core::types::DbId;
use vidu_core::users::{validate_email, validate_username, UserStatus, DEFAULT_PASSWORD};
use vidu_db::models::chat::{ChatMessage, ChatSettings, UpdateChatSettings};
use vidu_db::models::prompt::{
    ConfigItem, CreateConfigItem, PromptType, TemplateConfig, UpdateConfigItem,
    UpdateTemplateSetting,
};
use vidu_db::models::user::{CreateUser, Role, UpdateUser, UserAccount};
use vidu_db::repositories::{
    ChatRepo, PromptConfigRepo, PromptTypeRepo, RoleRepo, SessionRepo, TemplateRepo, UserRepo,
};
use vidu_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{not_found, AppError, AppResult};
use crate::middleware::rbac::{
    RequirePromptRead, RequirePromptWrite, RequireRoleManage, RequireSysAdmin, RequireUserRead,
    RequireUserWrite,
};
use crate::query::ConfirmParams;
use crate::response::LaunchResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct ConfigListParams {
    /// Prompt-config code, e.g. `script_analysis`.
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub role_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: UserStatus,
}

#[derive(Debug, Deserialize)]
pub struct PermissionsRequest {
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EffectivePermissions {
    pub user_id: DbId,
    pub role_id: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

fn require_name(name: &str, what: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!("{what} name must not be empty")));
    }
    Ok(())
}

fn validate_admin_model(model: &str) -> Result<(), CoreError> {
    if !ADMIN_MODEL_OPTIONS.contains(&model) {
        return Err(CoreError::Validation(format!(
            "Unknown model '{model}'. Must be one of: {}",
            ADMIN_MODEL_OPTIONS.join(", ")
        )));
    }
    Ok(())
}

/// String-keyed records (configs, templates, roles) have no numeric id.
fn missing(entity: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{entity} with id {id} not found"))
}

// ---------------------------------------------------------------------------
// Prompt configurations
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/prompt-configs?code=
pub async fn list_configs(
    State(state): State<AppState>,
    RequirePromptRead(_user): RequirePromptRead,
    Query(params): Query<ConfigListParams>,
) -> AppResult<Json<Vec<ConfigItem>>> {
    let items = PromptConfigRepo::list(&state.pool, params.code.as_deref()).await?;
    Ok(Json(items))
}

/// POST /api/v1/admin/prompt-configs
pub async fn create_config(
    State(state): State<AppState>,
    RequirePromptWrite(_user): RequirePromptWrite,
    Json(input): Json<CreateConfigItem>,
) -> AppResult<(StatusCode, Json<ConfigItem>)> {
    require_name(&input.name, "Config")?;
    validate_admin_model(&input.model)?;
    let item = PromptConfigRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/v1/admin/prompt-configs/{id}
pub async fn update_config(
    State(state): State<AppState>,
    RequirePromptWrite(_user): RequirePromptWrite,
    Path(id): Path<String>,
    Json(input): Json<UpdateConfigItem>,
) -> AppResult<Json<ConfigItem>> {
    if let Some(name) = &input.name {
        require_name(name, "Config")?;
    }
    if let Some(model) = &input.model {
        validate_admin_model(model)?;
    }
    let item = PromptConfigRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| missing("prompt_config", &id))?;
    Ok(Json(item))
}

/// DELETE /api/v1/admin/prompt-configs/{id}?confirm=true
pub async fn delete_config(
    State(state): State<AppState>,
    RequirePromptWrite(_user): RequirePromptWrite,
    Path(id): Path<String>,
    Query(confirm): Query<ConfirmParams>,
) -> AppResult<StatusCode> {
    confirm.require()?;
    if !PromptConfigRepo::delete(&state.pool, &id).await? {
        return Err(missing("prompt_config", &id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Prompt types
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/prompt-types
pub async fn list_prompt_types(
    State(state): State<AppState>,
    RequirePromptRead(_user): RequirePromptRead,
) -> AppResult<Json<Vec<PromptType>>> {
    Ok(Json(PromptTypeRepo::list(&state.pool).await?))
}

/// POST /api/v1/admin/prompt-types/{id}/toggle
pub async fn toggle_prompt_type(
    State(state): State<AppState>,
    RequirePromptWrite(_user): RequirePromptWrite,
    Path(id): Path<DbId>,
) -> AppResult<Json<PromptType>> {
    let prompt_type = PromptTypeRepo::toggle(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("prompt_type", id))?;
    Ok(Json(prompt_type))
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/templates
pub async fn list_templates(
    State(state): State<AppState>,
    RequirePromptRead(_user): RequirePromptRead,
) -> AppResult<Json<Vec<TemplateConfig>>> {
    Ok(Json(TemplateRepo::list(&state.pool).await?))
}

/// GET /api/v1/admin/templates/current
pub async fn current_template(
    State(state): State<AppState>,
    RequirePromptRead(_user): RequirePromptRead,
) -> AppResult<Json<TemplateConfig>> {
    Ok(Json(TemplateRepo::current(&state.pool).await?))
}

/// POST /api/v1/admin/templates/{id}/select
pub async fn select_template(
    State(state): State<AppState>,
    RequirePromptWrite(_user): RequirePromptWrite,
    Path(id): Path<String>,
) -> AppResult<Json<TemplateConfig>> {
    let template = TemplateRepo::select(&state.pool, &id)
        .await?
        .ok_or_else(|| missing("template", &id))?;
    Ok(Json(template))
}

/// POST /api/v1/admin/templates
///
/// Deep-copies the current template's settings and makes the copy current.
pub async fn create_template(
    State(state): State<AppState>,
    RequirePromptWrite(_user): RequirePromptWrite,
    Json(input): Json<NameRequest>,
) -> AppResult<(StatusCode, Json<TemplateConfig>)> {
    require_name(&input.name, "Template")?;
    let template = TemplateRepo::create(&state.pool, input.name.trim()).await?;
    tracing::info!(template_id = %template.id, "Template created");
    Ok((StatusCode::CREATED, Json(template)))
}

/// PUT /api/v1/admin/templates/current/settings/{key}
pub async fn update_template_setting(
    State(state): State<AppState>,
    RequirePromptWrite(_user): RequirePromptWrite,
    Path(key): Path<String>,
    Json(input): Json<UpdateTemplateSetting>,
) -> AppResult<Json<TemplateConfig>> {
    if !is_template_key(&key) {
        return Err(CoreError::Validation(format!("Unknown template key '{key}'")).into());
    }
    if let Some(model) = &input.model {
        validate_admin_model(model)?;
    }
    if let Some(prompt_id) = &input.prompt_id {
        PromptConfigRepo::find_by_id(&state.pool, prompt_id)
            .await?
            .ok_or_else(|| missing("prompt_config", prompt_id))?;
    }
    let template = TemplateRepo::update_setting(&state.pool, &key, &input)
        .await?
        .ok_or_else(|| missing("template_setting", &key))?;
    Ok(Json(template))
}

/// DELETE /api/v1/admin/templates/{id}?confirm=true
///
/// The last remaining template cannot be deleted.
pub async fn delete_template(
    State(state): State<AppState>,
    RequirePromptWrite(_user): RequirePromptWrite,
    Path(id): Path<String>,
    Query(confirm): Query<ConfirmParams>,
) -> AppResult<StatusCode> {
    confirm.require()?;
    if !TemplateRepo::delete(&state.pool, &id).await? {
        return Err(missing("template", &id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn require_role(pool: &DbPool, role_id: &str) -> AppResult<Role> {
    RoleRepo::find_by_id(pool, role_id)
        .await?
        .ok_or_else(|| CoreError::Validation(format!("Unknown role '{role_id}'")).into())
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireUserRead(_user): RequireUserRead,
) -> AppResult<Json<Vec<UserAccount>>> {
    Ok(Json(UserRepo::list(&state.pool).await?))
}

/// POST /api/v1/admin/users
///
/// New accounts are active, have never logged in, and get the default
/// password.
pub async fn create_user(
    State(state): State<AppState>,
    RequireUserWrite(admin): RequireUserWrite,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserAccount>)> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;
    require_role(&state.pool, &input.role_id).await?;

    let password_hash = hash_password(DEFAULT_PASSWORD)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username.trim().to_string(),
            email: input.email.trim().to_string(),
            role_id: input.role_id,
            password_hash: Some(password_hash),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireUserWrite(_admin): RequireUserWrite,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<UserAccount>> {
    if let Some(username) = &input.username {
        validate_username(username)?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    if let Some(role_id) = &input.role_id {
        require_role(&state.pool, role_id).await?;
    }
    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("user", id))?;
    Ok(Json(user))
}

/// DELETE /api/v1/admin/users/{id}?confirm=true
///
/// An administrator cannot delete their own account.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireUserWrite(admin): RequireUserWrite,
    Path(id): Path<DbId>,
    Query(confirm): Query<ConfirmParams>,
) -> AppResult<StatusCode> {
    confirm.require()?;
    if id == admin.user_id {
        return Err(CoreError::Conflict("Cannot delete your own account".to_string()).into());
    }
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(not_found("user", id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    state.ws_manager.close_user(id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/admin/users/{id}/status
///
/// Deactivating an account ends its sessions.
pub async fn set_user_status(
    State(state): State<AppState>,
    RequireUserWrite(_admin): RequireUserWrite,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<UserAccount>> {
    let user = UserRepo::set_status(&state.pool, id, input.status)
        .await?
        .ok_or_else(|| not_found("user", id))?;
    if input.status == UserStatus::Inactive {
        SessionRepo::revoke_all_for_user(&state.pool, id).await?;
        state.ws_manager.close_user(id).await;
    }
    tracing::info!(user_id = id, status = %input.status, "User status changed");
    Ok(Json(user))
}

/// PUT /api/v1/admin/users/{id}/permissions
///
/// Replace the extra permissions granted on top of the role.
pub async fn set_user_permissions(
    State(state): State<AppState>,
    RequireUserWrite(_admin): RequireUserWrite,
    Path(id): Path<DbId>,
    Json(input): Json<PermissionsRequest>,
) -> AppResult<Json<UserAccount>> {
    if let Some(unknown) = input.permissions.iter().find(|p| !is_known_permission(p)) {
        return Err(CoreError::Validation(format!("Unknown permission '{unknown}'")).into());
    }
    let permissions = effective_permissions(&[], &input.permissions);
    let user = UserRepo::set_permissions(&state.pool, id, permissions)
        .await?
        .ok_or_else(|| not_found("user", id))?;
    Ok(Json(user))
}

/// GET /api/v1/admin/users/{id}/effective-permissions
pub async fn user_effective_permissions(
    State(state): State<AppState>,
    RequireUserRead(_admin): RequireUserRead,
    Path(id): Path<DbId>,
) -> AppResult<Json<EffectivePermissions>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("user", id))?;
    let role_permissions = RoleRepo::find_by_id(&state.pool, &user.role_id)
        .await?
        .map(|r| r.permissions)
        .unwrap_or_default();
    Ok(Json(EffectivePermissions {
        user_id: user.id,
        permissions: effective_permissions(&role_permissions, &user.permissions),
        role_id: user.role_id,
    }))
}

// ---------------------------------------------------------------------------
// Roles and permission catalog
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/roles
pub async fn list_roles(
    State(state): State<AppState>,
    RequireRoleManage(_user): RequireRoleManage,
) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(RoleRepo::list(&state.pool).await?))
}

/// POST /api/v1/admin/roles
pub async fn create_role(
    State(state): State<AppState>,
    RequireRoleManage(_user): RequireRoleManage,
    Json(input): Json<NameRequest>,
) -> AppResult<(StatusCode, Json<Role>)> {
    require_name(&input.name, "Role")?;
    let role = RoleRepo::create(&state.pool, input.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// POST /api/v1/admin/roles/{id}/permissions/{permission}
///
/// Grants the permission if the role lacks it, revokes it otherwise.
pub async fn toggle_role_permission(
    State(state): State<AppState>,
    RequireRoleManage(_user): RequireRoleManage,
    Path((id, permission)): Path<(String, String)>,
) -> AppResult<Json<Role>> {
    if !is_known_permission(&permission) {
        return Err(CoreError::Validation(format!("Unknown permission '{permission}'")).into());
    }
    let role = RoleRepo::toggle_permission(&state.pool, &id, &permission)
        .await?
        .ok_or_else(|| missing("role", &id))?;
    Ok(Json(role))
}

/// GET /api/v1/admin/permissions
pub async fn permission_catalog(
    RequireRoleManage(_user): RequireRoleManage,
) -> Json<&'static [PermissionDef]> {
    Json(PERMISSIONS)
}

// ---------------------------------------------------------------------------
// Chatbot
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/chat/messages
pub async fn chat_messages(
    State(state): State<AppState>,
    RequireSysAdmin(_user): RequireSysAdmin,
) -> AppResult<Json<Vec<ChatMessage>>> {
    Ok(Json(ChatRepo::messages(&state.pool).await?))
}

/// POST /api/v1/admin/chat/messages
///
/// `data` is the stored user message; the model reply arrives later.
pub async fn send_chat(
    State(state): State<AppState>,
    RequireSysAdmin(_user): RequireSysAdmin,
    Json(input): Json<ChatRequest>,
) -> AppResult<LaunchResponse<ChatMessage>> {
    Ok(state.engine.send_chat(&input.text).await?.into())
}

/// GET /api/v1/admin/chat/settings
pub async fn chat_settings(
    State(state): State<AppState>,
    RequireSysAdmin(_user): RequireSysAdmin,
) -> AppResult<Json<ChatSettings>> {
    Ok(Json(ChatRepo::settings(&state.pool).await?))
}

/// PUT /api/v1/admin/chat/settings
pub async fn update_chat_settings(
    State(state): State<AppState>,
    RequireSysAdmin(_user): RequireSysAdmin,
    Json(input): Json<UpdateChatSettings>,
) -> AppResult<Json<ChatSettings>> {
    if let Some(model) = &input.model {
        validate_admin_model(model)?;
    }
    Ok(Json(ChatRepo::update_settings(&state.pool, &input).await?))
}
