//! Handlers for the `/auth` resource (login, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vidu_core::error::CoreError;
use vidu_core::permissions::effective_permissions;
use vidu_core::types::DbId;
use vidu_core::users::UserStatus;
use vidu_db::models::user::UserAccount;
use vidu_db::repositories::{RoleRepo, SessionRepo, UserRepo, WorkspaceRepo};
use vidu_events::{event_types, StudioEvent};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "用户名或密码错误";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info returned by login and `/auth/me`.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub permissions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Unknown users, accounts without a
/// password, and wrong passwords all get the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    if user.status == UserStatus::Inactive {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;
    let password_valid = verify_password(&input.password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(username = %user.username, "Rejected login");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    let issued = generate_access_token(user.id, &user.role_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    SessionRepo::create(&state.pool, &issued.jti, user.id, issued.expires_at).await?;
    UserRepo::record_login(&state.pool, user.id).await?;
    WorkspaceRepo::update(&state.pool, |ws| {
        ws.logged_in = true;
        Ok(())
    })
    .await?;

    tracing::info!(user_id = user.id, "User logged in");
    let user = user_info(&state, user).await?;
    Ok(Json(AuthResponse {
        access_token: issued.token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user,
    }))
}

/// POST /api/v1/auth/logout
///
/// Ends the session, returns the studio to the project picker, and cancels
/// every generation still in flight.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke(&state.pool, &auth.jti).await?;
    state.ws_manager.close_session(&auth.jti).await;
    WorkspaceRepo::reset(&state.pool).await?;
    let cancelled = state.engine.cancel_all().await?;
    state.event_bus.publish(
        StudioEvent::new(event_types::SESSION_ENDED)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "cancelled": cancelled.len() })),
    );
    tracing::info!(user_id = auth.user_id, cancelled = cancelled.len(), "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserInfo>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    Ok(Json(user_info(&state, user).await?))
}

async fn user_info(state: &AppState, user: UserAccount) -> AppResult<UserInfo> {
    let role_permissions = RoleRepo::find_by_id(&state.pool, &user.role_id)
        .await?
        .map(|r| r.permissions)
        .unwrap_or_default();
    Ok(UserInfo {
        id: user.id,
        permissions: effective_permissions(&role_permissions, &user.permissions),
        username: user.username,
        email: user.email,
        role: user.role_id,
    })
}
