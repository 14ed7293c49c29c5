//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vidu_core::error::CoreError;
use vidu_core::permissions::effective_permissions;
use vidu_core::types::DbId;
use vidu_core::users::UserStatus;
use vidu_db::repositories::{RoleRepo, SessionRepo, UserRepo};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the `Authorization: Bearer` header.
///
/// The token must be valid, its session must not have been revoked, and the
/// account must still exist and be active. Permissions are resolved on
/// every request, so role edits apply immediately.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Role code (e.g. `"ADMIN"`).
    pub role: String,
    /// Session id of the presented token.
    pub jti: String,
    /// Role permissions plus extra grants.
    pub permissions: Vec<String>,
}

impl AuthUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        if !SessionRepo::is_active(&state.pool, &claims.jti, claims.sub).await? {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Session has ended. Log in again.".into(),
            )));
        }

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
        if user.status == UserStatus::Inactive {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is deactivated".into(),
            )));
        }

        let role_permissions = RoleRepo::find_by_id(&state.pool, &user.role_id)
            .await?
            .map(|r| r.permissions)
            .unwrap_or_default();

        Ok(AuthUser {
            user_id: user.id,
            permissions: effective_permissions(&role_permissions, &user.permissions),
            role: user.role_id,
            jti: claims.jti,
        })
    }
}
