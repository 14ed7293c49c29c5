//! Permission-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose effective
//! permissions lack the one it guards. Use them in handler signatures to
//! enforce authorization at the type level:
//!
//! ```ignore
//! async fn generate(RequireVideoGen(user): RequireVideoGen) -> AppResult<Json<()>> {
//!     Ok(Json(()))
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vidu_core::error::CoreError;
use vidu_core::permissions;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

macro_rules! permission_extractor {
    ($(#[$meta:meta])* $name:ident => $permission:path) => {
        $(#[$meta])*
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                if !user.has_permission($permission) {
                    return Err(AppError::Core(CoreError::Forbidden(format!(
                        "Permission {} required",
                        $permission
                    ))));
                }
                Ok($name(user))
            }
        }
    };
}

permission_extractor!(
    /// Projects, assets, master library, and global settings.
    RequireAssetManage => permissions::ASSET_MANAGE
);
permission_extractor!(
    /// Episodes, shots, and the editor timeline.
    RequireVideoGen => permissions::VIDEO_GEN
);
permission_extractor!(RequirePromptRead => permissions::PROMPT_READ);
permission_extractor!(RequirePromptWrite => permissions::PROMPT_WRITE);
permission_extractor!(RequireUserRead => permissions::USER_READ);
permission_extractor!(RequireUserWrite => permissions::USER_WRITE);
permission_extractor!(RequireRoleManage => permissions::ROLE_MANAGE);
permission_extractor!(
    /// System-level back-office features (chatbot).
    RequireSysAdmin => permissions::SYS_ADMIN
);

/// Requires any authenticated user.
///
/// Functionally equivalent to [`AuthUser`] but self-documenting in route
/// handlers whose only requirement is a live session.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
