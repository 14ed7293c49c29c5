//! Route definitions for the back office under `/admin`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /prompt-configs                          -> list_configs (?code=)
/// POST   /prompt-configs                          -> create_config
/// PUT    /prompt-configs/{id}                     -> update_config
/// DELETE /prompt-configs/{id}                     -> delete_config
///
/// GET    /prompt-types                            -> list_prompt_types
/// POST   /prompt-types/{id}/toggle                -> toggle_prompt_type
///
/// GET    /templates                               -> list_templates
/// POST   /templates                               -> create_template
/// GET    /templates/current                       -> current_template
/// PUT    /templates/current/settings/{key}        -> update_template_setting
/// POST   /templates/{id}/select                   -> select_template
/// DELETE /templates/{id}                          -> delete_template
///
/// GET    /users                                   -> list_users
/// POST   /users                                   -> create_user
/// PUT    /users/{id}                              -> update_user
/// DELETE /users/{id}                              -> delete_user
/// PUT    /users/{id}/status                       -> set_user_status
/// PUT    /users/{id}/permissions                  -> set_user_permissions
/// GET    /users/{id}/effective-permissions        -> user_effective_permissions
///
/// GET    /roles                                   -> list_roles
/// POST   /roles                                   -> create_role
/// POST   /roles/{id}/permissions/{permission}     -> toggle_role_permission
/// GET    /permissions                             -> permission_catalog
///
/// GET    /chat/messages                           -> chat_messages
/// POST   /chat/messages                           -> send_chat
/// GET    /chat/settings                           -> chat_settings
/// PUT    /chat/settings                           -> update_chat_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/prompt-configs",
            get(admin::list_configs).post(admin::create_config),
        )
        .route(
            "/prompt-configs/{id}",
            put(admin::update_config).delete(admin::delete_config),
        )
        .route("/prompt-types", get(admin::list_prompt_types))
        .route("/prompt-types/{id}/toggle", post(admin::toggle_prompt_type))
        .route(
            "/templates",
            get(admin::list_templates).post(admin::create_template),
        )
        .route("/templates/current", get(admin::current_template))
        .route(
            "/templates/current/settings/{key}",
            put(admin::update_template_setting),
        )
        .route("/templates/{id}/select", post(admin::select_template))
        .route("/templates/{id}", delete(admin::delete_template))
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/users/{id}/status", put(admin::set_user_status))
        .route("/users/{id}/permissions", put(admin::set_user_permissions))
        .route(
            "/users/{id}/effective-permissions",
            get(admin::user_effective_permissions),
        )
        .route("/roles", get(admin::list_roles).post(admin::create_role))
        .route(
            "/roles/{id}/permissions/{permission}",
            post(admin::toggle_role_permission),
        )
        .route("/permissions", get(admin::permission_catalog))
        .route(
            "/chat/messages",
            get(admin::chat_messages).post(admin::send_chat),
        )
        .route(
            "/chat/settings",
            get(admin::chat_settings).put(admin::update_chat_settings),
        )
}
