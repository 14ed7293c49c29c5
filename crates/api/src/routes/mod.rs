pub mod admin;
pub mod assets;
pub mod auth;
pub mod generation;
pub mod health;
pub mod master_library;
pub mod project;
pub mod settings;
pub mod video;
pub mod workspace;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                   WebSocket (studio events)
///
/// /auth/login                           login (public)
/// /auth/logout                          logout
/// /auth/me                              current user
///
/// /workspace                            navigation, theme, selection
///
/// /projects                             list, create
/// /projects/convert                     commentary conversion (202)
/// /projects/conversions/{id}            conversion status, create project
/// /projects/{id}                        get, update, delete, select
///
/// /assets                               list, create, bulk delete
/// /assets/{extract,details,images}      mock generation (202)
/// /assets/analyze                       generative script analysis
/// /assets/{id}/states/...               states, images, prompts
/// /worldview                            faction guidance
///
/// /master-library                       view, diff, sync, edit
///
/// /settings                             global agent settings, presets
///
/// /episodes                             episodes, shots, rendering, export
/// /generation-errors                    render error log
/// /video-settings                       ratio, resolution, duration
/// /editor/timeline                      clips and layout
///
/// /generations                          in-flight keys, cancellation
///
/// /admin/...                            prompts, templates, users, roles, chat
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket relay of the event bus.
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/workspace", workspace::router())
        .nest("/projects", project::router())
        .nest("/assets", assets::router())
        .nest("/worldview", assets::worldview_router())
        .nest("/master-library", master_library::router())
        .nest("/settings", settings::router())
        .nest("/episodes", video::episode_router())
        .nest("/generation-errors", video::error_router())
        .nest("/video-settings", video::settings_router())
        .nest("/editor", video::editor_router())
        .nest("/generations", generation::router())
        // Back office.
        .nest("/admin", admin::router())
}
