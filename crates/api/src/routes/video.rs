//! Route definitions for episodes, shots, the generation error log, video
//! settings, and the editor timeline.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{editor, video};
use crate::state::AppState;

/// Routes mounted at `/episodes`.
///
/// ```text
/// GET    /                                   -> list_episodes
/// GET    /{id}                               -> get_episode
/// PUT    /{id}/script                        -> update_script
/// POST   /{id}/storyboard                    -> generate_storyboard
/// POST   /{id}/generate                      -> generate_episode
/// POST   /{id}/export                        -> export_to_editor
/// POST   /{id}/shots                         -> add_shot
/// PUT    /{id}/shots/{shot_id}               -> update_shot
/// DELETE /{id}/shots/{shot_id}               -> delete_shot
/// PUT    /{id}/shots/{shot_id}/version       -> select_version
/// POST   /{id}/shots/{shot_id}/generate      -> generate_shot
/// ```
pub fn episode_router() -> Router<AppState> {
    Router::new()
        .route("/", get(video::list_episodes))
        .route("/{id}", get(video::get_episode))
        .route("/{id}/script", put(video::update_script))
        .route("/{id}/storyboard", post(video::generate_storyboard))
        .route("/{id}/generate", post(video::generate_episode))
        .route("/{id}/export", post(video::export_to_editor))
        .route("/{id}/shots", post(video::add_shot))
        .route(
            "/{id}/shots/{shot_id}",
            put(video::update_shot).delete(video::delete_shot),
        )
        .route("/{id}/shots/{shot_id}/version", put(video::select_version))
        .route("/{id}/shots/{shot_id}/generate", post(video::generate_shot))
}

/// Routes mounted at `/generation-errors`.
///
/// ```text
/// GET    /        -> list_errors
/// DELETE /        -> clear_errors
/// DELETE /{id}    -> clear_error
/// ```
pub fn error_router() -> Router<AppState> {
    Router::new()
        .route("/", get(video::list_errors).delete(video::clear_errors))
        .route("/{id}", delete(video::clear_error))
}

/// Routes mounted at `/video-settings`.
pub fn settings_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(video::get_video_settings).put(video::update_video_settings),
    )
}

/// Routes mounted at `/editor`.
pub fn editor_router() -> Router<AppState> {
    Router::new().route("/timeline", get(editor::timeline))
}
