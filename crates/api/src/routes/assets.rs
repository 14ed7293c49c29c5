//! Route definitions for the `/assets` and `/worldview` resources.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{asset, worldview};
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /                                              -> list
/// POST   /                                              -> create
/// POST   /bulk-delete                                   -> bulk_delete
/// POST   /extract                                       -> extract
/// POST   /details                                       -> generate_details
/// POST   /images                                        -> generate_all_images
/// POST   /analyze                                       -> analyze_script
/// GET    /{id}                                          -> get_by_id
/// PUT    /{id}                                          -> update
/// DELETE /{id}                                          -> delete
///
/// POST   /{id}/states                                   -> add_state
/// PUT    /{id}/states/{state_id}                        -> update_state
/// DELETE /{id}/states/{state_id}                        -> delete_state
/// POST   /{id}/states/{state_id}/images                 -> upload_image
/// DELETE /{id}/states/{state_id}/images                 -> delete_image
/// PUT    /{id}/states/{state_id}/images/main            -> set_main_image
/// POST   /{id}/states/{state_id}/generate-image         -> generate_state_image
/// POST   /{id}/states/{state_id}/suggest-prompt         -> suggest_prompt
/// ```
pub fn router() -> Router<AppState> {
    let state_routes = Router::new()
        .route("/", post(asset::add_state))
        .route(
            "/{state_id}",
            put(asset::update_state).delete(asset::delete_state),
        )
        .route(
            "/{state_id}/images",
            post(asset::upload_image).delete(asset::delete_image),
        )
        .route("/{state_id}/images/main", put(asset::set_main_image))
        .route(
            "/{state_id}/generate-image",
            post(asset::generate_state_image),
        )
        .route("/{state_id}/suggest-prompt", post(asset::suggest_prompt));

    Router::new()
        .route("/", get(asset::list).post(asset::create))
        .route("/bulk-delete", post(asset::bulk_delete))
        .route("/extract", post(asset::extract))
        .route("/details", post(asset::generate_details))
        .route("/images", post(asset::generate_all_images))
        .route("/analyze", post(asset::analyze_script))
        .route(
            "/{id}",
            get(asset::get_by_id)
                .put(asset::update)
                .delete(asset::delete),
        )
        .nest("/{id}/states", state_routes)
}

/// Routes mounted at `/worldview`.
///
/// ```text
/// GET    /        -> list
/// PUT    /        -> replace
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn worldview_router() -> Router<AppState> {
    Router::new()
        .route("/", get(worldview::list).put(worldview::replace))
        .route("/{id}", put(worldview::update).delete(worldview::delete))
}
