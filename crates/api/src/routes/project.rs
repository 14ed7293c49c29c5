//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                            -> list
/// POST   /                            -> create
/// POST   /convert                     -> convert
/// GET    /conversions/{id}            -> get_conversion
/// POST   /conversions/{id}/project    -> create_from_conversion
/// GET    /{id}                        -> get_by_id
/// PUT    /{id}                        -> update
/// DELETE /{id}                        -> delete
/// POST   /{id}/select                 -> select
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/convert", post(project::convert))
        .route("/conversions/{id}", get(project::get_conversion))
        .route(
            "/conversions/{id}/project",
            post(project::create_from_conversion),
        )
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/select", post(project::select))
}
