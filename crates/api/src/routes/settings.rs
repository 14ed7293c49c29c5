//! Route definitions for `/settings` (global agent settings).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET    /           -> get
/// PUT    /           -> save
/// GET    /options    -> options
/// POST   /preset     -> apply_preset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::get).put(settings::save))
        .route("/options", get(settings::options))
        .route("/preset", post(settings::apply_preset))
}
