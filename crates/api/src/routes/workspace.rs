//! Route definitions for `/workspace`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::workspace;
use crate::state::AppState;

/// Routes mounted at `/workspace`.
///
/// ```text
/// GET    /              -> get
/// PUT    /navigation    -> navigate
/// PUT    /theme         -> set_theme
/// PUT    /selection     -> select_asset
/// PUT    /open-state    -> open_state
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workspace::get))
        .route("/navigation", put(workspace::navigate))
        .route("/theme", put(workspace::set_theme))
        .route("/selection", put(workspace::select_asset))
        .route("/open-state", put(workspace::open_state))
}
