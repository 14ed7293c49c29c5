//! Route definitions for `/generations`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Routes mounted at `/generations`.
///
/// ```text
/// GET    /              -> in_flight
/// POST   /cancel        -> cancel
/// POST   /cancel-all    -> cancel_all
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(generation::in_flight))
        .route("/cancel", post(generation::cancel))
        .route("/cancel-all", post(generation::cancel_all))
}
