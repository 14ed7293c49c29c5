//! Route definitions for `/master-library`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::master_library;
use crate::state::AppState;

/// Routes mounted at `/master-library`.
///
/// ```text
/// GET    /              -> view (seeds on first view)
/// GET    /candidates    -> candidates
/// GET    /unsynced      -> unsynced
/// GET    /ready         -> ready
/// GET    /comparison    -> comparison (?sort=)
/// GET    /stats         -> stats
/// GET    /search        -> search (?q=)
/// POST   /sync          -> sync
/// POST   /batch-sync    -> batch_sync
/// PUT    /{uid}         -> update
/// DELETE /{uid}         -> remove
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(master_library::view))
        .route("/candidates", get(master_library::candidates))
        .route("/unsynced", get(master_library::unsynced))
        .route("/ready", get(master_library::ready))
        .route("/comparison", get(master_library::comparison))
        .route("/stats", get(master_library::stats))
        .route("/search", get(master_library::search))
        .route("/sync", post(master_library::sync))
        .route("/batch-sync", post(master_library::batch_sync))
        .route(
            "/{uid}",
            put(master_library::update).delete(master_library::remove),
        )
}
