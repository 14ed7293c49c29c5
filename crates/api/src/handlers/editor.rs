//! Handler for the editor timeline.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use vidu_core::timeline::{layout, TimelineLayout};
use vidu_db::models::timeline::TimelineClip;
use vidu_db::repositories::TimelineRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireVideoGen;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TimelineView {
    pub clips: Vec<TimelineClip>,
    pub layout: TimelineLayout,
}

/// GET /api/v1/editor/timeline
///
/// With no clips the layout is empty and `connected` is false.
pub async fn timeline(
    State(state): State<AppState>,
    RequireVideoGen(_user): RequireVideoGen,
) -> AppResult<Json<TimelineView>> {
    let clips = TimelineRepo::list(&state.pool).await?;
    let durations: Vec<f64> = clips.iter().map(|c| c.duration).collect();
    Ok(Json(TimelineView {
        layout: layout(&durations),
        clips,
    }))
}
