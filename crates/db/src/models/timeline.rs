use serde::Serialize;
use vidu_core::types::DbId;

/// A clip on the editor timeline.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineClip {
    pub id: DbId,
    pub shot_id: DbId,
    pub video_url: String,
    pub duration: f64,
    pub thumbnail: Option<String>,
}
