//! Repository for the editor timeline.

use crate::models::episode::Shot;
use crate::models::timeline::TimelineClip;
use crate::{DbError, Store};

pub struct TimelineRepo;

impl TimelineRepo {
    pub async fn list(store: &Store) -> Result<Vec<TimelineClip>, DbError> {
        Ok(store.read().await.timeline.clone())
    }

    /// Replace the timeline with one clip per shot that has a video, in order.
    pub async fn replace_from_shots(
        store: &Store,
        shots: &[Shot],
    ) -> Result<Vec<TimelineClip>, DbError> {
        let clips: Vec<TimelineClip> = shots
            .iter()
            .filter_map(|shot| {
                shot.video_url.as_ref().map(|url| TimelineClip {
                    id: store.next_id(),
                    shot_id: shot.id,
                    video_url: url.clone(),
                    duration: shot.duration,
                    thumbnail: None,
                })
            })
            .collect();
        store.write().await.timeline = clips.clone();
        Ok(clips)
    }
}
