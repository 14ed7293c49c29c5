//! Episodes, shots, generation errors, and video settings.

use serde::{Deserialize, Serialize};
use vidu_core::settings::{DEFAULT_VIDEO_DURATION, DEFAULT_VIDEO_RATIO, DEFAULT_VIDEO_RESOLUTION};
use vidu_core::status::GenerationStatus;
use vidu_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, Serialize)]
pub struct Shot {
    pub id: DbId,
    pub description: String,
    pub duration: f64,
    pub status: GenerationStatus,
    pub video_url: Option<String>,
    /// Every render of this shot, oldest first.
    pub video_versions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Episode {
    pub id: DbId,
    pub name: String,
    pub script_content: String,
    pub shots: Vec<Shot>,
}

impl Episode {
    pub fn shot(&self, shot_id: DbId) -> Option<&Shot> {
        self.shots.iter().find(|s| s.id == shot_id)
    }

    pub fn shot_index(&self, shot_id: DbId) -> Option<usize> {
        self.shots.iter().position(|s| s.id == shot_id)
    }
}

/// DTO for adding a shot.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShot {
    pub description: String,
    pub duration: Option<f64>,
}

/// DTO for updating a shot. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShot {
    pub description: Option<String>,
    pub duration: Option<f64>,
}

/// A failed shot render.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationError {
    pub id: DbId,
    pub shot_id: DbId,
    pub episode_name: String,
    /// 1-based position of the shot in its episode.
    pub shot_index: usize,
    pub message: String,
    pub detail: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSettings {
    pub ratio: String,
    pub resolution: String,
    pub duration: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_VIDEO_RATIO.to_string(),
            resolution: DEFAULT_VIDEO_RESOLUTION.to_string(),
            duration: DEFAULT_VIDEO_DURATION.to_string(),
        }
    }
}
