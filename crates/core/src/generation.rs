//! Mock generation constants: keys, delays, stagger offsets, and placeholder URLs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Identity of one in-flight generation. Single-record keys block a second
/// start on the same record; batch keys block a re-entrant batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum GenerationKey {
    ScriptConversion(DbId),
    ExtractAssets,
    AssetDetails,
    StateImage(DbId),
    AllImages,
    Storyboard(DbId),
    Shot(DbId),
    EpisodeBatch(DbId),
    ChatReply,
}

impl GenerationKey {
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::AllImages | Self::EpisodeBatch(_))
    }
}

impl std::fmt::Display for GenerationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScriptConversion(id) => write!(f, "script_conversion:{id}"),
            Self::ExtractAssets => f.write_str("extract_assets"),
            Self::AssetDetails => f.write_str("asset_details"),
            Self::StateImage(id) => write!(f, "state_image:{id}"),
            Self::AllImages => f.write_str("all_images"),
            Self::Storyboard(id) => write!(f, "storyboard:{id}"),
            Self::Shot(id) => write!(f, "shot:{id}"),
            Self::EpisodeBatch(id) => write!(f, "episode_batch:{id}"),
            Self::ChatReply => f.write_str("chat_reply"),
        }
    }
}

// ---------------------------------------------------------------------------
// Delays (milliseconds, before time scaling)
// ---------------------------------------------------------------------------

pub const SCRIPT_CONVERSION_MS: u64 = 1500;
pub const EXTRACT_ASSETS_MS: u64 = 1000;
pub const ASSET_DETAILS_MS: u64 = 1500;
pub const STATE_IMAGE_MS: u64 = 2000;
pub const ALL_IMAGES_MS: u64 = 2000;
pub const STORYBOARD_MS: u64 = 2000;
pub const SHOT_VIDEO_MS: u64 = 3000;
pub const CHAT_REPLY_MS: u64 = 1000;

/// Extra delay added per position in a batch.
pub const IMAGE_STAGGER_MS: u64 = 250;
pub const SHOT_STAGGER_MS: u64 = 500;

/// Scale a base delay. Non-finite or negative scales collapse to zero.
pub fn scaled(base_ms: u64, scale: f64) -> Duration {
    if !scale.is_finite() || scale <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(base_ms as f64 * scale / 1000.0)
}

/// Delay of the `index`-th item of a staggered batch.
pub fn staggered(base_ms: u64, stagger_ms: u64, index: usize, scale: f64) -> Duration {
    scaled(base_ms + stagger_ms * index as u64, scale)
}

// ---------------------------------------------------------------------------
// Placeholder images
// ---------------------------------------------------------------------------

const PICSUM: &str = "https://picsum.photos/seed";

/// Main image assigned by the one-click batch.
pub fn batch_main_image_url(state_id: DbId) -> String {
    format!("{PICSUM}/{state_id}/800/600")
}

/// The four thumbnails assigned by the one-click batch, `n` in `1..=4`.
pub fn batch_thumbnail_urls(state_id: DbId) -> Vec<String> {
    (1..=crate::asset::BATCH_THUMBNAIL_COUNT)
        .map(|n| format!("{PICSUM}/{state_id}{n}/200/200"))
        .collect()
}

/// Image produced by regenerating a single state.
pub fn regenerated_image_url(state_id: DbId, revision: u64) -> String {
    format!("{PICSUM}/{state_id}-{revision}/800/600")
}
