//! Asset, asset-state, and worldview entities with their DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vidu_core::asset::AssetType;
use vidu_core::types::DbId;

/// One visual variant of an asset.
#[derive(Debug, Clone, Serialize)]
pub struct AssetState {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub main_image_url: Option<String>,
    pub thumbnail_urls: Vec<String>,
    pub prompt: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl AssetState {
    pub fn has_prompt(&self) -> bool {
        self.prompt.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}

/// A character, scene, prop, or world element.
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub name: String,
    pub asset_type: AssetType,
    pub description: String,
    pub in_master_lib: bool,
    /// Cover image: main image of the first state that has one.
    pub image_url: Option<String>,
    pub states: Vec<AssetState>,
}

impl Asset {
    pub fn refresh_cover(&mut self) {
        self.image_url = self
            .states
            .iter()
            .find_map(|s| s.main_image_url.clone());
    }

    pub fn state(&self, state_id: DbId) -> Option<&AssetState> {
        self.states.iter().find(|s| s.id == state_id)
    }
}

/// DTO for creating a new asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAsset {
    pub name: String,
    pub asset_type: AssetType,
    #[serde(default)]
    pub description: String,
}

/// DTO for updating an asset. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAsset {
    pub name: Option<String>,
    pub asset_type: Option<AssetType>,
    pub description: Option<String>,
    pub in_master_lib: Option<bool>,
}

/// DTO for adding a state to an asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssetState {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// DTO for updating a state. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssetState {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prompt: Option<String>,
    pub attributes: Option<BTreeMap<String, String>>,
}

/// Faction-level visual guidance produced alongside asset extraction.
#[derive(Debug, Clone, Serialize)]
pub struct WorldviewEntry {
    pub id: DbId,
    pub faction: String,
    pub description: String,
}

/// DTO for creating or replacing worldview entries.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorldviewEntry {
    pub faction: String,
    pub description: String,
}

/// DTO for updating a worldview entry. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorldviewEntry {
    pub faction: Option<String>,
    pub description: Option<String>,
}
