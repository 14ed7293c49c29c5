//! Master-library item and its DTO.

use serde::{Deserialize, Serialize};
use vidu_core::types::{DbId, Timestamp};

/// A state published to the shared master library.
#[derive(Debug, Clone, Serialize)]
pub struct MasterLibraryItem {
    /// `"{asset_id}-{state_id}"`, unique within the library.
    pub uid: String,
    pub asset_id: DbId,
    pub state_id: DbId,
    pub name: String,
    pub style: String,
    pub description: String,
    pub image_url: String,
    pub created_at: Timestamp,
}

/// DTO for editing a library item. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMasterLibraryItem {
    pub name: Option<String>,
    pub style: Option<String>,
    pub description: Option<String>,
}
