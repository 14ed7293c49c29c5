//! Asset types, creation fallbacks, list filtering, and state image history.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Character,
    Scene,
    Prop,
    World,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "CHARACTER",
            Self::Scene => "SCENE",
            Self::Prop => "PROP",
            Self::World => "WORLD",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type filter of the asset list; `All` passes everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetTypeFilter {
    #[default]
    All,
    Character,
    Scene,
    Prop,
    World,
}

impl AssetTypeFilter {
    pub fn matches(&self, asset_type: AssetType) -> bool {
        match self {
            Self::All => true,
            Self::Character => asset_type == AssetType::Character,
            Self::Scene => asset_type == AssetType::Scene,
            Self::Prop => asset_type == AssetType::Prop,
            Self::World => asset_type == AssetType::World,
        }
    }
}

pub const DEFAULT_ASSET_DESCRIPTION: &str = "手动创建的资产";
pub const DEFAULT_STATE_NAME: &str = "常规状态";
pub const DEFAULT_STATE_DESCRIPTION: &str = "初始状态";
pub const DEFAULT_ADDED_STATE_DESCRIPTION: &str = "新添加的状态";

/// Maximum number of thumbnails kept after a single-image regeneration.
pub const MAX_THUMBNAIL_HISTORY: usize = 8;

/// Number of thumbnails produced by the one-click batch.
pub const BATCH_THUMBNAIL_COUNT: usize = 4;

/// Case-insensitive substring match on a name. An empty term matches everything.
pub fn name_matches(name: &str, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || name.to_lowercase().contains(&term.to_lowercase())
}

pub fn validate_asset_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Asset name must not be empty".to_string()));
    }
    Ok(())
}

pub fn validate_state_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("State name must not be empty".to_string()));
    }
    Ok(())
}

/// Trimmed description, or `fallback` when blank.
pub fn description_or(description: &str, fallback: &str) -> String {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

// -- image history operations --

/// An uploaded image becomes the main image and heads the thumbnail list.
pub fn apply_upload(main: &mut Option<String>, thumbnails: &mut Vec<String>, url: &str) {
    *main = Some(url.to_string());
    thumbnails.insert(0, url.to_string());
}

/// A regenerated image becomes the main image; history is capped.
pub fn apply_regenerated(main: &mut Option<String>, thumbnails: &mut Vec<String>, url: &str) {
    *main = Some(url.to_string());
    thumbnails.insert(0, url.to_string());
    thumbnails.truncate(MAX_THUMBNAIL_HISTORY);
}

/// Swap `url` in as the main image. It leaves the thumbnails and the previous
/// main image is appended to them.
pub fn apply_set_main(
    main: &mut Option<String>,
    thumbnails: &mut Vec<String>,
    url: &str,
) -> Result<(), CoreError> {
    if main.as_deref() == Some(url) {
        return Ok(());
    }
    let pos = thumbnails
        .iter()
        .position(|t| t == url)
        .ok_or_else(|| CoreError::Validation(format!("Image {url} is not in this state's history")))?;
    thumbnails.remove(pos);
    if let Some(old) = main.take() {
        thumbnails.push(old);
    }
    *main = Some(url.to_string());
    Ok(())
}

/// Delete an image. Deleting the main image promotes the first thumbnail.
pub fn apply_delete(
    main: &mut Option<String>,
    thumbnails: &mut Vec<String>,
    url: &str,
) -> Result<(), CoreError> {
    if main.as_deref() == Some(url) {
        *main = if thumbnails.is_empty() {
            None
        } else {
            Some(thumbnails.remove(0))
        };
        return Ok(());
    }
    let pos = thumbnails
        .iter()
        .position(|t| t == url)
        .ok_or_else(|| CoreError::Validation(format!("Image {url} is not in this state's history")))?;
    thumbnails.remove(pos);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn urls(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn filter_all_passes_everything() {
        assert!(AssetTypeFilter::All.matches(AssetType::World));
        assert!(AssetTypeFilter::Prop.matches(AssetType::Prop));
        assert!(!AssetTypeFilter::Prop.matches(AssetType::Scene));
    }

    #[test]
    fn name_match_is_case_insensitive() {
        assert!(name_matches("Kael (主角)", "kael"));
        assert!(name_matches("Kael (主角)", ""));
        assert!(!name_matches("霓虹街道", "bar"));
    }

    #[test]
    fn blank_names_rejected() {
        assert_matches!(validate_asset_name("  "), Err(CoreError::Validation(_)));
        assert_matches!(validate_state_name(""), Err(CoreError::Validation(_)));
        assert_matches!(validate_asset_name("X"), Ok(()));
    }

    #[test]
    fn blank_description_falls_back() {
        assert_eq!(description_or("  ", DEFAULT_ASSET_DESCRIPTION), "手动创建的资产");
        assert_eq!(description_or(" x ", DEFAULT_ASSET_DESCRIPTION), "x");
    }

    #[test]
    fn upload_prepends_to_history() {
        let mut main = Some("a".to_string());
        let mut thumbs = urls(&["b"]);
        apply_upload(&mut main, &mut thumbs, "new");
        assert_eq!(main.as_deref(), Some("new"));
        assert_eq!(thumbs, urls(&["new", "b"]));
    }

    #[test]
    fn regenerated_history_is_capped() {
        let mut main = None;
        let mut thumbs = urls(&["1", "2", "3", "4", "5", "6", "7", "8"]);
        apply_regenerated(&mut main, &mut thumbs, "9");
        assert_eq!(thumbs.len(), MAX_THUMBNAIL_HISTORY);
        assert_eq!(thumbs[0], "9");
        assert_eq!(thumbs.last().map(String::as_str), Some("7"));
    }

    #[test]
    fn set_main_swaps_images() {
        let mut main = Some("m".to_string());
        let mut thumbs = urls(&["t1", "t2"]);
        apply_set_main(&mut main, &mut thumbs, "t1").unwrap();
        assert_eq!(main.as_deref(), Some("t1"));
        assert_eq!(thumbs, urls(&["t2", "m"]));
    }

    #[test]
    fn set_main_unknown_url_rejected() {
        let mut main = Some("m".to_string());
        let mut thumbs = urls(&["t1"]);
        assert!(apply_set_main(&mut main, &mut thumbs, "zzz").is_err());
        assert_eq!(thumbs, urls(&["t1"]));
    }

    #[test]
    fn deleting_main_promotes_first_thumbnail() {
        let mut main = Some("m".to_string());
        let mut thumbs = urls(&["t1", "t2"]);
        apply_delete(&mut main, &mut thumbs, "m").unwrap();
        assert_eq!(main.as_deref(), Some("t1"));
        assert_eq!(thumbs, urls(&["t2"]));
    }

    #[test]
    fn deleting_last_main_leaves_none() {
        let mut main = Some("m".to_string());
        let mut thumbs = Vec::new();
        apply_delete(&mut main, &mut thumbs, "m").unwrap();
        assert!(main.is_none());
    }

    #[test]
    fn deleting_thumbnail_keeps_main() {
        let mut main = Some("m".to_string());
        let mut thumbs = urls(&["t1", "t2"]);
        apply_delete(&mut main, &mut thumbs, "t2").unwrap();
        assert_eq!(main.as_deref(), Some("m"));
        assert_eq!(thumbs, urls(&["t1"]));
    }
}
