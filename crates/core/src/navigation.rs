//! Workspace navigation: main tabs, asset sub-tabs, theme, and tab gating.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Top-level studio sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MainTab {
    #[default]
    Projects,
    Assets,
    MasterLib,
    Video,
    Editor,
}

impl MainTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Projects => "PROJECTS",
            Self::Assets => "ASSETS",
            Self::MasterLib => "MASTER_LIB",
            Self::Video => "VIDEO",
            Self::Editor => "EDITOR",
        }
    }

    /// Display label used by the navigation bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Projects => "项目选择",
            Self::Assets => "资产管理",
            Self::MasterLib => "Vidu主体库管理",
            Self::Video => "视频管理",
            Self::Editor => "在线编辑",
        }
    }
}

impl std::fmt::Display for MainTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-tabs inside the asset section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetSubTab {
    Episodes,
    #[default]
    Images,
    Tts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Every tab except the project picker needs a current project.
pub fn validate_tab_change(tab: MainTab, has_project: bool) -> Result<(), CoreError> {
    if tab != MainTab::Projects && !has_project {
        return Err(CoreError::Validation(format!(
            "Select a project before opening {tab}"
        )));
    }
    Ok(())
}
