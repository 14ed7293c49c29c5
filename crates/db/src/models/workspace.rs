//! Workspace state of the studio shell.

use serde::Serialize;
use vidu_core::navigation::{AssetSubTab, MainTab, Theme};
use vidu_core::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Workspace {
    pub current_tab: MainTab,
    pub asset_sub_tab: AssetSubTab,
    pub theme: Theme,
    pub current_project_id: Option<DbId>,
    pub selected_asset_id: Option<DbId>,
    /// State whose detail view is open; always a state of the selected asset.
    pub open_state_id: Option<DbId>,
    pub logged_in: bool,
}

impl Workspace {
    /// Back to the project picker with nothing selected. Theme is kept.
    pub fn reset(&mut self) {
        *self = Workspace {
            theme: self.theme,
            ..Workspace::default()
        };
    }

    pub fn select_asset(&mut self, asset_id: Option<DbId>) {
        if self.selected_asset_id != asset_id {
            self.open_state_id = None;
        }
        self.selected_asset_id = asset_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_theme() {
        let mut ws = Workspace {
            current_tab: MainTab::Video,
            theme: Theme::Light,
            current_project_id: Some(3),
            logged_in: true,
            ..Workspace::default()
        };
        ws.reset();
        assert_eq!(ws.current_tab, MainTab::Projects);
        assert_eq!(ws.theme, Theme::Light);
        assert!(ws.current_project_id.is_none());
        assert!(!ws.logged_in);
    }

    #[test]
    fn changing_asset_closes_detail_view() {
        let mut ws = Workspace {
            selected_asset_id: Some(1),
            open_state_id: Some(2),
            ..Workspace::default()
        };
        ws.select_asset(Some(1));
        assert_eq!(ws.open_state_id, Some(2));
        ws.select_asset(Some(5));
        assert!(ws.open_state_id.is_none());
    }
}
