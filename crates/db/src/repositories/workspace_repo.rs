//! Repository for the single studio workspace.

use vidu_core::error::CoreError;

use crate::models::workspace::Workspace;
use crate::{DbError, Store};

pub struct WorkspaceRepo;

impl WorkspaceRepo {
    pub async fn get(store: &Store) -> Result<Workspace, DbError> {
        Ok(store.read().await.workspace.clone())
    }

    /// Apply `f` to the workspace. Nothing is changed if `f` fails.
    pub async fn update<F>(store: &Store, f: F) -> Result<Workspace, DbError>
    where
        F: FnOnce(&mut Workspace) -> Result<(), CoreError>,
    {
        let mut t = store.write().await;
        let mut next = t.workspace.clone();
        f(&mut next)?;
        t.workspace = next.clone();
        Ok(next)
    }

    pub async fn reset(store: &Store) -> Result<Workspace, DbError> {
        let mut t = store.write().await;
        t.workspace.reset();
        Ok(t.workspace.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_store;
    use vidu_core::navigation::{MainTab, Theme};

    #[tokio::test]
    async fn failed_update_changes_nothing() {
        let store = create_store();
        let result = WorkspaceRepo::update(&store, |ws| {
            ws.current_tab = MainTab::Video;
            Err(CoreError::Validation("no project".into()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(WorkspaceRepo::get(&store).await.unwrap().current_tab, MainTab::Projects);
    }

    #[tokio::test]
    async fn reset_keeps_theme() {
        let store = create_store();
        WorkspaceRepo::update(&store, |ws| {
            ws.theme = Theme::Light;
            ws.current_project_id = Some(4);
            Ok(())
        })
        .await
        .unwrap();
        let ws = WorkspaceRepo::reset(&store).await.unwrap();
        assert_eq!(ws.theme, Theme::Light);
        assert!(ws.current_project_id.is_none());
    }
}
