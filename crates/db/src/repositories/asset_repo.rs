//! Repository for assets and their states.

use std::collections::BTreeMap;

use vidu_core::asset::{
    description_or, name_matches, AssetTypeFilter, DEFAULT_ADDED_STATE_DESCRIPTION,
    DEFAULT_ASSET_DESCRIPTION, DEFAULT_STATE_DESCRIPTION, DEFAULT_STATE_NAME,
};
use vidu_core::error::CoreError;
use vidu_core::types::DbId;

use crate::models::asset::{
    Asset, AssetState, CreateAsset, CreateAssetState, UpdateAsset, UpdateAssetState,
};
use crate::{DbError, Store};

/// Provides CRUD operations for assets, their states, and state images.
pub struct AssetRepo;

impl AssetRepo {
    /// Build a state with a fresh id and no images.
    pub fn new_state(store: &Store, name: &str, description: &str) -> AssetState {
        AssetState {
            id: store.next_id(),
            name: name.to_string(),
            description: description.to_string(),
            main_image_url: None,
            thumbnail_urls: Vec::new(),
            prompt: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Insert a new asset at the head of the list with one default state.
    ///
    /// A blank description falls back to [`DEFAULT_ASSET_DESCRIPTION`].
    pub async fn create(store: &Store, input: &CreateAsset) -> Result<Asset, DbError> {
        let asset = Asset {
            id: store.next_id(),
            name: input.name.trim().to_string(),
            asset_type: input.asset_type,
            description: description_or(&input.description, DEFAULT_ASSET_DESCRIPTION),
            in_master_lib: false,
            image_url: None,
            states: vec![Self::new_state(
                store,
                DEFAULT_STATE_NAME,
                DEFAULT_STATE_DESCRIPTION,
            )],
        };
        store.write().await.assets.insert(0, asset.clone());
        Ok(asset)
    }

    pub async fn find_by_id(store: &Store, id: DbId) -> Result<Option<Asset>, DbError> {
        Ok(store.read().await.assets.iter().find(|a| a.id == id).cloned())
    }

    /// List assets matching the type filter and a case-insensitive name search.
    pub async fn list(
        store: &Store,
        filter: AssetTypeFilter,
        search: &str,
    ) -> Result<Vec<Asset>, DbError> {
        Ok(store
            .read()
            .await
            .assets
            .iter()
            .filter(|a| filter.matches(a.asset_type) && name_matches(&a.name, search))
            .cloned()
            .collect())
    }

    pub async fn count(store: &Store) -> Result<usize, DbError> {
        Ok(store.read().await.assets.len())
    }

    pub async fn update(
        store: &Store,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, DbError> {
        let mut t = store.write().await;
        let Some(asset) = t.assets.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            asset.name = name.trim().to_string();
        }
        if let Some(asset_type) = input.asset_type {
            asset.asset_type = asset_type;
        }
        if let Some(description) = &input.description {
            asset.description = description.clone();
        }
        if let Some(flag) = input.in_master_lib {
            asset.in_master_lib = flag;
        }
        Ok(Some(asset.clone()))
    }

    /// Delete an asset. Clears the selection if it was selected.
    pub async fn delete(store: &Store, id: DbId) -> Result<bool, DbError> {
        Ok(Self::bulk_delete(store, &[id]).await? > 0)
    }

    /// Delete every listed asset, returning how many were removed.
    pub async fn bulk_delete(store: &Store, ids: &[DbId]) -> Result<usize, DbError> {
        let mut t = store.write().await;
        let before = t.assets.len();
        t.assets.retain(|a| !ids.contains(&a.id));
        let removed = before - t.assets.len();
        if let Some(selected) = t.workspace.selected_asset_id {
            if ids.contains(&selected) {
                t.workspace.select_asset(None);
            }
        }
        Ok(removed)
    }

    /// Replace the whole asset list. Selects the first asset when nothing
    /// valid is selected.
    pub async fn replace_all(store: &Store, assets: Vec<Asset>) -> Result<Vec<Asset>, DbError> {
        let mut t = store.write().await;
        t.assets = assets;
        let selection_valid = t
            .workspace
            .selected_asset_id
            .is_some_and(|id| t.assets.iter().any(|a| a.id == id));
        if !selection_valid {
            let first = t.assets.first().map(|a| a.id);
            t.workspace.select_asset(first);
        }
        Ok(t.assets.clone())
    }

    // -- states --

    pub async fn find_state(
        store: &Store,
        asset_id: DbId,
        state_id: DbId,
    ) -> Result<Option<AssetState>, DbError> {
        Ok(store
            .read()
            .await
            .assets
            .iter()
            .find(|a| a.id == asset_id)
            .and_then(|a| a.state(state_id))
            .cloned())
    }

    /// Append a state. A blank description falls back to
    /// [`DEFAULT_ADDED_STATE_DESCRIPTION`]. Returns `None` if the asset is missing.
    pub async fn add_state(
        store: &Store,
        asset_id: DbId,
        input: &CreateAssetState,
    ) -> Result<Option<AssetState>, DbError> {
        let state = Self::new_state(
            store,
            input.name.trim(),
            &description_or(&input.description, DEFAULT_ADDED_STATE_DESCRIPTION),
        );
        let mut t = store.write().await;
        let Some(asset) = t.assets.iter_mut().find(|a| a.id == asset_id) else {
            return Ok(None);
        };
        asset.states.push(state.clone());
        Ok(Some(state))
    }

    pub async fn update_state(
        store: &Store,
        asset_id: DbId,
        state_id: DbId,
        input: &UpdateAssetState,
    ) -> Result<Option<AssetState>, DbError> {
        let mut t = store.write().await;
        let Some(state) = t
            .assets
            .iter_mut()
            .find(|a| a.id == asset_id)
            .and_then(|a| a.states.iter_mut().find(|s| s.id == state_id))
        else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            state.name = name.trim().to_string();
        }
        if let Some(description) = &input.description {
            state.description = description.clone();
        }
        if let Some(prompt) = &input.prompt {
            state.prompt = Some(prompt.clone());
        }
        if let Some(attributes) = &input.attributes {
            state.attributes = attributes.clone();
        }
        Ok(Some(state.clone()))
    }

    /// Remove exactly one state. Closes its detail view if it was open.
    pub async fn delete_state(
        store: &Store,
        asset_id: DbId,
        state_id: DbId,
    ) -> Result<bool, DbError> {
        let mut t = store.write().await;
        let Some(asset) = t.assets.iter_mut().find(|a| a.id == asset_id) else {
            return Ok(false);
        };
        let before = asset.states.len();
        asset.states.retain(|s| s.id != state_id);
        let removed = asset.states.len() < before;
        if removed {
            asset.refresh_cover();
            if t.workspace.open_state_id == Some(state_id) {
                t.workspace.open_state_id = None;
            }
        }
        Ok(removed)
    }

    /// Run `f` against one state under the write lock, then recompute the
    /// asset cover. Returns `None` if the asset or state is missing.
    pub async fn modify_state<F>(
        store: &Store,
        asset_id: DbId,
        state_id: DbId,
        f: F,
    ) -> Result<Option<Asset>, DbError>
    where
        F: FnOnce(&mut AssetState) -> Result<(), CoreError>,
    {
        let mut t = store.write().await;
        let Some(asset) = t.assets.iter_mut().find(|a| a.id == asset_id) else {
            return Ok(None);
        };
        let Some(state) = asset.states.iter_mut().find(|s| s.id == state_id) else {
            return Ok(None);
        };
        f(state)?;
        asset.refresh_cover();
        Ok(Some(asset.clone()))
    }

    /// Fill prompt and attributes on every state for which `lookup` returns
    /// details. Returns the number of states updated.
    pub async fn fill_details<F>(store: &Store, lookup: F) -> Result<usize, DbError>
    where
        F: Fn(&str, &str) -> Option<(String, BTreeMap<String, String>)>,
    {
        let mut t = store.write().await;
        let mut updated = 0;
        for asset in t.assets.iter_mut() {
            for state in asset.states.iter_mut() {
                if let Some((prompt, attributes)) = lookup(&asset.name, &state.name) {
                    state.prompt = Some(prompt);
                    state.attributes = attributes;
                    updated += 1;
                }
            }
        }
        Ok(updated)
    }

    /// `(asset_id, state_id)` of every state with a non-empty prompt, in list order.
    pub async fn states_with_prompt(store: &Store) -> Result<Vec<(DbId, DbId)>, DbError> {
        Ok(store
            .read()
            .await
            .assets
            .iter()
            .flat_map(|a| {
                a.states
                    .iter()
                    .filter(|s| s.has_prompt())
                    .map(move |s| (a.id, s.id))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_store;
    use assert_matches::assert_matches;
    use vidu_core::asset::{apply_set_main, AssetType};

    async fn prop(store: &Store, name: &str) -> Asset {
        AssetRepo::create(
            store,
            &CreateAsset {
                name: name.to_string(),
                asset_type: AssetType::Prop,
                description: String::new(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_applies_fallbacks() {
        let store = create_store();
        let asset = prop(&store, "X").await;
        assert_eq!(asset.description, "手动创建的资产");
        assert_eq!(asset.states.len(), 1);
        assert_eq!(asset.states[0].name, "常规状态");
        assert_eq!(asset.states[0].description, "初始状态");
    }

    #[tokio::test]
    async fn list_filters_by_type_and_name() {
        let store = create_store();
        prop(&store, "Revolver").await;
        AssetRepo::create(
            &store,
            &CreateAsset {
                name: "Street".into(),
                asset_type: AssetType::Scene,
                description: "d".into(),
            },
        )
        .await
        .unwrap();
        let props = AssetRepo::list(&store, AssetTypeFilter::Prop, "").await.unwrap();
        assert_eq!(props.len(), 1);
        let found = AssetRepo::list(&store, AssetTypeFilter::All, "STREET").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Street");
    }

    #[tokio::test]
    async fn delete_state_removes_only_that_state_and_closes_view() {
        let store = create_store();
        let asset = prop(&store, "X").await;
        let extra = AssetRepo::add_state(
            &store,
            asset.id,
            &CreateAssetState { name: "夜间".into(), description: String::new() },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(extra.description, "新添加的状态");
        {
            let mut t = store.write().await;
            t.workspace.select_asset(Some(asset.id));
            t.workspace.open_state_id = Some(extra.id);
        }
        assert!(AssetRepo::delete_state(&store, asset.id, extra.id).await.unwrap());
        let after = AssetRepo::find_by_id(&store, asset.id).await.unwrap().unwrap();
        assert_eq!(after.states.len(), 1);
        assert_eq!(after.states[0].id, asset.states[0].id);
        assert!(store.read().await.workspace.open_state_id.is_none());
    }

    #[tokio::test]
    async fn bulk_delete_clears_selection() {
        let store = create_store();
        let a = prop(&store, "a").await;
        let b = prop(&store, "b").await;
        store.write().await.workspace.select_asset(Some(a.id));
        assert_eq!(AssetRepo::bulk_delete(&store, &[a.id, b.id, 999]).await.unwrap(), 2);
        assert!(store.read().await.workspace.selected_asset_id.is_none());
    }

    #[tokio::test]
    async fn modify_state_recomputes_cover() {
        let store = create_store();
        let asset = prop(&store, "X").await;
        let state_id = asset.states[0].id;
        let updated = AssetRepo::modify_state(&store, asset.id, state_id, |s| {
            s.main_image_url = Some("m".into());
            Ok(())
        })
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.image_url.as_deref(), Some("m"));
    }

    #[tokio::test]
    async fn modify_state_propagates_validation_errors() {
        let store = create_store();
        let asset = prop(&store, "X").await;
        let state_id = asset.states[0].id;
        let result = AssetRepo::modify_state(&store, asset.id, state_id, |s| {
            apply_set_main(&mut s.main_image_url, &mut s.thumbnail_urls, "missing")
        })
        .await;
        assert_matches!(result, Err(DbError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn states_with_prompt_skips_blank_prompts() {
        let store = create_store();
        let asset = prop(&store, "X").await;
        assert!(AssetRepo::states_with_prompt(&store).await.unwrap().is_empty());
        AssetRepo::update_state(
            &store,
            asset.id,
            asset.states[0].id,
            &UpdateAssetState { prompt: Some("a prop".into()), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(
            AssetRepo::states_with_prompt(&store).await.unwrap(),
            vec![(asset.id, asset.states[0].id)]
        );
    }
}
