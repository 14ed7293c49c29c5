//! Repository for the master library.

use crate::models::asset::Asset;
use crate::models::master_library::{MasterLibraryItem, UpdateMasterLibraryItem};
use crate::{DbError, Store};
use vidu_core::asset::name_matches;

const UID_CONSTRAINT: &str = "master_library_uid_key";

pub struct MasterLibraryRepo;

impl MasterLibraryRepo {
    /// All items, newest first.
    pub async fn list(store: &Store) -> Result<Vec<MasterLibraryItem>, DbError> {
        Ok(store.read().await.master_library.clone())
    }

    pub async fn find_by_uid(store: &Store, uid: &str) -> Result<Option<MasterLibraryItem>, DbError> {
        Ok(store
            .read()
            .await
            .master_library
            .iter()
            .find(|i| i.uid == uid)
            .cloned())
    }

    /// Seed the library once, the first time it is viewed while empty and
    /// assets exist. `build` receives the current assets. Returns whether
    /// seeding ran.
    pub async fn seed_on_first_view<F>(store: &Store, build: F) -> Result<bool, DbError>
    where
        F: FnOnce(&[Asset]) -> Vec<MasterLibraryItem>,
    {
        let mut t = store.write().await;
        if t.master_library_seeded || !t.master_library.is_empty() || t.assets.is_empty() {
            return Ok(false);
        }
        let items = build(&t.assets);
        tracing::debug!(count = items.len(), "Seeding master library");
        t.master_library = items;
        t.master_library_seeded = true;
        Ok(true)
    }

    /// Insert one item at the head. Fails if the uid is already present.
    pub async fn insert(
        store: &Store,
        item: MasterLibraryItem,
    ) -> Result<MasterLibraryItem, DbError> {
        let mut t = store.write().await;
        if t.master_library.iter().any(|i| i.uid == item.uid) {
            return Err(DbError::UniqueViolation { constraint: UID_CONSTRAINT });
        }
        t.master_library.insert(0, item.clone());
        Ok(item)
    }

    /// Insert several items at the head, keeping their order. Fails without
    /// inserting anything if any uid is already present.
    pub async fn insert_many(
        store: &Store,
        items: Vec<MasterLibraryItem>,
    ) -> Result<Vec<MasterLibraryItem>, DbError> {
        let mut t = store.write().await;
        let clash = items.iter().enumerate().any(|(i, item)| {
            t.master_library.iter().any(|m| m.uid == item.uid)
                || items[..i].iter().any(|other| other.uid == item.uid)
        });
        if clash {
            return Err(DbError::UniqueViolation { constraint: UID_CONSTRAINT });
        }
        t.master_library.splice(0..0, items.iter().cloned());
        Ok(items)
    }

    pub async fn update(
        store: &Store,
        uid: &str,
        input: &UpdateMasterLibraryItem,
    ) -> Result<Option<MasterLibraryItem>, DbError> {
        let mut t = store.write().await;
        let Some(item) = t.master_library.iter_mut().find(|i| i.uid == uid) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            item.name = name.clone();
        }
        if let Some(style) = &input.style {
            item.style = style.clone();
        }
        if let Some(description) = &input.description {
            item.description = description.clone();
        }
        Ok(Some(item.clone()))
    }

    /// Remove an item from the library. The local asset is untouched.
    pub async fn delete(store: &Store, uid: &str) -> Result<bool, DbError> {
        let mut t = store.write().await;
        let before = t.master_library.len();
        t.master_library.retain(|i| i.uid != uid);
        Ok(t.master_library.len() < before)
    }

    /// Case-insensitive match on name, style, or description.
    pub async fn search(store: &Store, term: &str) -> Result<Vec<MasterLibraryItem>, DbError> {
        Ok(store
            .read()
            .await
            .master_library
            .iter()
            .filter(|i| {
                name_matches(&i.name, term)
                    || name_matches(&i.style, term)
                    || name_matches(&i.description, term)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_store;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn item(uid: &str, name: &str) -> MasterLibraryItem {
        MasterLibraryItem {
            uid: uid.to_string(),
            asset_id: 1,
            state_id: 2,
            name: name.to_string(),
            style: "电影质感".to_string(),
            description: String::new(),
            image_url: "u".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_uid_rejected() {
        let store = create_store();
        MasterLibraryRepo::insert(&store, item("1-2", "a")).await.unwrap();
        let dup = MasterLibraryRepo::insert(&store, item("1-2", "b")).await;
        assert_matches!(dup, Err(DbError::UniqueViolation { .. }));
        assert_eq!(MasterLibraryRepo::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_many_is_all_or_nothing() {
        let store = create_store();
        MasterLibraryRepo::insert(&store, item("1-2", "a")).await.unwrap();
        let result =
            MasterLibraryRepo::insert_many(&store, vec![item("3-4", "b"), item("1-2", "c")]).await;
        assert!(result.is_err());
        assert_eq!(MasterLibraryRepo::list(&store).await.unwrap().len(), 1);

        MasterLibraryRepo::insert_many(&store, vec![item("3-4", "b"), item("5-6", "c")])
            .await
            .unwrap();
        let uids: Vec<_> = MasterLibraryRepo::list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.uid)
            .collect();
        assert_eq!(uids, vec!["3-4", "5-6", "1-2"]);
    }

    #[tokio::test]
    async fn seeding_needs_assets_and_runs_once() {
        let store = create_store();
        let ran = MasterLibraryRepo::seed_on_first_view(&store, |_| vec![item("x", "x")])
            .await
            .unwrap();
        assert!(!ran);
    }

    #[tokio::test]
    async fn search_matches_name_and_style() {
        let store = create_store();
        MasterLibraryRepo::insert(&store, item("1-2", "Kael - 常规状态")).await.unwrap();
        assert_eq!(MasterLibraryRepo::search(&store, "kael").await.unwrap().len(), 1);
        assert_eq!(MasterLibraryRepo::search(&store, "电影").await.unwrap().len(), 1);
        assert!(MasterLibraryRepo::search(&store, "zzz").await.unwrap().is_empty());
    }
}
