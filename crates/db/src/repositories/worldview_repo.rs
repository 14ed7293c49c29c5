//! Repository for worldview entries.

use vidu_core::types::DbId;

use crate::models::asset::{CreateWorldviewEntry, UpdateWorldviewEntry, WorldviewEntry};
use crate::{DbError, Store};

pub struct WorldviewRepo;

impl WorldviewRepo {
    pub async fn list(store: &Store) -> Result<Vec<WorldviewEntry>, DbError> {
        Ok(store.read().await.worldview.clone())
    }

    /// Replace every entry, assigning fresh ids.
    pub async fn replace_all(
        store: &Store,
        entries: &[CreateWorldviewEntry],
    ) -> Result<Vec<WorldviewEntry>, DbError> {
        let entries: Vec<WorldviewEntry> = entries
            .iter()
            .map(|e| WorldviewEntry {
                id: store.next_id(),
                faction: e.faction.clone(),
                description: e.description.clone(),
            })
            .collect();
        store.write().await.worldview = entries.clone();
        Ok(entries)
    }

    pub async fn update(
        store: &Store,
        id: DbId,
        input: &UpdateWorldviewEntry,
    ) -> Result<Option<WorldviewEntry>, DbError> {
        let mut t = store.write().await;
        let Some(entry) = t.worldview.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(faction) = &input.faction {
            entry.faction = faction.clone();
        }
        if let Some(description) = &input.description {
            entry.description = description.clone();
        }
        Ok(Some(entry.clone()))
    }

    pub async fn delete(store: &Store, id: DbId) -> Result<bool, DbError> {
        let mut t = store.write().await;
        let before = t.worldview.len();
        t.worldview.retain(|e| e.id != id);
        Ok(t.worldview.len() < before)
    }
}
