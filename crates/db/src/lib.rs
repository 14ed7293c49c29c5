//! In-memory studio store and its repository layer.
//!
//! Every table lives behind one `tokio::sync::RwLock`; repositories take
//! `&Store` and lock for the duration of a single operation, so each
//! repository call is atomic. Ids come from one monotonically increasing
//! sequence shared by all tables.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use vidu_core::error::CoreError;
use vidu_core::settings::ConfigKey;
use vidu_core::types::DbId;

pub mod models;
pub mod repositories;
mod seed;

pub use seed::seed_defaults;

use models::asset::{Asset, WorldviewEntry};
use models::chat::{ChatMessage, ChatSettings};
use models::episode::{Episode, GenerationError, VideoSettings};
use models::master_library::MasterLibraryItem;
use models::project::{Project, ScriptConversion};
use models::prompt::{ConfigItem, PromptType, TemplateConfig};
use models::session::Session;
use models::settings::AgentSetting;
use models::timeline::TimelineClip;
use models::user::{Role, UserAccount};
use models::workspace::Workspace;

/// Shared handle to the store.
pub type DbPool = Arc<Store>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: &'static str },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Every table of the studio.
#[derive(Debug, Default)]
pub struct Tables {
    /// Newest first.
    pub projects: Vec<Project>,
    pub conversions: Vec<ScriptConversion>,
    /// Newest first.
    pub assets: Vec<Asset>,
    pub worldview: Vec<WorldviewEntry>,
    /// Newest first.
    pub master_library: Vec<MasterLibraryItem>,
    /// Set once the library has been seeded on first view.
    pub master_library_seeded: bool,
    pub episodes: Vec<Episode>,
    pub generation_errors: Vec<GenerationError>,
    pub video_settings: VideoSettings,
    pub timeline: Vec<TimelineClip>,
    pub agent_settings: BTreeMap<ConfigKey, AgentSetting>,
    pub users: Vec<UserAccount>,
    pub roles: Vec<Role>,
    pub prompt_configs: Vec<ConfigItem>,
    pub prompt_types: Vec<PromptType>,
    pub templates: Vec<TemplateConfig>,
    pub current_template_id: String,
    pub chat_messages: Vec<ChatMessage>,
    pub chat_settings: ChatSettings,
    pub workspace: Workspace,
    /// Login sessions keyed by token id.
    pub sessions: HashMap<String, Session>,
}

/// The in-memory database.
#[derive(Debug)]
pub struct Store {
    tables: RwLock<Tables>,
    sequence: AtomicI64,
}

impl Store {
    /// Allocate the next id.
    pub fn next_id(&self) -> DbId {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

/// Create an empty store.
pub fn create_store() -> DbPool {
    Arc::new(Store {
        tables: RwLock::new(Tables::default()),
        sequence: AtomicI64::new(1),
    })
}

/// Verify the store is usable: the tables lock can be taken and the id
/// sequence has not wrapped.
pub async fn health_check(store: &Store) -> Result<(), DbError> {
    let _tables = store.read().await;
    if store.sequence.load(Ordering::Relaxed) <= 0 {
        return Err(DbError::Core(CoreError::Internal(
            "id sequence exhausted".to_string(),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_unique_and_increasing() {
        let store = create_store();
        let a = store.next_id();
        let b = store.next_id();
        assert!(b > a);
    }

    #[tokio::test]
    async fn fresh_store_is_healthy() {
        let store = create_store();
        assert!(health_check(&store).await.is_ok());
    }
}
