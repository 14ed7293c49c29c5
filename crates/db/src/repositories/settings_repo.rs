//! Repositories for global agent settings and video settings.

use vidu_core::settings::ConfigKey;

use crate::models::episode::VideoSettings;
use crate::models::settings::{AgentSetting, AgentSettings};
use crate::{DbError, Store};

pub struct AgentSettingsRepo;

impl AgentSettingsRepo {
    pub async fn get(store: &Store) -> Result<AgentSettings, DbError> {
        Ok(store.read().await.agent_settings.clone())
    }

    pub async fn get_one(store: &Store, key: ConfigKey) -> Result<Option<AgentSetting>, DbError> {
        Ok(store.read().await.agent_settings.get(&key).cloned())
    }

    /// Merge `settings` over the stored ones; keys not present are kept.
    pub async fn save(store: &Store, settings: AgentSettings) -> Result<AgentSettings, DbError> {
        let mut t = store.write().await;
        t.agent_settings.extend(settings);
        Ok(t.agent_settings.clone())
    }
}

pub struct VideoSettingsRepo;

impl VideoSettingsRepo {
    pub async fn get(store: &Store) -> Result<VideoSettings, DbError> {
        Ok(store.read().await.video_settings.clone())
    }

    pub async fn update(store: &Store, settings: VideoSettings) -> Result<VideoSettings, DbError> {
        store.write().await.video_settings = settings.clone();
        Ok(settings)
    }
}
