//! Repository for episodes and their shots.

use chrono::Utc;
use vidu_core::error::CoreError;
use vidu_core::status::GenerationStatus;
use vidu_core::storyboard::{shot_video_url, DEFAULT_SHOT_DURATION_SECS};
use vidu_core::types::DbId;

use crate::models::episode::{CreateShot, Episode, GenerationError, Shot, UpdateShot};
use crate::{DbError, Store, Tables};

fn shot_mut(t: &mut Tables, episode_id: DbId, shot_id: DbId) -> Option<&mut Shot> {
    t.episodes
        .iter_mut()
        .find(|e| e.id == episode_id)
        .and_then(|e| e.shots.iter_mut().find(|s| s.id == shot_id))
}

/// Provides operations for episodes and shots.
pub struct EpisodeRepo;

impl EpisodeRepo {
    fn new_shot(store: &Store, description: String, duration: f64) -> Shot {
        Shot {
            id: store.next_id(),
            description,
            duration,
            status: GenerationStatus::Pending,
            video_url: None,
            video_versions: Vec::new(),
        }
    }

    pub async fn list(store: &Store) -> Result<Vec<Episode>, DbError> {
        Ok(store.read().await.episodes.clone())
    }

    pub async fn find_by_id(store: &Store, id: DbId) -> Result<Option<Episode>, DbError> {
        Ok(store.read().await.episodes.iter().find(|e| e.id == id).cloned())
    }

    pub async fn update_script(
        store: &Store,
        id: DbId,
        script_content: &str,
    ) -> Result<Option<Episode>, DbError> {
        let mut t = store.write().await;
        let Some(episode) = t.episodes.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        episode.script_content = script_content.to_string();
        Ok(Some(episode.clone()))
    }

    /// Replace every shot of an episode with fresh pending shots.
    pub async fn replace_shots(
        store: &Store,
        id: DbId,
        descriptions: Vec<String>,
    ) -> Result<Option<Episode>, DbError> {
        let shots: Vec<Shot> = descriptions
            .into_iter()
            .map(|d| Self::new_shot(store, d, DEFAULT_SHOT_DURATION_SECS))
            .collect();
        let mut t = store.write().await;
        let Some(episode) = t.episodes.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        episode.shots = shots;
        Ok(Some(episode.clone()))
    }

    pub async fn add_shot(
        store: &Store,
        episode_id: DbId,
        input: &CreateShot,
    ) -> Result<Option<Shot>, DbError> {
        let shot = Self::new_shot(
            store,
            input.description.clone(),
            input.duration.unwrap_or(DEFAULT_SHOT_DURATION_SECS),
        );
        let mut t = store.write().await;
        let Some(episode) = t.episodes.iter_mut().find(|e| e.id == episode_id) else {
            return Ok(None);
        };
        episode.shots.push(shot.clone());
        Ok(Some(shot))
    }

    pub async fn find_shot(
        store: &Store,
        episode_id: DbId,
        shot_id: DbId,
    ) -> Result<Option<Shot>, DbError> {
        Ok(store
            .read()
            .await
            .episodes
            .iter()
            .find(|e| e.id == episode_id)
            .and_then(|e| e.shot(shot_id))
            .cloned())
    }

    pub async fn update_shot(
        store: &Store,
        episode_id: DbId,
        shot_id: DbId,
        input: &UpdateShot,
    ) -> Result<Option<Shot>, DbError> {
        let mut t = store.write().await;
        let Some(shot) = shot_mut(&mut t, episode_id, shot_id) else {
            return Ok(None);
        };
        if let Some(description) = &input.description {
            shot.description = description.clone();
        }
        if let Some(duration) = input.duration {
            shot.duration = duration;
        }
        Ok(Some(shot.clone()))
    }

    pub async fn delete_shot(store: &Store, episode_id: DbId, shot_id: DbId) -> Result<bool, DbError> {
        let mut t = store.write().await;
        let Some(episode) = t.episodes.iter_mut().find(|e| e.id == episode_id) else {
            return Ok(false);
        };
        let before = episode.shots.len();
        episode.shots.retain(|s| s.id != shot_id);
        Ok(episode.shots.len() < before)
    }

    pub async fn set_shot_status(
        store: &Store,
        episode_id: DbId,
        shot_id: DbId,
        status: GenerationStatus,
    ) -> Result<Option<Shot>, DbError> {
        let mut t = store.write().await;
        let Some(shot) = shot_mut(&mut t, episode_id, shot_id) else {
            return Ok(None);
        };
        shot.status = status;
        Ok(Some(shot.clone()))
    }

    /// Mark a shot completed with a new rendered version.
    pub async fn complete_shot(
        store: &Store,
        episode_id: DbId,
        shot_id: DbId,
    ) -> Result<Option<Shot>, DbError> {
        let mut t = store.write().await;
        let Some(shot) = shot_mut(&mut t, episode_id, shot_id) else {
            return Ok(None);
        };
        let url = shot_video_url(shot.id, shot.video_versions.len() + 1);
        shot.video_versions.push(url.clone());
        shot.video_url = Some(url);
        shot.status = GenerationStatus::Completed;
        Ok(Some(shot.clone()))
    }

    /// Mark a shot failed and record the error.
    pub async fn fail_shot(
        store: &Store,
        episode_id: DbId,
        shot_id: DbId,
        message: &str,
        detail: &str,
    ) -> Result<Option<GenerationError>, DbError> {
        let error_id = store.next_id();
        let mut t = store.write().await;
        let Some(episode) = t.episodes.iter_mut().find(|e| e.id == episode_id) else {
            return Ok(None);
        };
        let episode_name = episode.name.clone();
        let Some(index) = episode.shot_index(shot_id) else {
            return Ok(None);
        };
        episode.shots[index].status = GenerationStatus::Error;
        let error = GenerationError {
            id: error_id,
            shot_id,
            episode_name,
            shot_index: index + 1,
            message: message.to_string(),
            detail: detail.to_string(),
            timestamp: Utc::now(),
        };
        t.generation_errors.push(error.clone());
        Ok(Some(error))
    }

    /// Put a generating shot back to pending, whichever episode holds it.
    /// Returns whether a shot was reset.
    pub async fn reset_generating_shot(store: &Store, shot_id: DbId) -> Result<bool, DbError> {
        let mut t = store.write().await;
        let shot = t
            .episodes
            .iter_mut()
            .flat_map(|e| e.shots.iter_mut())
            .find(|s| s.id == shot_id && s.status == GenerationStatus::Generating);
        match shot {
            Some(shot) => {
                shot.status = GenerationStatus::Pending;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Make a previously rendered version current.
    pub async fn select_version(
        store: &Store,
        episode_id: DbId,
        shot_id: DbId,
        url: &str,
    ) -> Result<Option<Shot>, DbError> {
        let mut t = store.write().await;
        let Some(shot) = shot_mut(&mut t, episode_id, shot_id) else {
            return Ok(None);
        };
        if !shot.video_versions.iter().any(|v| v == url) {
            return Err(CoreError::Validation(format!("{url} is not a version of shot {shot_id}")).into());
        }
        shot.video_url = Some(url.to_string());
        Ok(Some(shot.clone()))
    }
}

/// Provides operations for the generation error log.
pub struct GenerationErrorRepo;

impl GenerationErrorRepo {
    pub async fn list(store: &Store) -> Result<Vec<GenerationError>, DbError> {
        Ok(store.read().await.generation_errors.clone())
    }

    pub async fn delete(store: &Store, id: DbId) -> Result<bool, DbError> {
        let mut t = store.write().await;
        let before = t.generation_errors.len();
        t.generation_errors.retain(|e| e.id != id);
        Ok(t.generation_errors.len() < before)
    }

    /// Remove every error entry, returning how many were removed.
    pub async fn clear(store: &Store) -> Result<usize, DbError> {
        let mut t = store.write().await;
        let count = t.generation_errors.len();
        t.generation_errors.clear();
        Ok(count)
    }
}
