//! Mock storyboard and shot-video generation.

use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use vidu_core::error::CoreError;
use vidu_core::generation::{GenerationKey, SHOT_STAGGER_MS, SHOT_VIDEO_MS, STORYBOARD_MS};
use vidu_core::status::GenerationStatus;
use vidu_core::storyboard::split_into_shots;
use vidu_core::types::DbId;
use vidu_db::repositories::EpisodeRepo;
use vidu_events::event_types;

use crate::engine::{GenerationEngine, Launch};
use crate::error::PipelineError;
use crate::outcome::ShotOutcome;
use crate::registry::Ticket;

/// Source material of a whole-episode render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EpisodeMode {
    #[default]
    Text,
    Image,
}

impl GenerationEngine {
    /// Split the episode script into pending shots.
    pub async fn generate_storyboard(&self, episode_id: DbId) -> Result<Launch, PipelineError> {
        let episode = EpisodeRepo::find_by_id(&self.store, episode_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "episode",
                id: episode_id,
            })?;
        if episode.script_content.trim().is_empty() {
            return Ok(Launch::Skipped("剧本为空"));
        }
        let ticket = self.registry.begin(GenerationKey::Storyboard(episode_id)).await?;
        self.emit_started(ticket.key());

        let engine = self.clone();
        let delay = self.delay(STORYBOARD_MS);
        tokio::spawn(async move {
            let Some(_completion) = engine.wait(&ticket, delay).await else {
                return;
            };
            // Read the script again; it may have been edited meanwhile.
            let script = match EpisodeRepo::find_by_id(&engine.store, episode_id).await {
                Ok(Some(episode)) => episode.script_content,
                Ok(None) => return,
                Err(e) => {
                    tracing::error!(error = %e, episode_id, "Storyboard lookup failed");
                    return;
                }
            };
            let shots = split_into_shots(&script);
            let count = shots.len();
            match EpisodeRepo::replace_shots(&engine.store, episode_id, shots).await {
                Ok(_) => {
                    tracing::info!(episode_id, shots = count, "Storyboard generated");
                    engine.emit(
                        event_types::GENERATION_COMPLETED,
                        ticket.key(),
                        serde_json::json!({ "shots": count }),
                    );
                }
                Err(e) => tracing::error!(error = %e, episode_id, "Storyboard failed"),
            }
        });
        Ok(Launch::Started(()))
    }

    /// Render one shot. The shot is `GENERATING` when this returns. Calling
    /// it again on an `ERROR` shot is a retry.
    pub async fn generate_shot(
        &self,
        episode_id: DbId,
        shot_id: DbId,
    ) -> Result<Launch, PipelineError> {
        EpisodeRepo::find_shot(&self.store, episode_id, shot_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "shot",
                id: shot_id,
            })?;
        let ticket = self.registry.begin(GenerationKey::Shot(shot_id)).await?;
        EpisodeRepo::set_shot_status(&self.store, episode_id, shot_id, GenerationStatus::Generating)
            .await?;
        self.emit_started(ticket.key());

        let engine = self.clone();
        let delay = self.delay(SHOT_VIDEO_MS);
        tokio::spawn(async move {
            engine.run_shot(episode_id, &ticket, delay).await;
        });
        Ok(Launch::Started(()))
    }

    /// Render every shot that is neither completed nor already rendering,
    /// staggered by position. Shots without a description are skipped.
    pub async fn generate_episode(
        &self,
        episode_id: DbId,
        mode: EpisodeMode,
    ) -> Result<Launch<usize>, PipelineError> {
        let episode = EpisodeRepo::find_by_id(&self.store, episode_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "episode",
                id: episode_id,
            })?;
        let keys: Vec<GenerationKey> = episode
            .shots
            .iter()
            .filter(|s| s.status != GenerationStatus::Completed && !s.description.trim().is_empty())
            .map(|s| GenerationKey::Shot(s.id))
            .collect();
        if keys.is_empty() {
            return Ok(Launch::Skipped("没有待生成的镜头"));
        }
        let batch_key = GenerationKey::EpisodeBatch(episode_id);
        let (batch, tickets) = self.registry.begin_batch(batch_key, &keys).await?;
        if tickets.is_empty() {
            self.registry.finish(&batch).await;
            return Ok(Launch::Skipped("所有镜头都在生成中"));
        }
        for ticket in &tickets {
            if let GenerationKey::Shot(shot_id) = ticket.key() {
                EpisodeRepo::set_shot_status(
                    &self.store,
                    episode_id,
                    shot_id,
                    GenerationStatus::Generating,
                )
                .await?;
            }
        }
        let scheduled = tickets.len();
        tracing::info!(episode_id, shots = scheduled, ?mode, "Episode render started");
        self.emit(
            event_types::GENERATION_STARTED,
            batch_key,
            serde_json::json!({ "mode": mode, "shots": scheduled }),
        );

        let engine = self.clone();
        tokio::spawn(async move {
            let runs = tickets.iter().enumerate().map(|(index, ticket)| {
                let delay = engine.stagger(SHOT_VIDEO_MS, SHOT_STAGGER_MS, index);
                engine.run_shot(episode_id, ticket, delay)
            });
            join_all(runs).await;
            if engine.registry.finish(&batch).await {
                engine.emit(event_types::GENERATION_COMPLETED, batch_key, serde_json::json!({}));
            }
        });
        Ok(Launch::Started(scheduled))
    }

    async fn run_shot(&self, episode_id: DbId, ticket: &Ticket, delay: Duration) {
        let Some(_completion) = self.wait(ticket, delay).await else {
            return;
        };
        let GenerationKey::Shot(shot_id) = ticket.key() else {
            return;
        };
        match self.outcome.shot_outcome(shot_id).await {
            ShotOutcome::Success => {
                match EpisodeRepo::complete_shot(&self.store, episode_id, shot_id).await {
                    Ok(Some(shot)) => self.emit(
                        event_types::GENERATION_COMPLETED,
                        ticket.key(),
                        serde_json::json!({ "episode_id": episode_id, "video_url": shot.video_url }),
                    ),
                    Ok(None) => tracing::debug!(shot_id, "Shot removed before render finished"),
                    Err(e) => tracing::error!(error = %e, shot_id, "Failed to store shot video"),
                }
            }
            ShotOutcome::Failure { message, detail } => {
                tracing::warn!(shot_id, episode_id, %message, "Shot render failed");
                match EpisodeRepo::fail_shot(&self.store, episode_id, shot_id, &message, &detail).await
                {
                    Ok(Some(error)) => self.emit(
                        event_types::GENERATION_FAILED,
                        ticket.key(),
                        serde_json::json!({ "episode_id": episode_id, "error_id": error.id, "message": message }),
                    ),
                    Ok(None) => tracing::debug!(shot_id, "Shot removed before render failed"),
                    Err(e) => tracing::error!(error = %e, shot_id, "Failed to record shot failure"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use vidu_db::models::episode::CreateShot;
    use vidu_db::repositories::GenerationErrorRepo;
    use vidu_db::DbPool;

    use super::*;
    use crate::outcome::FixedOutcome;
    use crate::test_support::{engine_with, settle};

    async fn episode_with_shots(store: &DbPool, descriptions: &[&str]) -> (DbId, Vec<DbId>) {
        let episode_id = EpisodeRepo::list(store).await.unwrap()[0].id;
        let mut ids = Vec::new();
        for d in descriptions {
            let shot = EpisodeRepo::add_shot(
                store,
                episode_id,
                &CreateShot { description: d.to_string(), duration: None },
            )
            .await
            .unwrap()
            .unwrap();
            ids.push(shot.id);
        }
        (episode_id, ids)
    }

    async fn status(store: &DbPool, episode_id: DbId, shot_id: DbId) -> GenerationStatus {
        EpisodeRepo::find_shot(store, episode_id, shot_id).await.unwrap().unwrap().status
    }

    #[tokio::test(start_paused = true)]
    async fn shot_is_generating_before_completed() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        let (ep, shots) = episode_with_shots(&store, &["雨夜街道"]).await;
        assert_eq!(status(&store, ep, shots[0]).await, GenerationStatus::Pending);

        engine.generate_shot(ep, shots[0]).await.unwrap();
        assert_eq!(status(&store, ep, shots[0]).await, GenerationStatus::Generating);

        settle(SHOT_VIDEO_MS).await;
        let shot = EpisodeRepo::find_shot(&store, ep, shots[0]).await.unwrap().unwrap();
        assert_eq!(shot.status, GenerationStatus::Completed);
        assert_eq!(
            shot.video_url.as_deref(),
            Some(format!("https://mock-video.local/shots/{}/v1.mp4", shots[0]).as_str())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rendering_shot_rejects_second_start() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        let (ep, shots) = episode_with_shots(&store, &["a"]).await;
        engine.generate_shot(ep, shots[0]).await.unwrap();
        assert_matches!(
            engine.generate_shot(ep, shots[0]).await,
            Err(PipelineError::Core(CoreError::Conflict(_)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failure_records_error_and_retry_recovers() {
        let (engine, store) = engine_with(FixedOutcome::failure()).await;
        let (ep, shots) = episode_with_shots(&store, &["a"]).await;
        engine.generate_shot(ep, shots[0]).await.unwrap();
        settle(SHOT_VIDEO_MS).await;
        assert_eq!(status(&store, ep, shots[0]).await, GenerationStatus::Error);
        let errors = GenerationErrorRepo::list(&store).await.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "视频生成失败");
        assert_eq!(errors[0].shot_index, 1);

        // A retry goes through GENERATING again.
        engine.generate_shot(ep, shots[0]).await.unwrap();
        assert_eq!(status(&store, ep, shots[0]).await, GenerationStatus::Generating);
    }

    #[tokio::test(start_paused = true)]
    async fn episode_batch_skips_completed_and_blank_shots() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        let (ep, shots) = episode_with_shots(&store, &["a", "", "c"]).await;
        EpisodeRepo::complete_shot(&store, ep, shots[2]).await.unwrap();

        let launch = engine.generate_episode(ep, EpisodeMode::Text).await.unwrap();
        assert_eq!(launch, Launch::Started(1));
        assert_eq!(status(&store, ep, shots[0]).await, GenerationStatus::Generating);
        assert_eq!(status(&store, ep, shots[1]).await, GenerationStatus::Pending);
        assert_matches!(
            engine.generate_episode(ep, EpisodeMode::Image).await,
            Err(PipelineError::Core(CoreError::Conflict(_)))
        );

        settle(SHOT_VIDEO_MS).await;
        assert_eq!(status(&store, ep, shots[0]).await, GenerationStatus::Completed);
        assert!(engine.registry().keys().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn episode_batch_leaves_rendering_shots_alone() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        let (ep, shots) = episode_with_shots(&store, &["a", "b"]).await;
        engine.generate_shot(ep, shots[0]).await.unwrap();
        let launch = engine.generate_episode(ep, EpisodeMode::Text).await.unwrap();
        assert_eq!(launch, Launch::Started(1));
    }

    #[tokio::test(start_paused = true)]
    async fn batch_completions_are_staggered() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        let (ep, shots) = episode_with_shots(&store, &["a", "b", "c"]).await;
        engine.generate_episode(ep, EpisodeMode::Text).await.unwrap();

        tokio::time::sleep(Duration::from_millis(SHOT_VIDEO_MS + SHOT_STAGGER_MS + 1)).await;
        assert_eq!(status(&store, ep, shots[0]).await, GenerationStatus::Completed);
        assert_eq!(status(&store, ep, shots[1]).await, GenerationStatus::Completed);
        assert_eq!(status(&store, ep, shots[2]).await, GenerationStatus::Generating);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_shots_return_to_pending() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        let (ep, shots) = episode_with_shots(&store, &["a", "b"]).await;
        engine.generate_episode(ep, EpisodeMode::Text).await.unwrap();

        let cancelled = engine.cancel(GenerationKey::EpisodeBatch(ep)).await.unwrap();
        assert_eq!(cancelled.len(), 3);
        assert_eq!(status(&store, ep, shots[0]).await, GenerationStatus::Pending);
        assert_eq!(status(&store, ep, shots[1]).await, GenerationStatus::Pending);

        settle(SHOT_VIDEO_MS + SHOT_STAGGER_MS).await;
        assert_eq!(status(&store, ep, shots[0]).await, GenerationStatus::Pending);
        assert!(EpisodeRepo::find_shot(&store, ep, shots[0]).await.unwrap().unwrap().video_url.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_stops_everything() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        let (ep, shots) = episode_with_shots(&store, &["a"]).await;
        engine.generate_shot(ep, shots[0]).await.unwrap();
        engine.convert_script("解说").await.unwrap();
        assert_eq!(engine.cancel_all().await.unwrap().len(), 2);
        settle(SHOT_VIDEO_MS).await;
        assert_eq!(status(&store, ep, shots[0]).await, GenerationStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn storyboard_splits_script() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        let ep = EpisodeRepo::list(&store).await.unwrap()[0].id;
        assert_eq!(engine.generate_storyboard(ep).await.unwrap(), Launch::Skipped("剧本为空"));

        EpisodeRepo::update_script(&store, ep, "第一段\n\n第二段").await.unwrap();
        engine.generate_storyboard(ep).await.unwrap();
        settle(STORYBOARD_MS).await;
        let episode = EpisodeRepo::find_by_id(&store, ep).await.unwrap().unwrap();
        assert_eq!(episode.shots.len(), 2);
        assert!(episode.shots.iter().all(|s| s.duration == 5.0 && s.status == GenerationStatus::Pending));
    }
}
