//! Mock asset extraction, detail generation, and image generation.

use std::collections::BTreeMap;

use futures::future::join_all;
use vidu_core::asset::apply_regenerated;
use vidu_core::catalog::{find_state_detail, SEED_WORLDVIEW, SKELETON_ASSETS};
use vidu_core::error::CoreError;
use vidu_core::generation::{
    batch_main_image_url, batch_thumbnail_urls, regenerated_image_url, GenerationKey,
    ALL_IMAGES_MS, ASSET_DETAILS_MS, EXTRACT_ASSETS_MS, IMAGE_STAGGER_MS, STATE_IMAGE_MS,
};
use vidu_core::settings::ConfigKey;
use vidu_core::types::DbId;
use vidu_db::models::asset::{Asset, CreateWorldviewEntry};
use vidu_db::repositories::{AgentSettingsRepo, AssetRepo, WorldviewRepo};
use vidu_db::DbError;
use vidu_events::event_types;

use crate::engine::{GenerationEngine, Launch};
use crate::error::PipelineError;
use crate::registry::Ticket;

impl GenerationEngine {
    // -----------------------------------------------------------------------
    // Extraction
    // -----------------------------------------------------------------------

    /// Replace the asset list with the skeleton catalog and, when the
    /// worldview agent is enabled, the worldview with the canned factions.
    pub async fn extract_assets(&self) -> Result<Launch, PipelineError> {
        let ticket = self.registry.begin(GenerationKey::ExtractAssets).await?;
        self.emit_started(ticket.key());

        let engine = self.clone();
        let delay = self.delay(EXTRACT_ASSETS_MS);
        tokio::spawn(async move {
            let Some(_completion) = engine.wait(&ticket, delay).await else {
                return;
            };
            if let Err(e) = engine.apply_extraction().await {
                tracing::error!(error = %e, "Asset extraction failed");
            }
        });
        Ok(Launch::Started(()))
    }

    async fn apply_extraction(&self) -> Result<(), DbError> {
        let assets: Vec<Asset> = SKELETON_ASSETS
            .iter()
            .map(|seed| Asset {
                id: self.store.next_id(),
                name: seed.name.to_string(),
                asset_type: seed.asset_type,
                description: seed.description.to_string(),
                in_master_lib: seed.in_master_lib,
                image_url: None,
                states: seed
                    .states
                    .iter()
                    .map(|s| AssetRepo::new_state(&self.store, s.name, s.description))
                    .collect(),
            })
            .collect();
        let assets = AssetRepo::replace_all(&self.store, assets).await?;

        let worldview_enabled = AgentSettingsRepo::get_one(&self.store, ConfigKey::Worldview)
            .await?
            .is_some_and(|s| s.enabled);
        if worldview_enabled {
            let entries: Vec<CreateWorldviewEntry> = SEED_WORLDVIEW
                .iter()
                .map(|w| CreateWorldviewEntry {
                    faction: w.faction.to_string(),
                    description: w.description.to_string(),
                })
                .collect();
            WorldviewRepo::replace_all(&self.store, &entries).await?;
        }

        tracing::info!(assets = assets.len(), worldview_enabled, "Assets extracted");
        self.emit(
            event_types::ASSETS_REPLACED,
            GenerationKey::ExtractAssets,
            serde_json::json!({ "count": assets.len(), "worldview": worldview_enabled }),
        );
        self.emit(
            event_types::GENERATION_COMPLETED,
            GenerationKey::ExtractAssets,
            serde_json::json!({}),
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Details
    // -----------------------------------------------------------------------

    /// Fill prompt and attributes on every state found in the detail catalog.
    pub async fn generate_details(&self) -> Result<Launch, PipelineError> {
        if AssetRepo::count(&self.store).await? == 0 {
            return Ok(Launch::Skipped("没有可生成详情的资产"));
        }
        let ticket = self.registry.begin(GenerationKey::AssetDetails).await?;
        self.emit_started(ticket.key());

        let engine = self.clone();
        let delay = self.delay(ASSET_DETAILS_MS);
        tokio::spawn(async move {
            let Some(_completion) = engine.wait(&ticket, delay).await else {
                return;
            };
            let filled = AssetRepo::fill_details(&engine.store, |asset, state| {
                find_state_detail(asset, state).map(|d| {
                    let attributes: BTreeMap<String, String> = d
                        .attributes
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect();
                    (d.prompt.to_string(), attributes)
                })
            })
            .await;
            match filled {
                Ok(count) => {
                    tracing::info!(states = count, "Asset details generated");
                    engine.emit(
                        event_types::GENERATION_COMPLETED,
                        ticket.key(),
                        serde_json::json!({ "states": count }),
                    );
                }
                Err(e) => tracing::error!(error = %e, "Detail generation failed"),
            }
        });
        Ok(Launch::Started(()))
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    /// Regenerate the main image of one state. Only states with a prompt
    /// can be generated.
    pub async fn generate_state_image(
        &self,
        asset_id: DbId,
        state_id: DbId,
    ) -> Result<Launch, PipelineError> {
        let state = AssetRepo::find_state(&self.store, asset_id, state_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "asset_state",
                id: state_id,
            })?;
        if !state.has_prompt() {
            return Ok(Launch::Skipped("该状态没有提示词"));
        }
        let ticket = self.registry.begin(GenerationKey::StateImage(state_id)).await?;
        self.emit_started(ticket.key());

        let engine = self.clone();
        let delay = self.delay(STATE_IMAGE_MS);
        tokio::spawn(async move {
            let Some(_completion) = engine.wait(&ticket, delay).await else {
                return;
            };
            let url = regenerated_image_url(state_id, ticket.id());
            let result = AssetRepo::modify_state(&engine.store, asset_id, state_id, |s| {
                apply_regenerated(&mut s.main_image_url, &mut s.thumbnail_urls, &url);
                Ok(())
            })
            .await;
            match result {
                Ok(Some(_)) => engine.emit(
                    event_types::GENERATION_COMPLETED,
                    ticket.key(),
                    serde_json::json!({ "asset_id": asset_id, "image_url": url }),
                ),
                Ok(None) => tracing::debug!(state_id, "State removed before image completed"),
                Err(e) => tracing::error!(error = %e, state_id, "Image generation failed"),
            }
        });
        Ok(Launch::Started(()))
    }

    /// One-click image generation for every state with a prompt. Existing
    /// images are kept; states without any get the batch placeholders.
    pub async fn generate_all_images(&self) -> Result<Launch<usize>, PipelineError> {
        let states = AssetRepo::states_with_prompt(&self.store).await?;
        if states.is_empty() {
            return Ok(Launch::Skipped("没有带提示词的状态"));
        }
        let keys: Vec<GenerationKey> = states
            .iter()
            .map(|(_, state_id)| GenerationKey::StateImage(*state_id))
            .collect();
        let (batch, tickets) = self.registry.begin_batch(GenerationKey::AllImages, &keys).await?;
        if tickets.is_empty() {
            self.registry.finish(&batch).await;
            return Ok(Launch::Skipped("所有状态都在生成中"));
        }
        let scheduled = tickets.len();
        self.emit_started(batch.key());
        tracing::info!(states = scheduled, "Batch image generation started");

        let jobs: Vec<(DbId, Ticket)> = tickets
            .into_iter()
            .filter_map(|ticket| {
                let GenerationKey::StateImage(state_id) = ticket.key() else {
                    return None;
                };
                let asset_id = states.iter().find(|(_, s)| *s == state_id)?.0;
                Some((asset_id, ticket))
            })
            .collect();

        let engine = self.clone();
        tokio::spawn(async move {
            let runs = jobs.iter().enumerate().map(|(index, (asset_id, ticket))| {
                let delay = engine.stagger(ALL_IMAGES_MS, IMAGE_STAGGER_MS, index);
                engine.run_batch_image(*asset_id, ticket, delay)
            });
            join_all(runs).await;
            if engine.registry.finish(&batch).await {
                engine.emit(event_types::GENERATION_COMPLETED, batch.key(), serde_json::json!({}));
            }
        });
        Ok(Launch::Started(scheduled))
    }

    async fn run_batch_image(&self, asset_id: DbId, ticket: &Ticket, delay: std::time::Duration) {
        let Some(_completion) = self.wait(ticket, delay).await else {
            return;
        };
        let GenerationKey::StateImage(state_id) = ticket.key() else {
            return;
        };
        let result = AssetRepo::modify_state(&self.store, asset_id, state_id, |s| {
            if s.main_image_url.is_none() {
                s.main_image_url = Some(batch_main_image_url(state_id));
            }
            if s.thumbnail_urls.is_empty() {
                s.thumbnail_urls = batch_thumbnail_urls(state_id);
            }
            Ok(())
        })
        .await;
        match result {
            Ok(_) => self.emit(
                event_types::GENERATION_COMPLETED,
                ticket.key(),
                serde_json::json!({ "asset_id": asset_id }),
            ),
            Err(e) => tracing::error!(error = %e, state_id, "Batch image failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use vidu_core::asset::AssetType;
    use vidu_db::models::asset::{CreateAsset, UpdateAssetState};
    use vidu_db::repositories::WorldviewRepo;

    use super::*;
    use crate::outcome::FixedOutcome;
    use crate::test_support::{engine_with, settle};

    #[tokio::test(start_paused = true)]
    async fn extraction_replaces_assets_and_worldview() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        engine.extract_assets().await.unwrap();
        assert_eq!(AssetRepo::count(&store).await.unwrap(), 0);

        settle(EXTRACT_ASSETS_MS).await;
        let assets = AssetRepo::list(&store, Default::default(), "").await.unwrap();
        assert_eq!(assets.len(), 11);
        assert!(assets.iter().all(|a| a.states.iter().all(|s| s.prompt.is_none())));
        assert_eq!(WorldviewRepo::list(&store).await.unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn details_fill_catalog_states() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        engine.extract_assets().await.unwrap();
        settle(EXTRACT_ASSETS_MS).await;

        engine.generate_details().await.unwrap();
        settle(ASSET_DETAILS_MS).await;
        let with_prompt = AssetRepo::states_with_prompt(&store).await.unwrap();
        assert_eq!(with_prompt.len(), 19);
    }

    #[tokio::test]
    async fn details_without_assets_is_noop() {
        let (engine, _store) = engine_with(FixedOutcome::success()).await;
        assert_eq!(
            engine.generate_details().await.unwrap(),
            Launch::Skipped("没有可生成详情的资产")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn state_without_prompt_is_left_alone() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        let asset = AssetRepo::create(
            &store,
            &CreateAsset { name: "X".into(), asset_type: AssetType::Prop, description: String::new() },
        )
        .await
        .unwrap();
        let state_id = asset.states[0].id;
        let launch = engine.generate_state_image(asset.id, state_id).await.unwrap();
        assert!(!launch.is_started());
        settle(STATE_IMAGE_MS).await;
        let state = AssetRepo::find_state(&store, asset.id, state_id).await.unwrap().unwrap();
        assert!(state.main_image_url.is_none());
        assert!(state.thumbnail_urls.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn regenerated_image_heads_history() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        let asset = AssetRepo::create(
            &store,
            &CreateAsset { name: "X".into(), asset_type: AssetType::Prop, description: String::new() },
        )
        .await
        .unwrap();
        let state_id = asset.states[0].id;
        let input = UpdateAssetState { prompt: Some("a lamp".into()), ..Default::default() };
        AssetRepo::update_state(&store, asset.id, state_id, &input).await.unwrap();

        engine.generate_state_image(asset.id, state_id).await.unwrap();
        assert!(engine.generate_state_image(asset.id, state_id).await.is_err());
        settle(STATE_IMAGE_MS).await;

        let asset = AssetRepo::find_by_id(&store, asset.id).await.unwrap().unwrap();
        let state = &asset.states[0];
        let main = state.main_image_url.clone().unwrap();
        assert!(main.starts_with(&format!("https://picsum.photos/seed/{state_id}-")));
        assert_eq!(state.thumbnail_urls[0], main);
        assert_eq!(asset.image_url.as_deref(), Some(main.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn batch_images_are_staggered() {
        let (engine, store) = engine_with(FixedOutcome::success()).await;
        engine.extract_assets().await.unwrap();
        settle(EXTRACT_ASSETS_MS).await;
        engine.generate_details().await.unwrap();
        settle(ASSET_DETAILS_MS).await;

        let Launch::Started(count) = engine.generate_all_images().await.unwrap() else {
            panic!("batch should start");
        };
        assert_eq!(count, 19);
        assert!(engine.generate_all_images().await.is_err());

        // Only the first state is due after the base delay.
        tokio::time::sleep(Duration::from_millis(ALL_IMAGES_MS + 1)).await;
        let imaged = |assets: &[Asset]| {
            assets
                .iter()
                .flat_map(|a| a.states.iter())
                .filter(|s| s.main_image_url.is_some())
                .count()
        };
        let assets = AssetRepo::list(&store, Default::default(), "").await.unwrap();
        assert_eq!(imaged(&assets), 1);

        tokio::time::sleep(Duration::from_millis(IMAGE_STAGGER_MS * 19)).await;
        let assets = AssetRepo::list(&store, Default::default(), "").await.unwrap();
        assert_eq!(imaged(&assets), 19);
        let first = assets
            .iter()
            .flat_map(|a| a.states.iter())
            .find(|s| s.has_prompt())
            .unwrap();
        assert_eq!(first.thumbnail_urls.len(), 4);
        assert!(engine.registry().keys().await.is_empty());
    }
}
