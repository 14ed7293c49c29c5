//! The generation engine: schedules every mock generation on a tokio timer.
//!
//! A start registers its [`GenerationKey`], applies the in-progress marker
//! to the store synchronously, then spawns a task that sleeps for the
//! (scaled) mock delay. When the timer fires the task applies the result
//! only if its ticket is still registered, and keeps the key registered
//! until the write lands; cancellation removes the ticket and reverts the
//! in-progress marker immediately.

use std::sync::Arc;
use std::time::Duration;

use vidu_core::generation::{scaled, staggered, GenerationKey};
use vidu_core::status::GenerationStatus;
use vidu_db::repositories::{EpisodeRepo, ScriptConversionRepo};
use vidu_db::DbPool;
use vidu_events::{event_types, EventBus, StudioEvent};

use crate::error::PipelineError;
use crate::outcome::OutcomeProvider;
use crate::registry::{Completion, InFlightRegistry, Ticket};

/// Result of asking the engine to start something.
#[derive(Debug, Clone, PartialEq)]
pub enum Launch<T = ()> {
    /// A generation was scheduled.
    Started(T),
    /// Nothing to do; the reason is shown to the user.
    Skipped(&'static str),
}

impl<T> Launch<T> {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Multiplier applied to every mock delay.
    pub time_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

#[derive(Clone)]
pub struct GenerationEngine {
    pub(crate) store: DbPool,
    pub(crate) events: Arc<EventBus>,
    pub(crate) outcome: Arc<dyn OutcomeProvider>,
    pub(crate) registry: Arc<InFlightRegistry>,
    pub(crate) config: EngineConfig,
}

impl GenerationEngine {
    pub fn new(
        store: DbPool,
        events: Arc<EventBus>,
        outcome: Arc<dyn OutcomeProvider>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            events,
            outcome,
            registry: Arc::new(InFlightRegistry::new()),
            config,
        }
    }

    pub fn registry(&self) -> &InFlightRegistry {
        &self.registry
    }

    pub(crate) fn delay(&self, base_ms: u64) -> Duration {
        scaled(base_ms, self.config.time_scale)
    }

    pub(crate) fn stagger(&self, base_ms: u64, step_ms: u64, index: usize) -> Duration {
        staggered(base_ms, step_ms, index, self.config.time_scale)
    }

    /// Sleep for `delay` unless cancelled first. Returns the completion
    /// when the caller still owns the key; hold it until the result is
    /// written.
    pub(crate) async fn wait(&self, ticket: &Ticket, delay: Duration) -> Option<Completion<'_>> {
        tokio::select! {
            _ = ticket.cancelled() => None,
            _ = tokio::time::sleep(delay) => self.registry.complete(ticket).await,
        }
    }

    pub(crate) fn emit(&self, event_type: &str, key: GenerationKey, payload: serde_json::Value) {
        let mut payload = payload;
        if let serde_json::Value::Object(map) = &mut payload {
            map.insert("key".to_string(), serde_json::json!(key));
        }
        let mut event = StudioEvent::new(event_type).with_payload(payload);
        if let Some((entity, id)) = entity_of(key) {
            event = event.with_entity(entity, id);
        }
        self.events.publish(event);
    }

    pub(crate) fn emit_started(&self, key: GenerationKey) {
        tracing::debug!(%key, "Generation started");
        self.emit(event_types::GENERATION_STARTED, key, serde_json::json!({}));
    }

    // -----------------------------------------------------------------------
    // Cancellation
    // -----------------------------------------------------------------------

    /// Cancel one generation (and, for a batch, every record it scheduled).
    pub async fn cancel(&self, key: GenerationKey) -> Result<Vec<GenerationKey>, PipelineError> {
        let cancelled = self.registry.cancel(key).await;
        self.revert(&cancelled).await?;
        Ok(cancelled)
    }

    /// Cancel every generation in flight.
    pub async fn cancel_all(&self) -> Result<Vec<GenerationKey>, PipelineError> {
        let cancelled = self.registry.cancel_all().await;
        if !cancelled.is_empty() {
            tracing::info!(count = cancelled.len(), "Cancelled all generations");
        }
        self.revert(&cancelled).await?;
        Ok(cancelled)
    }

    async fn revert(&self, keys: &[GenerationKey]) -> Result<(), PipelineError> {
        for key in keys {
            match *key {
                GenerationKey::Shot(shot_id) => {
                    EpisodeRepo::reset_generating_shot(&self.store, shot_id).await?;
                }
                GenerationKey::ScriptConversion(id) => {
                    ScriptConversionRepo::set_status(&self.store, id, GenerationStatus::Pending)
                        .await?;
                }
                _ => {}
            }
            tracing::debug!(%key, "Generation cancelled");
            self.emit(event_types::GENERATION_CANCELLED, *key, serde_json::json!({}));
        }
        Ok(())
    }
}

fn entity_of(key: GenerationKey) -> Option<(&'static str, i64)> {
    match key {
        GenerationKey::ScriptConversion(id) => Some(("script_conversion", id)),
        GenerationKey::StateImage(id) => Some(("asset_state", id)),
        GenerationKey::Storyboard(id) | GenerationKey::EpisodeBatch(id) => Some(("episode", id)),
        GenerationKey::Shot(id) => Some(("shot", id)),
        GenerationKey::ExtractAssets
        | GenerationKey::AssetDetails
        | GenerationKey::AllImages
        | GenerationKey::ChatReply => None,
    }
}
