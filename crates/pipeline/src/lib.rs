//! Mock generation engine.
//!
//! Every "generate" action of the studio is simulated: the engine marks the
//! target as in progress, waits a fixed (scalable) delay on a tokio timer,
//! and then writes a canned result. [`InFlightRegistry`] guarantees one run
//! per key and discards stale completions; [`OutcomeProvider`] decides
//! whether a shot render succeeds.

pub mod assets;
pub mod chat;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod registry;
pub mod scripts;
pub mod video;

pub use engine::{EngineConfig, GenerationEngine, Launch};
pub use error::PipelineError;
pub use outcome::{FixedOutcome, OutcomeProvider, ShotOutcome, SimulatedOutcome};
pub use registry::{Completion, InFlightRegistry, Ticket};
pub use video::EpisodeMode;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use vidu_db::{create_store, seed_defaults, DbPool};
    use vidu_events::EventBus;

    use crate::engine::{EngineConfig, GenerationEngine};
    use crate::outcome::OutcomeProvider;

    pub async fn engine_with(outcome: impl OutcomeProvider + 'static) -> (GenerationEngine, DbPool) {
        let store = create_store();
        seed_defaults(&store, "hash").await.expect("seed");
        let engine = GenerationEngine::new(
            store.clone(),
            Arc::new(EventBus::default()),
            Arc::new(outcome),
            EngineConfig::default(),
        );
        (engine, store)
    }

    /// Let paused time run just past `ms`.
    pub async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms + 1)).await;
    }
}
