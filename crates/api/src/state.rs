use std::sync::Arc;

use vidu_events::EventBus;
use vidu_genai::GenAiClient;
use vidu_pipeline::{EngineConfig, GenerationEngine, OutcomeProvider};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc` or is itself a handle.
#[derive(Clone)]
pub struct AppState {
    /// The in-memory studio store.
    pub pool: vidu_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Event bus every state transition is published on.
    pub event_bus: Arc<EventBus>,
    /// Mock generation engine.
    pub engine: GenerationEngine,
    /// Generative-AI client; offline unless an API key is configured.
    pub genai: GenAiClient,
}

impl AppState {
    /// Wire the engine and clients around an already seeded store.
    pub fn new(
        pool: vidu_db::DbPool,
        config: ServerConfig,
        outcome: Arc<dyn OutcomeProvider>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let engine = GenerationEngine::new(
            pool.clone(),
            Arc::clone(&event_bus),
            outcome,
            EngineConfig {
                time_scale: config.generation.time_scale,
            },
        );
        let genai = GenAiClient::new(config.gemini_api_key.clone());
        Self {
            pool,
            config: Arc::new(config),
            ws_manager: Arc::new(WsManager::new()),
            event_bus,
            engine,
            genai,
        }
    }
}
