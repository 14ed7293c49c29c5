use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidu_api::auth::password::hash_password;
use vidu_api::config::ServerConfig;
use vidu_api::router::build_app_router;
use vidu_api::state::AppState;
use vidu_api::ws;
use vidu_core::users::DEFAULT_PASSWORD;
use vidu_pipeline::SimulatedOutcome;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "vidu_api=debug,vidu_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        failure_rate = config.generation.failure_rate,
        time_scale = config.generation.time_scale,
        genai_online = config.gemini_api_key.is_some(),
        "Loaded server configuration"
    );

    // --- Store ---
    let pool = vidu_db::create_store();
    let admin_hash = hash_password(DEFAULT_PASSWORD).expect("Failed to hash seed password");
    vidu_db::seed_defaults(&pool, &admin_hash)
        .await
        .expect("Failed to seed studio store");
    vidu_db::health_check(&pool)
        .await
        .expect("Store health check failed");
    tracing::info!("Studio store seeded");

    // --- App state ---
    let outcome = Arc::new(SimulatedOutcome::new(config.generation.failure_rate));
    let state = AppState::new(pool, config.clone(), outcome);

    // --- Background tasks ---
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&state.ws_manager), state.pool.clone());
    let forwarder_handle =
        ws::start_event_forwarder(Arc::clone(&state.ws_manager), state.event_bus.subscribe());
    tracing::info!("WebSocket heartbeat and event forwarder started");

    let engine = state.engine.clone();
    let ws_manager = Arc::clone(&state.ws_manager);
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    match engine.cancel_all().await {
        Ok(cancelled) => tracing::info!(count = cancelled.len(), "Pending generations cancelled"),
        Err(e) => tracing::error!(error = %e, "Failed to cancel pending generations"),
    }

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    forwarder_handle.abort();
    heartbeat_handle.abort();
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
