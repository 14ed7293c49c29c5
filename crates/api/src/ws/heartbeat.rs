use std::sync::Arc;
use std::time::Duration;

use vidu_db::repositories::SessionRepo;
use vidu_db::DbPool;

use crate::ws::manager::WsManager;

/// Seconds between heartbeat rounds.
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn the socket heartbeat. Abort the returned handle on shutdown.
///
/// Each round pings every socket, drops expired sessions from the store,
/// and hangs up sockets whose session is no longer active.
pub fn start_heartbeat(ws_manager: Arc<WsManager>, pool: DbPool) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
        loop {
            interval.tick().await;
            heartbeat_round(&ws_manager, &pool).await;
        }
    })
}

/// One heartbeat round. Returns the number of sockets hung up.
pub async fn heartbeat_round(ws_manager: &WsManager, pool: &DbPool) -> usize {
    ws_manager.ping_all().await;
    match SessionRepo::purge_expired(pool).await {
        Ok(0) => {}
        Ok(purged) => tracing::debug!(purged, "Expired sessions purged"),
        Err(e) => tracing::warn!(error = %e, "Session purge failed"),
    }

    let mut closed = 0;
    for session in ws_manager.sessions().await {
        match SessionRepo::is_active(pool, &session.jti, session.user_id).await {
            Ok(true) => {}
            Ok(false) => closed += ws_manager.close_session(&session.jti).await,
            Err(e) => tracing::warn!(error = %e, user_id = session.user_id, "Session check failed"),
        }
    }
    let sockets = ws_manager.connection_count().await;
    tracing::debug!(
        sockets,
        closed,
        "Socket heartbeat"
    );
    closed
}
