use std::sync::Arc;

use tokio::sync::broadcast;
use vidu_events::StudioEvent;

use crate::ws::manager::WsManager;

/// Relay every [`StudioEvent`] to all event sockets.
///
/// Runs until the bus is dropped. A lagging receiver skips the missed
/// events and keeps going.
pub fn start_event_forwarder(
    ws_manager: Arc<WsManager>,
    mut events: broadcast::Receiver<StudioEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Err(e) = ws_manager.publish(&event).await {
                        tracing::error!(error = %e, event_type = %event.event_type, "Failed to serialize studio event");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event forwarder lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::debug!("Event forwarder stopped");
    })
}
