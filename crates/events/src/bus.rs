//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans every [`StudioEvent`] out to all subscribers (the
//! WebSocket forwarder, tests). Share it via `Arc<EventBus>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use vidu_core::types::DbId;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

pub mod event_types {
    pub const GENERATION_STARTED: &str = "generation.started";
    pub const GENERATION_COMPLETED: &str = "generation.completed";
    pub const GENERATION_FAILED: &str = "generation.failed";
    pub const GENERATION_CANCELLED: &str = "generation.cancelled";

    pub const PROJECT_CREATED: &str = "project.created";
    pub const PROJECT_DELETED: &str = "project.deleted";
    pub const ASSETS_REPLACED: &str = "assets.replaced";
    pub const MASTER_LIBRARY_SYNCED: &str = "master_library.synced";
    pub const TIMELINE_EXPORTED: &str = "timeline.exported";
    pub const CHAT_REPLIED: &str = "chat.replied";
    pub const SESSION_ENDED: &str = "session.ended";
}

// ---------------------------------------------------------------------------
// StudioEvent
// ---------------------------------------------------------------------------

/// Something that happened in the studio.
///
/// Built with [`StudioEvent::new`] and the `with_*` methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioEvent {
    /// Dot-separated event name, e.g. `"generation.completed"`.
    pub event_type: String,

    /// Kind of record the event concerns (`"shot"`, `"asset_state"`, ...).
    pub entity_type: Option<String>,

    pub entity_id: Option<DbId>,

    /// User whose request triggered the event.
    pub actor_user_id: Option<DbId>,

    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl StudioEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            entity_type: None,
            entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_entity(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use vidu_events::bus::{EventBus, StudioEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(StudioEvent::new("project.created"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<StudioEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity. Slow receivers
    /// observe `RecvError::Lagged` once the buffer overflows.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Dropped silently when
    /// nobody is subscribed.
    pub fn publish(&self, event: StudioEvent) {
        tracing::trace!(event_type = %event.event_type, "Publishing event");
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_enriched_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            StudioEvent::new(event_types::GENERATION_COMPLETED)
                .with_entity("shot", 42)
                .with_actor(7)
                .with_payload(serde_json::json!({"status": "COMPLETED"})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "generation.completed");
        assert_eq!(received.entity_type.as_deref(), Some("shot"));
        assert_eq!(received.entity_id, Some(42));
        assert_eq!(received.actor_user_id, Some(7));
        assert_eq!(received.payload["status"], "COMPLETED");
    }

    #[tokio::test]
    async fn every_subscriber_gets_a_copy() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(StudioEvent::new(event_types::CHAT_REPLIED));

        assert_eq!(rx1.recv().await.unwrap().event_type, "chat.replied");
        assert_eq!(rx2.recv().await.unwrap().event_type, "chat.replied");
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(StudioEvent::new("orphan.event"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn bare_event_has_empty_payload_object() {
        let event = StudioEvent::new("bare.event");
        assert!(event.entity_type.is_none());
        assert!(event.actor_user_id.is_none());
        assert!(event.payload.is_object());
    }
}
