//! Registry of open studio event sockets.
//!
//! Every socket belongs to the login session that opened it, so ending a
//! session (logout, deactivation, expiry) also hangs up its sockets.

use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::{close_code, CloseFrame, Message};
use tokio::sync::{mpsc, RwLock};
use vidu_core::types::{DbId, Timestamp};
use vidu_events::StudioEvent;

/// Outbound half of a socket's message channel.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// The login session behind a socket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocketSession {
    /// Token id of the session.
    pub jti: String,
    pub user_id: DbId,
}

struct EventSocket {
    session: SocketSession,
    sender: WsSender,
    connected_at: Timestamp,
}

/// Open event sockets keyed by connection id.
///
/// Wrap in `Arc` and share; all access goes through an interior `RwLock`.
pub struct WsManager {
    sockets: RwLock<HashMap<String, EventSocket>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            sockets: RwLock::new(HashMap::new()),
        }
    }

    /// Register a socket for `session` and return the receiver its writer
    /// task drains.
    pub async fn register(
        &self,
        conn_id: String,
        session: SocketSession,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let socket = EventSocket {
            session,
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.sockets.write().await.insert(conn_id, socket);
        rx
    }

    /// Forget a socket after its client went away.
    pub async fn remove(&self, conn_id: &str) {
        if let Some(socket) = self.sockets.write().await.remove(conn_id) {
            let open_secs = (chrono::Utc::now() - socket.connected_at).num_seconds();
            tracing::debug!(conn_id, user_id = socket.session.user_id, open_secs, "Socket removed");
        }
    }

    /// Send a studio event to every socket as a JSON text frame. Returns the
    /// number of sockets it was queued on.
    pub async fn publish(&self, event: &StudioEvent) -> Result<usize, serde_json::Error> {
        let frame = Message::Text(serde_json::to_string(event)?.into());
        let sockets = self.sockets.read().await;
        Ok(sockets
            .values()
            .filter(|socket| socket.sender.send(frame.clone()).is_ok())
            .count())
    }

    /// Hang up every socket opened by the session `jti`.
    pub async fn close_session(&self, jti: &str) -> usize {
        self.close_where(|session| session.jti == jti, "Session ended").await
    }

    /// Hang up every socket of `user_id`, whatever session opened it.
    pub async fn close_user(&self, user_id: DbId) -> usize {
        self.close_where(|session| session.user_id == user_id, "Account signed out")
            .await
    }

    /// Distinct sessions that currently hold at least one socket.
    pub async fn sessions(&self) -> Vec<SocketSession> {
        let sockets = self.sockets.read().await;
        let unique: HashSet<_> = sockets.values().map(|s| s.session.clone()).collect();
        unique.into_iter().collect()
    }

    pub async fn connection_count(&self) -> usize {
        self.sockets.read().await.len()
    }

    /// Send a Close frame to every socket, then forget them all.
    pub async fn shutdown_all(&self) {
        let mut sockets = self.sockets.write().await;
        let count = sockets.len();
        for socket in sockets.values() {
            let _ = socket.sender.send(Message::Close(None));
        }
        sockets.clear();
        tracing::info!(count, "Closed all event sockets");
    }

    pub async fn ping_all(&self) {
        let sockets = self.sockets.read().await;
        for socket in sockets.values() {
            let _ = socket.sender.send(Message::Ping(Bytes::new()));
        }
    }

    async fn close_where(
        &self,
        matches: impl Fn(&SocketSession) -> bool,
        reason: &'static str,
    ) -> usize {
        let mut sockets = self.sockets.write().await;
        let before = sockets.len();
        sockets.retain(|_, socket| {
            if !matches(&socket.session) {
                return true;
            }
            let _ = socket.sender.send(Message::Close(Some(CloseFrame {
                code: close_code::POLICY,
                reason: reason.into(),
            })));
            false
        });
        let closed = before - sockets.len();
        if closed > 0 {
            tracing::info!(closed, reason, "Closed event sockets");
        }
        closed
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
