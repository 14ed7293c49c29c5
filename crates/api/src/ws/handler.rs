use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use vidu_core::error::CoreError;
use vidu_db::repositories::SessionRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;
use crate::ws::manager::{SocketSession, WsManager};

/// Browsers cannot set headers on a WebSocket upgrade, so the token rides
/// in the query string.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// The `?token=` must be valid and its session still active. Runs before
/// the upgrade, so a rejected client gets a plain 401.
impl FromRequestParts<AppState> for SocketSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = Query::<WsParams>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(params)| params.token)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing token query parameter".into()))
            })?;

        let claims = validate_token(&token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;
        if !SessionRepo::is_active(&state.pool, &claims.jti, claims.sub).await? {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Session has ended. Log in again.".into(),
            )));
        }

        Ok(SocketSession {
            jti: claims.jti,
            user_id: claims.sub,
        })
    }
}

/// GET /api/v1/ws?token=...
///
/// Upgrades to a socket that receives every studio event until the session
/// ends.
pub async fn ws_handler(
    session: SocketSession,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager, session))
}

/// Register the socket, pump its outbound channel into the sink, and drain
/// inbound frames until either side hangs up.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, session: SocketSession) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = session.user_id, "Event socket opened");

    let mut rx = ws_manager.register(conn_id.clone(), session).await;
    let (mut sink, mut stream) = socket.split();

    let writer_conn_id = conn_id.clone();
    let mut writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                break;
            }
        }
        tracing::debug!(conn_id = %writer_conn_id, "Socket writer finished");
    });

    loop {
        tokio::select! {
            // The server hung up: session ended or shutdown.
            _ = &mut writer => break,
            frame = stream.next() => match frame {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Pong(_))) => {
                    tracing::trace!(conn_id = %conn_id, "Pong received");
                }
                // Clients only listen.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "Socket receive error");
                    break;
                }
            },
        }
    }

    ws_manager.remove(&conn_id).await;
    writer.abort();
    tracing::info!(conn_id = %conn_id, "Event socket closed");
}
