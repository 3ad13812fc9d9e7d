//! WebSocket upgrade handler and per-connection event loop.

use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

use super::events::{message_text, ClientMessage, EventName};
use super::lifecycle::Gateway;
use super::session::{outbound_channel, OutboundRx, Session};

/// Handshake credentials, passed as query parameters on the upgrade request.
#[derive(Debug, Deserialize)]
pub struct HandshakeParams {
    pub username: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/gateway", get(ws_upgrade))
}

/// Admission happens here, before the upgrade response is sent. A rejected
/// attempt gets a plain HTTP error and the socket is never opened.
async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<HandshakeParams>,
) -> Result<Response, ApiError> {
    let (outbound_tx, outbound_rx) = outbound_channel();

    let session = state
        .gateway
        .connect(params.username.as_deref(), outbound_tx)
        .inspect_err(|reason| {
            tracing::debug!(%reason, username = ?params.username, "handshake rejected");
        })?;

    let gateway = state.gateway.clone();
    let failed_gateway = gateway.clone();
    let failed_user_id = session.user_id.clone();

    Ok(ws
        .on_failed_upgrade(move |err| {
            release_failed_upgrade(&failed_gateway, &failed_user_id, &err);
        })
        .on_upgrade(move |socket| handle_connection(socket, gateway, session, outbound_rx)))
}

/// The session was admitted before the upgrade; if the upgrade never
/// completes it has to be removed and its departure announced here.
fn release_failed_upgrade(gateway: &Gateway, user_id: &str, err: &axum::Error) -> bool {
    tracing::warn!(%err, %user_id, "websocket upgrade failed");
    gateway.disconnect(user_id)
}

/// Removes the session when the connection task ends, however it ends.
struct SessionGuard {
    gateway: Gateway,
    user_id: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.gateway.disconnect(&self.user_id);
    }
}

async fn handle_connection(
    socket: WebSocket,
    gateway: Gateway,
    session: Session,
    outbound: OutboundRx,
) {
    let _guard = SessionGuard {
        gateway: gateway.clone(),
        user_id: session.user_id.clone(),
    };

    tracing::info!(
        user_id = %session.user_id,
        username = %session.username,
        "gateway session established"
    );

    let (ws_tx, ws_rx) = socket.split();
    run_session(&gateway, &session, ws_tx, ws_rx, outbound).await;

    tracing::info!(
        user_id = %session.user_id,
        username = %session.username,
        "gateway session ended"
    );
}

/// Main session loop: relay client messages, flush queued events.
async fn run_session(
    gateway: &Gateway,
    session: &Session,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut ws_rx: SplitStream<WebSocket>,
    mut outbound: OutboundRx,
) {
    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => handle_text(gateway, session, &text),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::debug!(?e, user_id = %session.user_id, "ws read error");
                        break;
                    }
                }
            }

            event = outbound.recv() => {
                // None: the session was removed and its channel released.
                let Some(event) = event else { break };

                let json = match serde_json::to_string(event.as_ref()) {
                    Ok(json) => json,
                    Err(err) => {
                        tracing::error!(?err, event = event.name(), "failed to encode event");
                        break;
                    }
                };
                if ws_tx.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Malformed frames and unknown events are logged and ignored.
fn handle_text(gateway: &Gateway, session: &Session, text: &Utf8Bytes) {
    let client_msg: ClientMessage = match serde_json::from_str(text.as_str()) {
        Ok(m) => m,
        Err(err) => {
            tracing::debug!(?err, user_id = %session.user_id, "ignoring non-json frame");
            return;
        }
    };

    if client_msg.event != EventName::NEW_MESSAGE {
        tracing::debug!(event = %client_msg.event, user_id = %session.user_id, "ignoring unknown event");
        return;
    }

    let recipients = gateway.relay(session, message_text(&client_msg.data));
    tracing::debug!(user_id = %session.user_id, recipients, "message relayed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::events::{PresenceKind, ServerEvent, UserStatus};

    #[test]
    fn failed_upgrade_releases_admitted_session() {
        let gateway = Gateway::new();
        let (alice_tx, mut alice_rx) = outbound_channel();
        let alice = gateway.connect(Some("alice"), alice_tx).unwrap();
        let (bob_tx, _bob_rx) = outbound_channel();
        let bob = gateway.connect(Some("bob"), bob_tx).unwrap();
        while alice_rx.try_recv().is_ok() {}

        let err = axum::Error::new("connection reset before upgrade");
        assert!(release_failed_upgrade(&gateway, &bob.user_id, &err));

        assert!(gateway.lookup_by_username("bob").is_none());
        assert_eq!(
            *alice_rx.try_recv().unwrap(),
            ServerEvent::UserStatus(UserStatus::new(&bob, PresenceKind::Left))
        );
        assert_eq!(*alice_rx.try_recv().unwrap(), ServerEvent::Users(vec![alice]));
        assert!(alice_rx.try_recv().is_err());

        // A later close from the socket task is a no-op.
        assert!(!release_failed_upgrade(&gateway, &bob.user_id, &err));
    }
}
