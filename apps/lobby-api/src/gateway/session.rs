//! Per-connection identity and outbound channel handle.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use utoipa::ToSchema;

use super::events::ServerEvent;

/// Capacity of each connection's outbound queue. A client that stops reading
/// misses events once its queue is full.
pub const OUTBOUND_CAPACITY: usize = 1024;

/// Sending half of a connection's outbound queue. Fanout only ever uses
/// `try_send` on it, so nothing awaits while the registry lock is held.
pub type Outbound = mpsc::Sender<Arc<ServerEvent>>;

/// Receiving half, drained by the connection's socket writer.
pub type OutboundRx = mpsc::Receiver<Arc<ServerEvent>>;

/// Create a fresh outbound queue for a connection attempt.
pub fn outbound_channel() -> (Outbound, OutboundRx) {
    mpsc::channel(OUTBOUND_CAPACITY)
}

/// The identity bound to one connected client.
///
/// Both fields are fixed at admission and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Server-generated `usr_` prefixed ULID.
    pub user_id: String,
    /// Display name supplied in the handshake.
    pub username: String,
}

impl Session {
    pub fn new(user_id: String, username: String) -> Self {
        Self { user_id, username }
    }
}
