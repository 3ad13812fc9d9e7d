//! Gateway event names and wire-format messages.
//!
//! Every frame is a JSON text message shaped `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::session::Session;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

/// Event names used on the wire.
pub struct EventName;

impl EventName {
    pub const USERS: &'static str = "users";
    pub const SESSION: &'static str = "session";
    pub const USER_CONNECTED: &'static str = "user connected";
    pub const USER_STATUS: &'static str = "userStatus";
    pub const NEW_MESSAGE: &'static str = "new message";
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// Whether a presence notice announces an arrival or a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceKind {
    Joined,
    Left,
}

/// Payload of a `userStatus` event.
///
/// `type` is always the literal `"userStatus"`; `status` carries the kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    pub user_id: String,
    pub username: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub status: PresenceKind,
}

impl UserStatus {
    pub fn new(session: &Session, status: PresenceKind) -> Self {
        Self {
            user_id: session.user_id.clone(),
            username: session.username.clone(),
            kind: EventName::USER_STATUS,
            status,
        }
    }
}

/// Payload of a relayed `new message` event. Identity and timestamp are
/// always filled in by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub user_id: String,
    pub username: String,
    pub message: String,
    pub timestamp: String,
}

/// A message sent from the server to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "users")]
    Users(Vec<Session>),
    #[serde(rename = "session")]
    Session(Session),
    #[serde(rename = "user connected")]
    UserConnected(Session),
    #[serde(rename = "userStatus")]
    UserStatus(UserStatus),
    #[serde(rename = "new message")]
    NewMessage(ChatMessage),
}

impl ServerEvent {
    /// Wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Users(_) => EventName::USERS,
            Self::Session(_) => EventName::SESSION,
            Self::UserConnected(_) => EventName::USER_CONNECTED,
            Self::UserStatus(_) => EventName::USER_STATUS,
            Self::NewMessage(_) => EventName::NEW_MESSAGE,
        }
    }
}

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// A message received from a client.
#[derive(Debug, Deserialize)]
pub struct ClientMessage {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// Pull the chat text out of a `new message` payload.
///
/// Accepts a bare string or an object with a string `message` field. Any
/// other shape becomes empty text. Identity fields in the payload are never
/// read.
pub fn message_text(data: &Value) -> String {
    match data {
        Value::String(text) => text.clone(),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(text)) => text.clone(),
            _ => String::new(),
        },
        _ => String::new(),
    }
}
