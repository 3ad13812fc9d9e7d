//! Connection lifecycle: admit, relay, and depart.
//!
//! A connection moves PENDING → ADMITTED → ACTIVE → CLOSED. [`Gateway::connect`]
//! covers the first two transitions and the join announcements in one step;
//! [`Gateway::disconnect`] is the only way into CLOSED. Each reaction runs
//! start to finish under the registry lock and never awaits, so no other
//! connection can observe a half-applied change.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use lobby_common::id::{self, prefix};
use parking_lot::Mutex;

use super::admission::{self, AdmissionError};
use super::events::{ChatMessage, PresenceKind, ServerEvent, UserStatus};
use super::fanout::{deliver, Fanout};
use super::registry::{RegistryError, SessionRegistry};
use super::session::{Outbound, Session};

/// Owner of the session registry. Cloneable; store in `AppState`.
#[derive(Clone, Default)]
pub struct Gateway {
    registry: Arc<Mutex<SessionRegistry>>,
}

impl Gateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a connection attempt and announce it.
    ///
    /// On success the new channel has been sent, in order: `users` (including
    /// itself), `session`, and the `userStatus` joined self-notice. Every
    /// other live channel has been sent `user connected`. On failure nothing
    /// was inserted or sent.
    pub fn connect(
        &self,
        candidate: Option<&str>,
        channel: Outbound,
    ) -> Result<Session, AdmissionError> {
        let mut registry = self.registry.lock();

        let username = admission::check(&registry, candidate)?;
        let session = Session::new(id::prefixed_ulid(prefix::USER), username.to_string());

        registry
            .insert(session.clone(), channel)
            .map_err(|_: RegistryError| AdmissionError::UsernameTaken)?;

        let me = session.user_id.as_str();
        deliver(&registry, Fanout::SelfOnly(me), ServerEvent::Users(registry.snapshot_all()));
        deliver(&registry, Fanout::SelfOnly(me), ServerEvent::Session(session.clone()));
        deliver(
            &registry,
            Fanout::AllButSender(me),
            ServerEvent::UserConnected(session.clone()),
        );
        // Redundant with `session`, but clients expect the four-event sequence.
        deliver(
            &registry,
            Fanout::SelfOnly(me),
            ServerEvent::UserStatus(UserStatus::new(&session, PresenceKind::Joined)),
        );

        tracing::info!(
            user_id = %session.user_id,
            username = %session.username,
            online = registry.len(),
            "session admitted"
        );

        Ok(session)
    }

    /// Relay a chat message from `sender` to everyone else.
    ///
    /// Identity comes from the admitted session and the timestamp from the
    /// server clock; only `text` is taken from the client. Returns the number
    /// of recipients.
    pub fn relay(&self, sender: &Session, text: String) -> usize {
        let registry = self.registry.lock();

        let message = ChatMessage {
            user_id: sender.user_id.clone(),
            username: sender.username.clone(),
            message: text,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        deliver(
            &registry,
            Fanout::AllButSender(&sender.user_id),
            ServerEvent::NewMessage(message),
        )
    }

    /// Remove a session and announce the departure to everyone left.
    ///
    /// Idempotent: a second call for the same ID removes nothing, announces
    /// nothing, and returns `false`. Dropping the removed entry closes the
    /// session's outbound queue.
    pub fn disconnect(&self, user_id: &str) -> bool {
        let mut registry = self.registry.lock();

        let Some(entry) = registry.remove(user_id) else {
            return false;
        };
        drop(entry.channel);

        let session = entry.session;
        deliver(
            &registry,
            Fanout::All,
            ServerEvent::UserStatus(UserStatus::new(&session, PresenceKind::Left)),
        );
        deliver(&registry, Fanout::All, ServerEvent::Users(registry.snapshot_all()));

        tracing::info!(
            user_id = %session.user_id,
            username = %session.username,
            online = registry.len(),
            "session removed"
        );

        true
    }

    /// Current roster, in admission order.
    pub fn roster(&self) -> Vec<Session> {
        self.registry.lock().snapshot_all()
    }

    pub fn lookup_by_username(&self, username: &str) -> Option<Session> {
        self.registry.lock().lookup_by_username(username).cloned()
    }

    pub fn online(&self) -> usize {
        self.registry.lock().len()
    }
}
