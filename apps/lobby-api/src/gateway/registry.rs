//! Session registry: the authoritative set of live sessions and their
//! outbound channels.
//!
//! The registry itself does no locking. [`Gateway`](super::lifecycle::Gateway)
//! owns it behind a single mutex so that every check-then-insert and every
//! announce sequence happens in one critical section.

use thiserror::Error;

use super::session::{Outbound, Session};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("username `{0}` is already held by a live session")]
    DuplicateUsername(String),
}

/// A live session paired with the handle used to push events to it.
pub struct SessionEntry {
    pub session: Session,
    pub channel: Outbound,
}

/// Live sessions in insertion order.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Vec<SessionEntry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the live session holding `username`, if any.
    pub fn lookup_by_username(&self, username: &str) -> Option<&Session> {
        self.sessions
            .iter()
            .map(|entry| &entry.session)
            .find(|session| session.username == username)
    }

    /// Add a session. Fails if its username is already live; the registry is
    /// left untouched in that case.
    pub fn insert(&mut self, session: Session, channel: Outbound) -> Result<(), RegistryError> {
        if self.lookup_by_username(&session.username).is_some() {
            return Err(RegistryError::DuplicateUsername(session.username));
        }
        self.sessions.push(SessionEntry { session, channel });
        Ok(())
    }

    /// Remove a session by user ID. Unknown IDs are a no-op and return `None`.
    ///
    /// The returned entry owns the channel; dropping it closes the session's
    /// outbound queue.
    pub fn remove(&mut self, user_id: &str) -> Option<SessionEntry> {
        let index = self
            .sessions
            .iter()
            .position(|entry| entry.session.user_id == user_id)?;
        Some(self.sessions.remove(index))
    }

    /// Point-in-time copy of every live identity.
    pub fn snapshot_all(&self) -> Vec<Session> {
        self.sessions.iter().map(|entry| entry.session.clone()).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SessionEntry> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
