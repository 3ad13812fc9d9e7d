//! Handshake validation run before any session state exists.

use thiserror::Error;

use super::registry::SessionRegistry;

/// Why a connection attempt was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("Invalid username")]
    MissingUsername,
    #[error("Username already taken")]
    UsernameTaken,
}

/// Check a candidate username against the registry.
///
/// Read-only: the caller inserts while still holding the same lock, so the
/// answer cannot go stale between check and insert.
pub fn check<'a>(
    registry: &SessionRegistry,
    candidate: Option<&'a str>,
) -> Result<&'a str, AdmissionError> {
    let username = match candidate {
        Some(name) if !name.is_empty() => name,
        _ => return Err(AdmissionError::MissingUsername),
    };

    if registry.lookup_by_username(username).is_some() {
        return Err(AdmissionError::UsernameTaken);
    }

    Ok(username)
}
