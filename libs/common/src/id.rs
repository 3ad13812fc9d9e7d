use ulid::Ulid;

/// Generates a new ULID-based ID with the given prefix.
///
/// ULIDs are globally unique and time ordered, so an ID handed out once is
/// never produced again for the lifetime of the process (or any other).
///
/// # Examples
/// ```
/// let id = lobby_common::id::prefixed_ulid("usr");
/// assert!(id.starts_with("usr_"));
/// ```
pub fn prefixed_ulid(prefix: &str) -> String {
    format!("{}_{}", prefix, Ulid::new())
}

/// Well-known ID prefixes.
pub mod prefix {
    /// A connected chat participant.
    pub const USER: &str = "usr";
}
