//! Shared helpers for the lobby services.

pub mod id;
