//! Real-time presence and chat gateway.
//!
//! Leaves first: [`registry`] holds live sessions, [`admission`] vets a
//! handshake, [`fanout`] routes events to channels, [`lifecycle`] drives
//! join/relay/leave, and [`server`] binds it all to a WebSocket.

pub mod admission;
pub mod events;
pub mod fanout;
pub mod lifecycle;
pub mod registry;
pub mod server;
pub mod session;

pub use lifecycle::Gateway;
