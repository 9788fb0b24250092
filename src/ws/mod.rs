//! WebSocket layer: upgrade handler, per-connection task, liveness, wire
//! messages, and the connection manager.
//!
//! The WebSocket endpoint at `/ws` carries the whole presence protocol.

pub mod connection;
pub mod handler;
pub mod liveness;
pub mod manager;
pub mod messages;

pub use connection::ConnectionSettings;
pub use manager::ConnectionManager;
