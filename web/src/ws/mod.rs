//! WebSocket session handling.
//!
//! - `handler`: the Axum upgrade endpoint
//! - `session`: per-connection state machine from handshake to close
//! - `connection`: the socket's outbound half as seen by the relay

pub(crate) mod connection;
pub mod handler;
pub mod session;
