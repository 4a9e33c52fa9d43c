use crate::error::Error;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outbound half of one live duplex connection.
///
/// The transport layer implements this for its socket type; the relay only
/// ever writes payloads through it and tells it to close.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Writes one payload to the peer.
    async fn send(&self, payload: Bytes) -> Result<(), Error>;

    /// Marks the connection dead so its owning session shuts it down.
    /// Must not block and must be safe to call more than once.
    fn close(&self);
}

/// Shared handle to a registered connection.
pub type ConnectionHandle = Arc<dyn Connection>;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_ids_are_unique() {
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), a.as_str());
    }
}
