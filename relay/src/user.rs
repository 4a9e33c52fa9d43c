use crate::connection::{ConnectionHandle, ConnectionId};
use crate::outbox::Outbox;
use events::UserId;
use parking_lot::Mutex;
use std::collections::HashMap;

/// One identity's live connections plus the outbox feeding all of them.
///
/// The connection set is guarded by its own lock so that registrations and
/// deliveries for different users never contend.
pub struct User {
    id: UserId,
    connections: Mutex<HashMap<ConnectionId, ConnectionHandle>>,
    outbox: Outbox,
}

impl User {
    pub(crate) fn new(id: UserId, outbox_capacity: usize) -> Self {
        Self {
            id,
            connections: Mutex::new(HashMap::new()),
            outbox: Outbox::new(outbox_capacity),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn has_connection(&self, connection_id: &ConnectionId) -> bool {
        self.connections.lock().contains_key(connection_id)
    }

    pub(crate) fn attach(&self, connection_id: ConnectionId, handle: ConnectionHandle) {
        self.connections.lock().insert(connection_id, handle);
    }

    pub(crate) fn detach(&self, connection_id: &ConnectionId) -> Option<ConnectionHandle> {
        self.connections.lock().remove(connection_id)
    }

    /// Copies the current connection set, as used for one delivery pass.
    pub fn snapshot(&self) -> Vec<(ConnectionId, ConnectionHandle)> {
        self.connections
            .lock()
            .iter()
            .map(|(id, handle)| (id.clone(), ConnectionHandle::clone(handle)))
            .collect()
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("connections", &self.connection_count())
            .field("pending", &self.outbox.len())
            .finish()
    }
}
