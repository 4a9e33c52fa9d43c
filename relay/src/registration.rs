use crate::connection::{ConnectionHandle, ConnectionId};
use crate::registry::ConnectionRegistry;
use crate::user::User;
use events::UserId;
use log::*;
use std::sync::Arc;

/// Scoped registration of one connection.
///
/// The connection is registered on construction and deregistered when the
/// value is dropped, whether the owning session returns normally, errors out
/// or has its task aborted.
pub struct Registration {
    registry: Arc<ConnectionRegistry>,
    user: Arc<User>,
    connection_id: ConnectionId,
}

impl Registration {
    pub fn new(
        registry: &Arc<ConnectionRegistry>,
        user_id: UserId,
        connection_id: ConnectionId,
        handle: ConnectionHandle,
    ) -> Self {
        let user = registry.register(user_id, connection_id.clone(), handle);
        info!(
            "Registered connection {connection_id} for user {} ({} open)",
            user.id(),
            user.connection_count()
        );

        Self {
            registry: Arc::clone(registry),
            user,
            connection_id,
        }
    }

    pub fn user(&self) -> &Arc<User> {
        &self.user
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        match self.registry.deregister(&self.user, &self.connection_id) {
            Ok(()) => info!(
                "Deregistered connection {} for user {}",
                self.connection_id,
                self.user.id()
            ),
            // The deliverer already removed it after a failed write.
            Err(e) => debug!(
                "Connection {} for user {} not deregistered: {e}",
                self.connection_id,
                self.user.id()
            ),
        }
    }
}
