use crate::connection::{ConnectionHandle, ConnectionId};
use crate::dispatcher;
use crate::error::{Error, ErrorKind};
use crate::user::User;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use events::UserId;
use log::*;
use std::sync::Arc;
use std::time::Duration;

/// Maps each connected identity to its [`User`] entry.
///
/// The map is sharded, so registrations for unrelated users do not serialize
/// on a global lock. Creating an entry and attaching its first connection
/// happen under the shard lock, as does evicting an entry that lost its last
/// connection; a registration therefore never lands on an evicted entry.
pub struct ConnectionRegistry {
    users: DashMap<UserId, Arc<User>>,
    outbox_capacity: usize,
    write_timeout: Duration,
}

impl ConnectionRegistry {
    pub fn new(outbox_capacity: usize, write_timeout: Duration) -> Self {
        Self {
            users: DashMap::new(),
            outbox_capacity,
            write_timeout,
        }
    }

    /// Attaches a connection to `user_id`, creating the user on first sight.
    ///
    /// Creating a user also starts its deliverer task, so this must be called
    /// from within a Tokio runtime.
    pub fn register(
        self: &Arc<Self>,
        user_id: UserId,
        connection_id: ConnectionId,
        handle: ConnectionHandle,
    ) -> Arc<User> {
        let (user, created) = match self.users.entry(user_id) {
            Entry::Occupied(entry) => {
                let user = Arc::clone(entry.get());
                user.attach(connection_id, handle);
                (user, false)
            }
            Entry::Vacant(entry) => {
                let user = Arc::new(User::new(entry.key().clone(), self.outbox_capacity));
                user.attach(connection_id, handle);
                entry.insert(Arc::clone(&user));
                (user, true)
            }
        };

        if created {
            debug!("Created user entry {}", user.id());
            tokio::spawn(dispatcher::deliver(Arc::clone(self), Arc::clone(&user)));
        }

        user
    }

    /// Detaches a connection from `user`.
    ///
    /// Returns [`ErrorKind::NotFound`] if the connection is not attached, e.g.
    /// on a second deregistration. When the last connection goes the user is
    /// evicted and its deliverer stops.
    pub fn deregister(&self, user: &Arc<User>, connection_id: &ConnectionId) -> Result<(), Error> {
        if user.detach(connection_id).is_none() {
            return Err(Error {
                source: None,
                error_kind: ErrorKind::NotFound,
            });
        }

        let evicted = self.users.remove_if(user.id(), |_, current| {
            Arc::ptr_eq(current, user) && current.connection_count() == 0
        });
        if let Some((user_id, evicted)) = evicted {
            evicted.outbox().close();
            debug!("Evicted user entry {user_id} after its last connection closed");
        }

        Ok(())
    }

    /// Returns the user entry for `user_id`, if any connection is registered.
    pub fn lookup(&self, user_id: &str) -> Option<Arc<User>> {
        self.users.get(user_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of users with at least one registered connection.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Total number of registered connections across all users.
    pub fn connection_count(&self) -> usize {
        self.users
            .iter()
            .map(|entry| entry.value().connection_count())
            .sum()
    }

    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(1024, Duration::from_secs(5))
    }
}
