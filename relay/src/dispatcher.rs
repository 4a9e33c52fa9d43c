use crate::connection::{ConnectionHandle, ConnectionId};
use crate::error::{Error, ErrorKind};
use crate::registry::ConnectionRegistry;
use crate::user::User;
use async_trait::async_trait;
use bytes::Bytes;
use events::{Event, EventHandler};
use futures::future::join_all;
use log::*;
use std::sync::Arc;

/// Routes decoded bus events into the outbox of their target user.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Queues the event's payload for its target user.
    ///
    /// Returns `false` when nobody is connected for the target; the event is
    /// dropped since there is no durability. Never waits on delivery.
    pub fn enqueue(&self, event: &Event) -> bool {
        let Some(user) = self.registry.lookup(&event.target_identity) else {
            trace!(
                "No connections for user {}, dropping event",
                event.target_identity
            );
            return false;
        };

        if user.outbox().is_closed() {
            trace!(
                "User {} was evicted while routing, dropping event",
                user.id()
            );
            return false;
        }

        if user.outbox().push(event.payload.clone()).is_some() {
            warn!(
                "Outbox full for user {}, dropped oldest pending payload ({} dropped so far)",
                user.id(),
                user.outbox().dropped_count()
            );
        }
        true
    }
}

#[async_trait]
impl EventHandler for Dispatcher {
    async fn handle(&self, event: &Event) {
        self.enqueue(event);
    }
}

/// Deliverer loop for one user: drains the outbox in order and writes every
/// payload to all of the user's connections. Runs until the user is evicted.
pub(crate) async fn deliver(registry: Arc<ConnectionRegistry>, user: Arc<User>) {
    debug!("Deliverer started for user {}", user.id());

    while let Some(payload) = user.outbox().next().await {
        write_to_all(&registry, &user, payload).await;
    }

    debug!("Deliverer stopped for user {}", user.id());
}

/// Writes one payload to every connection in a snapshot of the user's set.
///
/// Writes run concurrently and all finish before this returns, so each
/// connection sees payloads in outbox order. A failed or timed out write
/// closes and deregisters that connection only.
async fn write_to_all(registry: &ConnectionRegistry, user: &Arc<User>, payload: Bytes) {
    let connections = user.snapshot();
    trace!(
        "Delivering {} byte payload to {} connection(s) of user {}",
        payload.len(),
        connections.len(),
        user.id()
    );

    let writes = connections.into_iter().map(|(connection_id, handle)| {
        let payload = payload.clone();
        let write_timeout = registry.write_timeout();
        async move {
            let result = match tokio::time::timeout(write_timeout, handle.send(payload)).await {
                Ok(result) => result,
                Err(_) => Err(Error {
                    source: None,
                    error_kind: ErrorKind::Timeout,
                }),
            };
            (connection_id, handle, result)
        }
    });

    for (connection_id, handle, result) in join_all(writes).await {
        if let Err(e) = result {
            drop_dead_connection(registry, user, &connection_id, &handle, &e);
        }
    }
}

fn drop_dead_connection(
    registry: &ConnectionRegistry,
    user: &Arc<User>,
    connection_id: &ConnectionId,
    handle: &ConnectionHandle,
    cause: &Error,
) {
    warn!(
        "Failed to deliver to connection {connection_id} of user {}: {cause}. Dropping connection.",
        user.id()
    );
    handle.close();
    if let Err(e) = registry.deregister(user, connection_id) {
        debug!("Connection {connection_id} was already deregistered: {e}");
    }
}
