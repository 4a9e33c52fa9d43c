//! Lifecycle of one WebSocket connection.
//!
//! ```text
//! Connecting -> Authenticating -> Registered -> Active -> Closed
//!                     |               |
//!                     +---------------+-----> Rejected
//! ```
//!
//! The peer's first message must be a text frame holding exactly its access
//! token. Once the token verifies, the socket is registered with the relay and
//! the peer receives [`CONNECTION_CREATED_MESSAGE`]. From then on the session
//! only watches the inbound side; payloads are written by the relay.

use crate::error::{Error, HandshakeErrorKind, Result};
use crate::ws::connection::WsConnection;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitStream, StreamExt};
use futures::SinkExt;
use log::*;
use relay::{ConnectionId, Registration};
use service::AppState;
use std::sync::Arc;

/// Acknowledgement sent once the connection is registered.
pub const CONNECTION_CREATED_MESSAGE: &str = "Connection created.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Authenticating,
    Registered,
    Active,
    Closed,
    Rejected,
}

/// Drives one upgraded socket to completion and returns its final state,
/// either [`SessionState::Closed`] or [`SessionState::Rejected`].
///
/// Both socket halves are owned by this function, so the socket is released
/// on every return path, including cancellation of the task running it.
pub async fn run(socket: WebSocket, app_state: AppState) -> SessionState {
    let connection_id = ConnectionId::new();
    let (sink, mut inbound) = socket.split();
    let connection = Arc::new(WsConnection::new(sink));
    let mut state = SessionState::Connecting;
    trace!("Connection {connection_id}: {state:?}");

    state = advance(&connection_id, state, SessionState::Authenticating);
    let user_id = match authenticate(&mut inbound, &app_state).await {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!("Rejecting connection {connection_id}: {e}");
            if let Some((code, reason)) = e.close_frame() {
                connection.send_close(code, reason).await;
            }
            return advance(&connection_id, state, SessionState::Rejected);
        }
    };

    // Hold the sink while registering so the acknowledgement is the first
    // thing the peer sees, ahead of any payload the deliverer writes.
    let registration = {
        let mut sink = connection.lock_sink().await;
        let registration = Registration::new(
            &app_state.registry,
            user_id,
            connection_id.clone(),
            connection.clone(),
        );
        state = advance(&connection_id, state, SessionState::Registered);

        if let Err(e) = sink
            .send(Message::Text(CONNECTION_CREATED_MESSAGE.into()))
            .await
        {
            warn!("Failed to acknowledge connection {connection_id}: {e}");
            drop(registration);
            drop(sink);
            return advance(&connection_id, state, SessionState::Rejected);
        }
        registration
    };

    state = advance(&connection_id, state, SessionState::Active);
    receive_until_closed(&connection, &mut inbound, &registration).await;

    drop(registration);
    advance(&connection_id, state, SessionState::Closed)
}

fn advance(connection_id: &ConnectionId, from: SessionState, to: SessionState) -> SessionState {
    trace!("Connection {connection_id}: {from:?} -> {to:?}");
    to
}

/// Reads the access token from the first message and verifies it.
async fn authenticate(inbound: &mut SplitStream<WebSocket>, app_state: &AppState) -> Result<String> {
    let first = tokio::time::timeout(app_state.config.auth_timeout(), inbound.next())
        .await
        .map_err(|_| Error::handshake(HandshakeErrorKind::Timeout))?;

    match first {
        Some(Ok(Message::Text(token))) => Ok(app_state.verifier.verify(token.as_str())?),
        Some(Ok(Message::Close(_))) | None => Err(Error::handshake(HandshakeErrorKind::Closed)),
        Some(Ok(_)) => Err(Error::handshake(HandshakeErrorKind::WrongMessageType)),
        Some(Err(e)) => Err(e.into()),
    }
}

/// Active state: waits for the peer to leave, the socket to fail, or the
/// relay to mark the connection dead after a failed write.
async fn receive_until_closed(
    connection: &WsConnection,
    inbound: &mut SplitStream<WebSocket>,
    registration: &Registration,
) {
    let connection_id = registration.connection_id();
    let user_id = registration.user().id();

    loop {
        tokio::select! {
            _ = connection.closed() => {
                info!("Connection {connection_id} of user {user_id} dropped after a failed delivery");
                break;
            }
            message = inbound.next() => match message {
                Some(Ok(Message::Close(frame))) => {
                    debug!("Connection {connection_id} of user {user_id} closed by peer: {frame:?}");
                    break;
                }
                // Pings are answered by the transport; the protocol is push-only.
                Some(Ok(_)) => trace!("Ignoring inbound message on connection {connection_id}"),
                Some(Err(e)) => {
                    debug!("Connection {connection_id} of user {user_id} failed: {e}");
                    break;
                }
                None => {
                    debug!("Connection {connection_id} of user {user_id} ended");
                    break;
                }
            }
        }
    }
}
