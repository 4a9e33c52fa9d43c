use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use bytes::Bytes;
use futures::stream::SplitSink;
use futures::SinkExt;
use relay::{Connection, Error as RelayError};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, MutexGuard, Notify};

pub(crate) type WsSink = SplitSink<WebSocket, Message>;

/// Outbound half of a WebSocket, shared between its session and the relay.
///
/// The relay writes payloads through [`Connection::send`]. When a write fails
/// the relay calls [`Connection::close`], which wakes the session so it can
/// tear the socket down.
pub(crate) struct WsConnection {
    sink: Mutex<WsSink>,
    closed: AtomicBool,
    closed_notify: Notify,
}

impl WsConnection {
    pub(crate) fn new(sink: WsSink) -> Self {
        Self {
            sink: Mutex::new(sink),
            closed: AtomicBool::new(false),
            closed_notify: Notify::new(),
        }
    }

    /// Exclusive access to the sink, holding off relay writes meanwhile.
    pub(crate) async fn lock_sink(&self) -> MutexGuard<'_, WsSink> {
        self.sink.lock().await
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Resolves once the relay has marked this connection dead.
    pub(crate) async fn closed(&self) {
        if self.is_closed() {
            return;
        }
        self.closed_notify.notified().await;
    }

    /// Sends a close frame, ignoring failures on an already broken socket.
    pub(crate) async fn send_close(&self, code: u16, reason: &'static str) {
        let frame = CloseFrame {
            code,
            reason: reason.into(),
        };
        let _ = self.sink.lock().await.send(Message::Close(Some(frame))).await;
    }
}

/// Payloads are JSON taken verbatim from the bus, so they go out as text
/// frames. Anything that is not valid UTF-8 falls back to a binary frame.
fn to_message(payload: Bytes) -> Message {
    match std::str::from_utf8(&payload) {
        Ok(text) => Message::Text(text.into()),
        Err(_) => Message::Binary(payload),
    }
}

#[async_trait]
impl Connection for WsConnection {
    async fn send(&self, payload: Bytes) -> Result<(), RelayError> {
        if self.is_closed() {
            return Err(RelayError::write("connection closed"));
        }
        self.sink
            .lock()
            .await
            .send(to_message(payload))
            .await
            .map_err(RelayError::write)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        // notify_one keeps a permit if the session is not waiting right now.
        self.closed_notify.notify_one();
    }
}
