//! Event bus side of the notifications relay.
//!
//! This crate turns raw payloads published on the shared event bus into
//! discrete, user-targeted [`Event`]s and hands them to registered handlers.
//!
//! # Architecture
//!
//! - **Event**: one decoded bus record, a target user plus an opaque payload
//! - **decode**: parses one raw bus payload into an ordered list of events
//! - **EventHandler**: trait for anything that consumes decoded events
//! - **EventPublisher**: fans each event out to the registered handlers
//! - **EventSource**: a sequential stream of raw bus payloads (Redis in production)
//!
//! This crate has no dependencies on internal crates, so the relay core can
//! implement [`EventHandler`] without a dependency cycle.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

pub mod decoder;
pub mod error;
pub mod redis;
pub mod subscriber;

pub use decoder::decode;
pub use error::Error;
pub use subscriber::{run_bus_reader, EventSource};

/// The stable string key identifying a user.
pub type UserId = String;

/// A single event addressed to one user.
///
/// `payload` holds the raw bytes of the record's `data` field exactly as they
/// appeared on the bus. It is never parsed or re-serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub target_identity: UserId,
    pub payload: Bytes,
}

/// Trait for handling decoded bus events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &Event);
}

/// Publishes events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    pub async fn publish(&self, event: &Event) {
        for handler in self.handlers.iter() {
            handler.handle(event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
