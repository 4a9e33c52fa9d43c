//! Connection registry and fan-out engine for the notifications relay.
//!
//! This crate tracks which live connections belong to which user and moves
//! decoded bus events onto every one of those connections.
//!
//! # Architecture
//!
//! - **One entry per user**: the [`ConnectionRegistry`] is a sharded map from
//!   identity to [`User`]. A user's connections and outbox live in that entry,
//!   guarded by a per-user lock.
//! - **One deliverer per user**: creating a user spawns the single task that
//!   drains its [`Outbox`] and writes each payload to all of the user's
//!   connections. Connections never read the outbox themselves, so every
//!   connection sees every payload.
//! - **Bounded outboxes**: enqueueing never waits; a full outbox drops its
//!   oldest payload.
//! - **Evict on last close**: a user entry is removed together with its
//!   deliverer when its last connection deregisters.
//! - **Ephemeral delivery**: events for users without connections are dropped,
//!   and failed writes are not retried.
//!
//! # Message Flow
//!
//! 1. A session authenticates and creates a [`Registration`] for its connection
//! 2. The bus reader hands each decoded event to the [`Dispatcher`]
//! 3. The dispatcher looks up the target user and pushes the payload to its outbox
//! 4. The user's deliverer writes the payload to a snapshot of its connections
//! 5. A connection whose write fails is closed and deregistered; its siblings
//!    keep receiving
//!
//! # Modules
//!
//! - `connection`: the [`Connection`] seam implemented by the transport
//! - `registry`: identity → user map with atomic create/evict
//! - `registration`: scoped registration that deregisters on drop
//! - `dispatcher`: enqueue path and per-user deliverer

pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod outbox;
pub mod registration;
pub mod registry;
pub mod user;

pub use connection::{Connection, ConnectionHandle, ConnectionId};
pub use dispatcher::Dispatcher;
pub use error::Error;
pub use events::UserId;
pub use outbox::Outbox;
pub use registration::Registration;
pub use registry::ConnectionRegistry;
pub use user::User;
