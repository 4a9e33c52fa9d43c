//! WebSocket transport for the notifications relay.
//!
//! Each accepted socket is driven by one session task that authenticates the
//! peer, registers the socket with the relay and keeps it open until either
//! side goes away. Outbound payloads are written by the relay's per-user
//! deliverer, never by the session itself.

use log::*;
use service::AppState;
use tokio::net::TcpListener;

mod controller;
pub mod error;
pub mod router;
pub mod ws;

pub use ws::session::{SessionState, CONNECTION_CREATED_MESSAGE};

/// Binds the configured address and serves the relay until the listener fails.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let listen_addr = app_state.config.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await?;

    info!("Server starting... listening for connections on ws://{listen_addr}/ws/");

    serve(listener, app_state).await
}

/// Serves the relay on an already bound listener.
pub async fn serve(listener: TcpListener, app_state: AppState) -> std::io::Result<()> {
    let router = router::define_routes(app_state);
    axum::serve(listener, router).await
}
