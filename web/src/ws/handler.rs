use crate::ws::session;
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use log::*;
use service::AppState;

/// GET /ws/
/// Upgrades to a WebSocket and hands the socket to a new session. The peer
/// authenticates with its first message, not during the upgrade.
pub async fn ws_handler(State(app_state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move {
        let final_state = session::run(socket, app_state).await;
        trace!("WebSocket session ended in state {final_state:?}");
    })
}
