use crate::controller::health_check_controller;
use crate::ws::handler::ws_handler;
use axum::{routing::get, Router};
use service::AppState;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_controller::health_check))
        .route("/ws", get(ws_handler))
        .route("/ws/", get(ws_handler))
        .with_state(app_state)
}
