pub mod health;
pub mod websocket;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ws", get(websocket::websocket_handler))
        .with_state(state)
}
