use shared::models::events::ServerEvent;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use uuid::Uuid;

use crate::state::AppState;

/// Assigns a fresh connection id and opens its outbound channel. Ids are
/// never reused, so a late event for a closed socket can never reach a new
/// one.
pub fn handle_connect(state: &AppState) -> (String, UnboundedReceiver<ServerEvent>) {
    let connection_id = Uuid::new_v4().to_string();
    let outbound = state.hub.attach(&connection_id);
    info!("WebSocket connection established: {}", connection_id);
    (connection_id, outbound)
}
