use shared::models::events::ServerEvent;
use tracing::{debug, info};

use crate::state::AppState;

/// Transport-level teardown: leaves the queue or the room, notifies a partner
/// with `partner_left`, and marks presence offline.
pub async fn handle_disconnect(connection_id: &str, state: &AppState) {
    info!("WebSocket connection disconnected: {}", connection_id);
    state.hub.detach(connection_id);

    if state.queue.remove(connection_id) {
        debug!("Removed waiting connection {} from the queue", connection_id);
    }

    if let Some(departure) = state.rooms.leave(connection_id) {
        state.hub.send_to(
            &departure.partner_id,
            ServerEvent::PartnerLeft {
                room_id: departure.room.room_id.clone(),
            },
        );
    }

    state.registry.unregister(connection_id).await;
}
