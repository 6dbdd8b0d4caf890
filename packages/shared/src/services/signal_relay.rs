use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::events::ServerEvent;
use crate::services::connection_hub::ConnectionHub;
use crate::services::room_manager::RoomManager;

/// Forwards room-scoped events to the other member of a room.
#[derive(Clone)]
pub struct SignalRelay {
    rooms: Arc<RoomManager>,
    hub: Arc<ConnectionHub>,
}

impl SignalRelay {
    pub fn new(rooms: Arc<RoomManager>, hub: Arc<ConnectionHub>) -> Self {
        SignalRelay { rooms, hub }
    }

    /// Delivers `event` to every member of `room_id` except the sender and
    /// returns how many recipients accepted it. A missing room or a sender
    /// outside the room delivers nothing.
    pub fn forward(&self, room_id: &str, sender_id: &str, event: ServerEvent) -> usize {
        let recipients = match self.rooms.recipients(room_id, sender_id) {
            Ok(recipients) => recipients,
            Err(e) => {
                warn!("Dropping {} from {}: {}", event.name(), sender_id, e);
                return 0;
            }
        };

        let delivered = recipients
            .iter()
            .filter(|recipient| self.hub.send_to(recipient, event.clone()))
            .count();
        debug!(
            "Relayed {} in room {} to {}/{} recipients",
            event.name(),
            room_id,
            delivered,
            recipients.len()
        );
        delivered
    }
}
