use shared::models::events::requests::SkipPartnerRequest;
use shared::models::events::ServerEvent;
use tracing::{debug, info, warn};

use crate::actions::join_queue::enqueue_and_match;
use crate::actions::reply;
use crate::state::AppState;

/// Ends the skipper's room, tells the partner, and puts the skipper back in
/// the queue once the settle delay has passed. The partner is left idle.
pub fn handle_skip_partner(connection_id: &str, request: SkipPartnerRequest, state: &AppState) {
    if state.rooms.room_of(connection_id).as_deref() != Some(request.room_id.as_str()) {
        warn!(
            "Connection {} tried to skip in room {} it is not in",
            connection_id, request.room_id
        );
        reply(
            state,
            connection_id,
            ServerEvent::error(Some("skip_partner"), "Not a member of this room"),
        );
        return;
    }

    match state.rooms.leave(connection_id) {
        Some(departure) => {
            state.hub.send_to(
                &departure.partner_id,
                ServerEvent::PartnerSkipped {
                    room_id: departure.room.room_id.clone(),
                },
            );
        }
        None => debug!(
            "Room {} was already closed when {} skipped",
            request.room_id, connection_id
        ),
    }

    let connection_id = connection_id.to_string();
    let state = state.clone();
    info!(
        "Requeueing {} in {}ms",
        connection_id,
        state.settle_delay.as_millis()
    );
    tokio::spawn(async move {
        tokio::time::sleep(state.settle_delay).await;
        requeue(&connection_id, &state);
    });
}

fn requeue(connection_id: &str, state: &AppState) {
    if !state.hub.is_attached(connection_id) {
        debug!("Connection {} closed during settle delay", connection_id);
        return;
    }
    let Some(session) = state.registry.get(connection_id) else {
        debug!("Connection {} unregistered during settle delay", connection_id);
        return;
    };
    if state.queue.contains(connection_id) || state.rooms.room_of(connection_id).is_some() {
        debug!(
            "Connection {} already moved on during settle delay",
            connection_id
        );
        return;
    }

    enqueue_and_match(session, state);
}
