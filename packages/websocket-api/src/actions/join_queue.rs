use shared::models::events::requests::JoinQueueRequest;
use shared::models::events::{PartnerSummary, ServerEvent};
use shared::models::session::Session;
use shared::services::match_queue::Match;
use tracing::{debug, info, warn};

use crate::actions::reply;
use crate::state::AppState;

pub async fn handle_join_queue(connection_id: &str, request: JoinQueueRequest, state: &AppState) {
    if state.rooms.room_of(connection_id).is_some() {
        warn!("Connection {} tried to join while in a room", connection_id);
        reply(
            state,
            connection_id,
            ServerEvent::error(Some("join_queue"), "Already in a room"),
        );
        return;
    }

    let preferences = match request.into_preferences() {
        Ok(preferences) => preferences,
        Err(message) => {
            debug!("Invalid join_queue from {}: {}", connection_id, message);
            reply(
                state,
                connection_id,
                ServerEvent::error(Some("join_queue"), message),
            );
            return;
        }
    };

    // A waiting entry takes the new preferences before the presence write yields.
    if state
        .queue
        .refresh(&Session::new(connection_id, preferences.clone()))
    {
        debug!("Refreshed waiting entry for connection {}", connection_id);
    }

    let session = state.registry.register(connection_id, preferences).await;
    enqueue_and_match(session, state);
}

/// Puts a registered session in the queue, acknowledges its position, and
/// runs one matching pass for it.
pub(crate) fn enqueue_and_match(session: Session, state: &AppState) {
    let connection_id = session.connection_id.clone();

    let position = match state.queue.enqueue(session, &state.rooms) {
        Ok(position) => position,
        Err(e) => {
            // Roomed by a concurrent pass, which already sent match_found.
            debug!("Not enqueueing connection {}: {}", connection_id, e);
            return;
        }
    };
    reply(state, &connection_id, ServerEvent::QueueJoined { position });

    // A socket that closed while we were registering must not stay queued.
    if !state.hub.is_attached(&connection_id) {
        state.queue.remove(&connection_id);
        debug!("Connection {} closed before matching", connection_id);
        return;
    }

    match state.queue.attempt_match(&connection_id, &state.rooms) {
        Some(matched) => announce_match(&matched, state),
        None => debug!(
            "Connection {} waiting at position {} ({} in queue)",
            connection_id,
            position,
            state.queue.len()
        ),
    }
}

fn announce_match(matched: &Match, state: &AppState) {
    let room_id = &matched.room.room_id;
    info!(
        "Announcing room {} to {} and {}",
        room_id, matched.initiator.connection_id, matched.partner.connection_id
    );

    state.hub.send_to(
        &matched.initiator.connection_id,
        ServerEvent::MatchFound {
            room_id: room_id.clone(),
            initiator: true,
            partner: PartnerSummary::from(&matched.partner),
        },
    );
    state.hub.send_to(
        &matched.partner.connection_id,
        ServerEvent::MatchFound {
            room_id: room_id.clone(),
            initiator: false,
            partner: PartnerSummary::from(&matched.initiator),
        },
    );
}
