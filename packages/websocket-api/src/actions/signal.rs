use shared::models::events::requests::{IceCandidateRequest, SdpRequest};
use shared::models::events::ServerEvent;

use crate::state::AppState;

// Signaling payloads are opaque: they go to the partner untouched, and a
// stale room or foreign sender is dropped by the relay.

pub fn handle_offer(connection_id: &str, request: SdpRequest, state: &AppState) {
    let event = ServerEvent::Offer {
        room_id: request.room_id.clone(),
        sdp: request.sdp,
    };
    state.relay.forward(&request.room_id, connection_id, event);
}

pub fn handle_answer(connection_id: &str, request: SdpRequest, state: &AppState) {
    let event = ServerEvent::Answer {
        room_id: request.room_id.clone(),
        sdp: request.sdp,
    };
    state.relay.forward(&request.room_id, connection_id, event);
}

pub fn handle_ice_candidate(connection_id: &str, request: IceCandidateRequest, state: &AppState) {
    let event = ServerEvent::IceCandidate {
        room_id: request.room_id.clone(),
        candidate: request.candidate,
    };
    state.relay.forward(&request.room_id, connection_id, event);
}
