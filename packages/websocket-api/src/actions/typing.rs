use shared::models::events::requests::TypingRequest;
use shared::models::events::ServerEvent;

use crate::actions::speaking_as;
use crate::state::AppState;

pub fn handle_typing_start(connection_id: &str, request: TypingRequest, state: &AppState) {
    let user_id = speaking_as(state, connection_id, request.user_id);
    state.relay.forward(
        &request.room_id,
        connection_id,
        ServerEvent::UserTyping {
            room_id: request.room_id.clone(),
            user_id,
        },
    );
}

pub fn handle_typing_stop(connection_id: &str, request: TypingRequest, state: &AppState) {
    let user_id = speaking_as(state, connection_id, request.user_id);
    state.relay.forward(
        &request.room_id,
        connection_id,
        ServerEvent::UserStoppedTyping {
            room_id: request.room_id.clone(),
            user_id,
        },
    );
}
