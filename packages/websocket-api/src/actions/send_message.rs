use shared::models::events::requests::SendMessageRequest;
use shared::models::events::ServerEvent;
use shared::services::errors::chat_service_errors::ChatServiceError;
use shared::services::errors::room_errors::RoomError;
use tracing::warn;

use crate::actions::{reply, speaking_as};
use crate::state::AppState;

pub async fn handle_send_message(
    connection_id: &str,
    request: SendMessageRequest,
    state: &AppState,
) {
    let user_id = speaking_as(state, connection_id, request.user_id);

    if let Err(e) = state
        .chat_service
        .send_message(&request.room_id, connection_id, &user_id, &request.text)
        .await
    {
        warn!(
            "Message from {} in room {} not delivered: {}",
            connection_id, request.room_id, e
        );
        reply(
            state,
            connection_id,
            ServerEvent::error(Some("send_message"), client_message(&e)),
        );
    }
}

fn client_message(error: &ChatServiceError) -> String {
    match error {
        ChatServiceError::ValidationError(msg) => msg.clone(),
        ChatServiceError::RoomError(RoomError::RoomNotFound(_)) => "Room not found".to_string(),
        ChatServiceError::RoomError(_) => "Not a member of this room".to_string(),
        ChatServiceError::PersistenceError(_) | ChatServiceError::Timeout => {
            "Message could not be saved".to_string()
        }
    }
}
