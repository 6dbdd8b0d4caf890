use shared::models::events::requests::HistoryRequest;
use shared::models::events::responses::HistoryEntry;
use shared::models::events::ServerEvent;
use shared::services::errors::chat_service_errors::ChatServiceError;
use tracing::warn;

use crate::actions::reply;
use crate::config::MAX_HISTORY_LIMIT;
use crate::state::AppState;

pub async fn handle_get_history(connection_id: &str, request: HistoryRequest, state: &AppState) {
    let limit = request
        .limit
        .unwrap_or(state.history_limit)
        .clamp(1, MAX_HISTORY_LIMIT);

    match state
        .chat_service
        .recent_messages(&request.room_id, connection_id, limit)
        .await
    {
        Ok(messages) => reply(
            state,
            connection_id,
            ServerEvent::History {
                room_id: request.room_id,
                messages: messages.into_iter().map(HistoryEntry::from).collect(),
            },
        ),
        Err(e) => {
            warn!(
                "History for room {} refused to {}: {}",
                request.room_id, connection_id, e
            );
            let message = match e {
                ChatServiceError::RoomError(_) => "Not a member of this room",
                _ => "History is unavailable",
            };
            reply(
                state,
                connection_id,
                ServerEvent::error(Some("get_history"), message),
            );
        }
    }
}
