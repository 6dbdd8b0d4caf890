use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::models::chat::ChatMessage;
use crate::models::events::ServerEvent;
use crate::repositories::chat_repository::ChatRepository;
use crate::services::errors::chat_service_errors::ChatServiceError;
use crate::services::room_manager::RoomManager;
use crate::services::signal_relay::SignalRelay;

#[derive(Clone)]
pub struct ChatService {
    rooms: Arc<RoomManager>,
    relay: SignalRelay,
    repository: Arc<dyn ChatRepository>,
    store_timeout: Duration,
    max_message_length: usize,
}

impl ChatService {
    pub fn new(
        rooms: Arc<RoomManager>,
        relay: SignalRelay,
        repository: Arc<dyn ChatRepository>,
        store_timeout: Duration,
        max_message_length: usize,
    ) -> Self {
        ChatService {
            rooms,
            relay,
            repository,
            store_timeout,
            max_message_length,
        }
    }

    /// Records a chat line and relays it to the sender's partner. Nothing is
    /// delivered unless the transcript write succeeded.
    pub async fn send_message(
        &self,
        room_id: &str,
        sender_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<ChatMessage, ChatServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatServiceError::ValidationError(
                "Message text is required".to_string(),
            ));
        }
        if text.chars().count() > self.max_message_length {
            return Err(ChatServiceError::ValidationError(format!(
                "Message text exceeds {} characters",
                self.max_message_length
            )));
        }

        let stamp = self.rooms.stamp_message(room_id, sender_id)?;
        let message = ChatMessage::new(room_id, stamp.sequence, user_id, text, stamp.timestamp);

        let stored = match timeout(self.store_timeout, self.repository.create_message(&message)).await
        {
            Ok(Ok(stored)) => stored,
            Ok(Err(e)) => {
                error!(
                    "Failed to persist message {} in room {}: {}",
                    message.sequence, room_id, e
                );
                return Err(ChatServiceError::from(e));
            }
            Err(_) => {
                error!(
                    "Timed out persisting message {} in room {}",
                    message.sequence, room_id
                );
                return Err(ChatServiceError::Timeout);
            }
        };

        let delivered = self.relay.forward(
            room_id,
            sender_id,
            ServerEvent::ReceiveMessage {
                room_id: stored.room_id.clone(),
                user_id: stored.user_id.clone(),
                text: stored.text.clone(),
                timestamp: stored.timestamp,
            },
        );
        if delivered == 0 {
            warn!(
                "Message {} in room {} persisted but not delivered",
                stored.sequence, room_id
            );
        } else {
            info!("Message {} delivered in room {}", stored.sequence, room_id);
        }

        Ok(stored)
    }

    /// The newest `limit` transcript entries of a room the requester belongs
    /// to, oldest first.
    pub async fn recent_messages(
        &self,
        room_id: &str,
        requester_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ChatServiceError> {
        self.rooms.recipients(room_id, requester_id)?;

        match timeout(
            self.store_timeout,
            self.repository.find_recent_messages(room_id, limit),
        )
        .await
        {
            Ok(result) => result.map_err(ChatServiceError::from),
            Err(_) => Err(ChatServiceError::Timeout),
        }
    }
}
