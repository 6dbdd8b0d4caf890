use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// Kind column of the transcript table. This service only writes `Text`;
/// `System` rows can exist in a shared table and are read back as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    System,
}

/// One transcript entry. Never mutated once created.
///
/// Stored in DynamoDB with `room_id` as partition key and `sequence` as sort
/// key, so a room's transcript reads back in the order it was sent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub room_id: String,
    pub sequence: u64,
    pub user_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub message_type: MessageKind,
}

impl ChatMessage {
    pub fn new(
        room_id: &str,
        sequence: u64,
        user_id: &str,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        ChatMessage {
            room_id: room_id.to_string(),
            sequence,
            user_id: user_id.to_string(),
            text: text.to_string(),
            timestamp,
            message_type: MessageKind::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_defaults_to_text() {
        let message = ChatMessage::new("room-1", 1, "user-1", "hi", Utc::now());

        assert_eq!(message.message_type, MessageKind::Text);
        assert_eq!(message.sequence, 1);
    }

    #[test]
    fn test_stored_rows_decode_their_kind() {
        let system: ChatMessage = serde_json::from_str(
            r#"{"room_id":"room-1","sequence":1,"user_id":"moderator","text":"Be kind","timestamp":"2024-05-01T12:00:00Z","message_type":"system"}"#,
        )
        .unwrap();
        assert_eq!(system.message_type, MessageKind::System);

        let untyped: ChatMessage = serde_json::from_str(
            r#"{"room_id":"room-1","sequence":2,"user_id":"u1","text":"hi","timestamp":"2024-05-01T12:00:01Z"}"#,
        )
        .unwrap();
        assert_eq!(untyped.message_type, MessageKind::Text);
    }
}
