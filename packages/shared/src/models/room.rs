use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::session::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    Active,
    Closing,
}

/// A pairing of exactly two connections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Room {
    pub room_id: String,
    pub members: [String; 2],
    pub mode: Mode,
    pub created_at: DateTime<Utc>,
    pub state: RoomState,
    /// Last chat sequence number handed out for this room.
    pub last_sequence: u64,
    pub last_message_at: Option<DateTime<Utc>>,
}

impl Room {
    pub fn new(room_id: String, member_a: &str, member_b: &str, mode: Mode) -> Self {
        Room {
            room_id,
            members: [member_a.to_string(), member_b.to_string()],
            mode,
            created_at: Utc::now(),
            state: RoomState::Active,
            last_sequence: 0,
            last_message_at: None,
        }
    }

    pub fn has_member(&self, connection_id: &str) -> bool {
        self.members.iter().any(|member| member == connection_id)
    }

    /// The member that is not `connection_id`, if `connection_id` belongs to
    /// the room.
    pub fn partner_of(&self, connection_id: &str) -> Option<&str> {
        match &self.members {
            [a, b] if a == connection_id => Some(b),
            [a, b] if b == connection_id => Some(a),
            _ => None,
        }
    }
}

/// Timestamp and sequence number reserved for the next chat message of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageStamp {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_of() {
        let room = Room::new("room-1".to_string(), "x", "y", Mode::Text);

        assert_eq!(room.partner_of("x"), Some("y"));
        assert_eq!(room.partner_of("y"), Some("x"));
        assert_eq!(room.partner_of("z"), None);
        assert!(room.has_member("x"));
        assert!(!room.has_member("z"));
    }

    #[test]
    fn test_new_room_is_active() {
        let room = Room::new("room-1".to_string(), "x", "y", Mode::Video);

        assert_eq!(room.state, RoomState::Active);
        assert_eq!(room.mode, Mode::Video);
        assert_eq!(room.last_sequence, 0);
        assert!(room.last_message_at.is_none());
    }
}
