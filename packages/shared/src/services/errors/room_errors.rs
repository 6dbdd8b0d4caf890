#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    RoomNotFound(String),
    NotAMember { room_id: String, connection_id: String },
    SelfMatch(String),
    AlreadyRoomed(String),
}

impl std::fmt::Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomError::RoomNotFound(room_id) => write!(f, "Room not found: {}", room_id),
            RoomError::NotAMember {
                room_id,
                connection_id,
            } => write!(f, "Connection {} is not a member of room {}", connection_id, room_id),
            RoomError::SelfMatch(connection_id) => {
                write!(f, "Connection {} cannot be paired with itself", connection_id)
            }
            RoomError::AlreadyRoomed(connection_id) => {
                write!(f, "Connection {} is already in a room", connection_id)
            }
        }
    }
}

impl std::error::Error for RoomError {}
