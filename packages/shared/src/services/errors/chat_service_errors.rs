use crate::repositories::errors::PersistenceError;
use crate::services::errors::room_errors::RoomError;

#[derive(Debug)]
pub enum ChatServiceError {
    ValidationError(String),
    RoomError(RoomError),
    PersistenceError(PersistenceError),
    Timeout,
}

impl std::fmt::Display for ChatServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ChatServiceError::RoomError(err) => write!(f, "{}", err),
            ChatServiceError::PersistenceError(err) => write!(f, "Persistence error: {}", err),
            ChatServiceError::Timeout => write!(f, "Message store timed out"),
        }
    }
}

impl std::error::Error for ChatServiceError {}

impl From<RoomError> for ChatServiceError {
    fn from(err: RoomError) -> Self {
        ChatServiceError::RoomError(err)
    }
}

impl From<PersistenceError> for ChatServiceError {
    fn from(err: PersistenceError) -> Self {
        ChatServiceError::PersistenceError(err)
    }
}
