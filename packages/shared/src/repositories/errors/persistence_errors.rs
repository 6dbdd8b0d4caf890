#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    Serialization(String),
    DynamoDb(String),
    Unavailable(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            PersistenceError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
            PersistenceError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for PersistenceError {}
