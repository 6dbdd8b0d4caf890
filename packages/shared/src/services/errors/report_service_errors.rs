use crate::repositories::errors::PersistenceError;

#[derive(Debug)]
pub enum ReportServiceError {
    ValidationError(String),
    PersistenceError(PersistenceError),
    Timeout,
}

impl std::fmt::Display for ReportServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ReportServiceError::PersistenceError(err) => write!(f, "Persistence error: {}", err),
            ReportServiceError::Timeout => write!(f, "Report store timed out"),
        }
    }
}

impl std::error::Error for ReportServiceError {}

impl From<PersistenceError> for ReportServiceError {
    fn from(err: PersistenceError) -> Self {
        ReportServiceError::PersistenceError(err)
    }
}
