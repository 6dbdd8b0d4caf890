use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{error, info};

use crate::models::report::{Report, ReportReason, MAX_DESCRIPTION_LENGTH};
use crate::repositories::report_repository::ReportRepository;
use crate::services::errors::report_service_errors::ReportServiceError;

#[derive(Clone)]
pub struct ReportService {
    repository: Arc<dyn ReportRepository>,
    store_timeout: Duration,
}

impl ReportService {
    pub fn new(repository: Arc<dyn ReportRepository>, store_timeout: Duration) -> Self {
        ReportService {
            repository,
            store_timeout,
        }
    }

    pub async fn report_user(
        &self,
        reporter_id: &str,
        reported_user_id: &str,
        reason: &str,
        room_id: &str,
        description: Option<String>,
    ) -> Result<Report, ReportServiceError> {
        let reporter_id = reporter_id.trim();
        let reported_user_id = reported_user_id.trim();
        let room_id = room_id.trim();
        if reporter_id.is_empty() || reported_user_id.is_empty() || room_id.is_empty() {
            return Err(ReportServiceError::ValidationError(
                "Reporter, reported user and room are required".to_string(),
            ));
        }
        if reporter_id == reported_user_id {
            return Err(ReportServiceError::ValidationError(
                "Cannot report yourself".to_string(),
            ));
        }

        let reason = reason
            .parse::<ReportReason>()
            .map_err(ReportServiceError::ValidationError)?;

        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if let Some(description) = &description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Err(ReportServiceError::ValidationError(format!(
                    "Description exceeds {} characters",
                    MAX_DESCRIPTION_LENGTH
                )));
            }
        }

        let report = Report::new(reporter_id, reported_user_id, room_id, reason, description);
        match timeout(self.store_timeout, self.repository.create_report(&report)).await {
            Ok(Ok(())) => {
                info!(
                    "Report {} filed by {} against {} in room {}",
                    report.report_id, reporter_id, reported_user_id, room_id
                );
                Ok(report)
            }
            Ok(Err(e)) => {
                error!("Failed to store report from {}: {}", reporter_id, e);
                Err(ReportServiceError::from(e))
            }
            Err(_) => {
                error!("Timed out storing report from {}", reporter_id);
                Err(ReportServiceError::Timeout)
            }
        }
    }
}
