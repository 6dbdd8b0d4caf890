use shared::models::events::requests::ReportUserRequest;
use shared::models::events::ServerEvent;
use shared::services::errors::report_service_errors::ReportServiceError;
use tracing::warn;

use crate::actions::reply;
use crate::state::AppState;

pub async fn handle_report_user(connection_id: &str, request: ReportUserRequest, state: &AppState) {
    let result = state
        .report_service
        .report_user(
            &request.reporter_id,
            &request.reported_user_id,
            &request.reason,
            &request.room_id,
            request.description,
        )
        .await;

    match result {
        Ok(report) => reply(
            state,
            connection_id,
            ServerEvent::ReportSuccess {
                report_id: report.report_id,
            },
        ),
        Err(e) => {
            warn!("Report from connection {} failed: {}", connection_id, e);
            let message = match e {
                ReportServiceError::ValidationError(msg) => msg,
                ReportServiceError::PersistenceError(_) | ReportServiceError::Timeout => {
                    "Failed to submit report".to_string()
                }
            };
            reply(state, connection_id, ServerEvent::ReportError { message });
        }
    }
}
