use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_DESCRIPTION_LENGTH: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportReason {
    Harassment,
    Spam,
    Inappropriate,
    Other,
}

impl std::str::FromStr for ReportReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "harassment" => Ok(ReportReason::Harassment),
            "spam" => Ok(ReportReason::Spam),
            "inappropriate" => Ok(ReportReason::Inappropriate),
            "other" => Ok(ReportReason::Other),
            other => Err(format!("Unknown report reason: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Reviewed,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Report {
    pub report_id: String,
    pub reporter_id: String,
    pub reported_user_id: String,
    pub room_id: String,
    pub reason: ReportReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        reporter_id: &str,
        reported_user_id: &str,
        room_id: &str,
        reason: ReportReason,
        description: Option<String>,
    ) -> Self {
        Report {
            report_id: Uuid::new_v4().to_string(),
            reporter_id: reporter_id.to_string(),
            reported_user_id: reported_user_id.to_string(),
            room_id: room_id.to_string(),
            reason,
            description,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_parsing_is_case_insensitive() {
        assert_eq!("Spam".parse::<ReportReason>(), Ok(ReportReason::Spam));
        assert_eq!(
            " HARASSMENT ".parse::<ReportReason>(),
            Ok(ReportReason::Harassment)
        );
        assert!("rude".parse::<ReportReason>().is_err());
    }

    #[test]
    fn test_new_report_is_pending() {
        let report = Report::new("a", "b", "room-1", ReportReason::Other, None);

        assert_eq!(report.status, ReportStatus::Pending);
        assert!(!report.report_id.is_empty());

        let serialized = serde_json::to_string(&report).unwrap();
        assert!(serialized.contains("\"pending\""));
        assert!(!serialized.contains("description"));
    }
}
