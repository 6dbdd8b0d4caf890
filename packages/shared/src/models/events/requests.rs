use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::session::{Mode, Preferences};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinQueueRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub mode: Mode,
}

impl JoinQueueRequest {
    pub fn into_preferences(self) -> Result<Preferences, String> {
        if self.language.trim().is_empty() {
            return Err("Language is required".to_string());
        }
        Ok(Preferences::new(
            self.user_id,
            self.interests,
            &self.language,
            &self.location,
            self.mode,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdpRequest {
    pub room_id: String,
    pub sdp: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidateRequest {
    pub room_id: String,
    pub candidate: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub room_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingRequest {
    pub room_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipPartnerRequest {
    pub room_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportUserRequest {
    pub reporter_id: String,
    pub reported_user_id: String,
    pub reason: String,
    pub room_id: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub room_id: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Events a client sends over its connection:
/// `{"event": "join_queue", "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinQueue(JoinQueueRequest),
    LeaveQueue,
    Offer(SdpRequest),
    Answer(SdpRequest),
    #[serde(rename = "ice-candidate")]
    IceCandidate(IceCandidateRequest),
    SendMessage(SendMessageRequest),
    TypingStart(TypingRequest),
    TypingStop(TypingRequest),
    SkipPartner(SkipPartnerRequest),
    ReportUser(ReportUserRequest),
    GetHistory(HistoryRequest),
}

impl ClientEvent {
    pub const NAMES: [&'static str; 11] = [
        "join_queue",
        "leave_queue",
        "offer",
        "answer",
        "ice-candidate",
        "send_message",
        "typing_start",
        "typing_stop",
        "skip_partner",
        "report_user",
        "get_history",
    ];

    pub fn is_known(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinQueue(_) => "join_queue",
            ClientEvent::LeaveQueue => "leave_queue",
            ClientEvent::Offer(_) => "offer",
            ClientEvent::Answer(_) => "answer",
            ClientEvent::IceCandidate(_) => "ice-candidate",
            ClientEvent::SendMessage(_) => "send_message",
            ClientEvent::TypingStart(_) => "typing_start",
            ClientEvent::TypingStop(_) => "typing_stop",
            ClientEvent::SkipPartner(_) => "skip_partner",
            ClientEvent::ReportUser(_) => "report_user",
            ClientEvent::GetHistory(_) => "get_history",
        }
    }
}
