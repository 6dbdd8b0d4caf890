use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::chat::ChatMessage;
use crate::models::session::{Mode, Session};

/// What a participant learns about its partner when a room is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub interests: Vec<String>,
    pub language: String,
    pub location: String,
    pub mode: Mode,
}

impl From<&Session> for PartnerSummary {
    fn from(session: &Session) -> Self {
        PartnerSummary {
            user_id: session.user_id.clone(),
            interests: session.interests.clone(),
            language: session.language.clone(),
            location: session.location.clone(),
            mode: session.mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub user_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ChatMessage> for HistoryEntry {
    fn from(message: ChatMessage) -> Self {
        HistoryEntry {
            user_id: message.user_id,
            text: message.text,
            timestamp: message.timestamp,
        }
    }
}

/// Events the server pushes to a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    QueueJoined {
        position: usize,
    },
    QueueLeft {},
    #[serde(rename_all = "camelCase")]
    MatchFound {
        room_id: String,
        initiator: bool,
        partner: PartnerSummary,
    },
    #[serde(rename_all = "camelCase")]
    Offer { room_id: String, sdp: Value },
    #[serde(rename_all = "camelCase")]
    Answer { room_id: String, sdp: Value },
    #[serde(rename = "ice-candidate", rename_all = "camelCase")]
    IceCandidate { room_id: String, candidate: Value },
    #[serde(rename_all = "camelCase")]
    ReceiveMessage {
        room_id: String,
        user_id: String,
        text: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    UserTyping { room_id: String, user_id: String },
    #[serde(rename_all = "camelCase")]
    UserStoppedTyping { room_id: String, user_id: String },
    #[serde(rename_all = "camelCase")]
    PartnerSkipped { room_id: String },
    #[serde(rename_all = "camelCase")]
    PartnerLeft { room_id: String },
    #[serde(rename_all = "camelCase")]
    ReportSuccess { report_id: String },
    ReportError {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    History {
        room_id: String,
        messages: Vec<HistoryEntry>,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        event: Option<String>,
        message: String,
    },
}

impl ServerEvent {
    pub fn error(event: Option<&str>, message: impl Into<String>) -> Self {
        ServerEvent::Error {
            event: event.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::QueueJoined { .. } => "queue_joined",
            ServerEvent::QueueLeft {} => "queue_left",
            ServerEvent::MatchFound { .. } => "match_found",
            ServerEvent::Offer { .. } => "offer",
            ServerEvent::Answer { .. } => "answer",
            ServerEvent::IceCandidate { .. } => "ice-candidate",
            ServerEvent::ReceiveMessage { .. } => "receive_message",
            ServerEvent::UserTyping { .. } => "user_typing",
            ServerEvent::UserStoppedTyping { .. } => "user_stopped_typing",
            ServerEvent::PartnerSkipped { .. } => "partner_skipped",
            ServerEvent::PartnerLeft { .. } => "partner_left",
            ServerEvent::ReportSuccess { .. } => "report_success",
            ServerEvent::ReportError { .. } => "report_error",
            ServerEvent::History { .. } => "history",
            ServerEvent::Error { .. } => "error",
        }
    }
}
