use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::session::{Mode, Session};

/// Durable online/offline record for one connection.
/// DynamoDB PK: "connection_id".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Presence {
    pub connection_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub interests: Vec<String>,
    pub language: String,
    pub location: String,
    pub mode: Mode,
    pub is_online: bool,
    pub last_seen: DateTime<Utc>,
}

impl Presence {
    pub fn online(session: &Session) -> Self {
        Presence {
            connection_id: session.connection_id.clone(),
            user_id: session.user_id.clone(),
            interests: session.interests.clone(),
            language: session.language.clone(),
            location: session.location.clone(),
            mode: session.mode,
            is_online: true,
            last_seen: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresenceStats {
    pub online: usize,
    pub by_language: HashMap<String, usize>,
    pub by_mode: HashMap<Mode, usize>,
}

impl PresenceStats {
    pub fn record(&mut self, language: &str, mode: Mode) {
        self.online += 1;
        *self.by_language.entry(language.to_string()).or_insert(0) += 1;
        *self.by_mode.entry(mode).or_insert(0) += 1;
    }
}
