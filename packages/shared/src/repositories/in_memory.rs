use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::chat::ChatMessage;
use crate::models::presence::{Presence, PresenceStats};
use crate::models::report::Report;
use crate::repositories::chat_repository::ChatRepository;
use crate::repositories::errors::PersistenceError;
use crate::repositories::presence_repository::PresenceRepository;
use crate::repositories::report_repository::ReportRepository;

/// Process-local store backing all three repositories. Used when no DynamoDB
/// tables are configured and by the test suites.
#[derive(Default)]
pub struct InMemoryStore {
    presence: Mutex<HashMap<String, Presence>>,
    messages: Mutex<HashMap<String, Vec<ChatMessage>>>,
    reports: Mutex<Vec<Report>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presence_of(&self, connection_id: &str) -> Option<Presence> {
        lock(&self.presence).get(connection_id).cloned()
    }

    pub fn reports(&self) -> Vec<Report> {
        lock(&self.reports).clone()
    }
}

#[async_trait]
impl PresenceRepository for InMemoryStore {
    async fn upsert_presence(&self, presence: &Presence) -> Result<(), PersistenceError> {
        lock(&self.presence).insert(presence.connection_id.clone(), presence.clone());
        Ok(())
    }

    async fn mark_offline(
        &self,
        connection_id: &str,
        last_seen: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        if let Some(presence) = lock(&self.presence).get_mut(connection_id) {
            presence.is_online = false;
            presence.last_seen = last_seen;
        }
        Ok(())
    }

    async fn count_online(&self) -> Result<usize, PersistenceError> {
        Ok(lock(&self.presence)
            .values()
            .filter(|presence| presence.is_online)
            .count())
    }

    async fn aggregate_online(&self) -> Result<PresenceStats, PersistenceError> {
        let mut stats = PresenceStats::default();
        for presence in lock(&self.presence).values().filter(|p| p.is_online) {
            stats.record(&presence.language, presence.mode);
        }
        Ok(stats)
    }
}

#[async_trait]
impl ChatRepository for InMemoryStore {
    async fn create_message(&self, message: &ChatMessage) -> Result<ChatMessage, PersistenceError> {
        let mut messages = lock(&self.messages);
        let transcript = messages.entry(message.room_id.clone()).or_default();
        if transcript
            .iter()
            .any(|existing| existing.sequence == message.sequence)
        {
            return Err(PersistenceError::Unavailable(format!(
                "Duplicate sequence {} for room {}",
                message.sequence, message.room_id
            )));
        }
        let index = transcript.partition_point(|existing| existing.sequence < message.sequence);
        transcript.insert(index, message.clone());
        Ok(message.clone())
    }

    async fn find_recent_messages(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, PersistenceError> {
        let messages = lock(&self.messages);
        let transcript = match messages.get(room_id) {
            Some(transcript) => transcript,
            None => return Ok(Vec::new()),
        };
        let start = transcript.len().saturating_sub(limit);
        Ok(transcript[start..].to_vec())
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn create_report(&self, report: &Report) -> Result<(), PersistenceError> {
        lock(&self.reports).push(report.clone());
        Ok(())
    }
}
