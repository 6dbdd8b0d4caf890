use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::models::presence::Presence;
use crate::models::session::{Preferences, Session};
use crate::repositories::presence_repository::PresenceRepository;

/// Live sessions keyed by connection id, mirrored best-effort into the
/// presence store.
pub struct ConnectionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
    presence: Arc<dyn PresenceRepository>,
    store_timeout: Duration,
}

impl ConnectionRegistry {
    pub fn new(presence: Arc<dyn PresenceRepository>, store_timeout: Duration) -> Self {
        ConnectionRegistry {
            sessions: Mutex::new(HashMap::new()),
            presence,
            store_timeout,
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates or replaces the session for `connection_id`.
    pub async fn register(&self, connection_id: &str, preferences: Preferences) -> Session {
        let session = {
            let mut sessions = self.sessions();
            let joined_at = sessions.get(connection_id).map(|s| s.joined_at);
            let mut session = Session::new(connection_id, preferences);
            if let Some(joined_at) = joined_at {
                session.joined_at = joined_at;
            }
            sessions.insert(connection_id.to_string(), session.clone());
            session
        };
        info!(
            "Registered connection {} (language: {}, mode: {}, interests: {:?})",
            connection_id, session.language, session.mode, session.interests
        );

        let presence = Presence::online(&session);
        match timeout(self.store_timeout, self.presence.upsert_presence(&presence)).await {
            Ok(Ok(())) => debug!("Presence online for connection {}", connection_id),
            Ok(Err(e)) => warn!(
                "Failed to record presence for connection {}: {}",
                connection_id, e
            ),
            Err(_) => warn!(
                "Timed out recording presence for connection {}",
                connection_id
            ),
        }

        session
    }

    /// Removes the session. No-op if the connection never registered.
    pub async fn unregister(&self, connection_id: &str) -> Option<Session> {
        let removed = self.sessions().remove(connection_id);
        let Some(session) = removed else {
            debug!("Connection {} was not registered", connection_id);
            return None;
        };
        info!("Unregistered connection {}", connection_id);

        match timeout(
            self.store_timeout,
            self.presence.mark_offline(connection_id, Utc::now()),
        )
        .await
        {
            Ok(Ok(())) => debug!("Presence offline for connection {}", connection_id),
            Ok(Err(e)) => warn!(
                "Failed to mark connection {} offline: {}",
                connection_id, e
            ),
            Err(_) => warn!(
                "Timed out marking connection {} offline",
                connection_id
            ),
        }

        Some(session)
    }

    pub fn get(&self, connection_id: &str) -> Option<Session> {
        self.sessions().get(connection_id).cloned()
    }

    pub fn contains(&self, connection_id: &str) -> bool {
        self.sessions().contains_key(connection_id)
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
