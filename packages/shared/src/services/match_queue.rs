use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::models::room::Room;
use crate::models::session::Session;
use crate::services::errors::room_errors::RoomError;
use crate::services::room_manager::RoomManager;

/// Pairing rule: modes must be identical, then either the language matches or
/// the interest sets intersect.
pub fn is_compatible(a: &Session, b: &Session) -> bool {
    if a.connection_id == b.connection_id || a.mode != b.mode {
        return false;
    }
    a.language == b.language || a.shares_interest_with(b)
}

/// Outcome of a successful matching pass.
#[derive(Debug, Clone)]
pub struct Match {
    pub room: Room,
    /// The entry whose pass produced the match.
    pub initiator: Session,
    pub partner: Session,
}

/// Sessions waiting to be paired, in insertion order.
pub struct MatchQueue {
    entries: Mutex<VecDeque<Session>>,
}

impl MatchQueue {
    pub fn new() -> Self {
        MatchQueue {
            entries: Mutex::new(VecDeque::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<Session>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a waiting entry and returns its 1-based position. Enqueuing a
    /// connection that is already waiting leaves the queue unchanged and
    /// reports the existing position. A connection that is in a room cannot
    /// wait; the check runs under the queue lock so no matching pass can
    /// interleave with it.
    pub fn enqueue(&self, session: Session, rooms: &RoomManager) -> Result<usize, RoomError> {
        let mut entries = self.entries();
        if rooms.room_of(&session.connection_id).is_some() {
            return Err(RoomError::AlreadyRoomed(session.connection_id));
        }
        if let Some(index) = entries
            .iter()
            .position(|entry| entry.connection_id == session.connection_id)
        {
            let joined_at = entries[index].joined_at;
            entries[index] = Session {
                joined_at,
                ..session
            };
            debug!(
                "Connection {} refreshed preferences at position {}",
                entries[index].connection_id,
                index + 1
            );
            return Ok(index + 1);
        }

        info!(
            "Connection {} joined the queue (mode: {}, language: {})",
            session.connection_id, session.mode, session.language
        );
        entries.push_back(session);
        Ok(entries.len())
    }

    /// Swaps in new preferences for a waiting connection, keeping its place
    /// and join time. Returns false when the connection is not waiting.
    pub fn refresh(&self, session: &Session) -> bool {
        let mut entries = self.entries();
        match entries
            .iter_mut()
            .find(|entry| entry.connection_id == session.connection_id)
        {
            Some(entry) => {
                *entry = Session {
                    joined_at: entry.joined_at,
                    ..session.clone()
                };
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, connection_id: &str) -> bool {
        let mut entries = self.entries();
        match entries
            .iter()
            .position(|entry| entry.connection_id == connection_id)
        {
            Some(index) => {
                entries.remove(index);
                info!("Connection {} left the queue", connection_id);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, connection_id: &str) -> bool {
        self.entries()
            .iter()
            .any(|entry| entry.connection_id == connection_id)
    }

    pub fn position(&self, connection_id: &str) -> Option<usize> {
        self.entries()
            .iter()
            .position(|entry| entry.connection_id == connection_id)
            .map(|index| index + 1)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First-fit matching pass for a waiting connection. Candidates are
    /// scanned in queue order; the first compatible one is taken. Both
    /// entries leave the queue and the room is created while the queue lock
    /// is held, so no concurrent pass can claim either of them.
    pub fn attempt_match(&self, connection_id: &str, rooms: &RoomManager) -> Option<Match> {
        let mut entries = self.entries();

        let Some(index_a) = entries
            .iter()
            .position(|entry| entry.connection_id == connection_id)
        else {
            debug!(
                "Connection {} is no longer waiting, skipping match",
                connection_id
            );
            return None;
        };

        let index_b = {
            let a = &entries[index_a];
            entries
                .iter()
                .enumerate()
                .find(|(index, candidate)| *index != index_a && is_compatible(a, candidate))
                .map(|(index, _)| index)
        };
        let Some(index_b) = index_b else {
            debug!(
                "No compatible partner for connection {} among {} waiting",
                connection_id,
                entries.len() - 1
            );
            return None;
        };

        let (a, b) = (&entries[index_a], &entries[index_b]);
        let room = match rooms.create_room(&a.connection_id, &b.connection_id, a.mode) {
            Ok(room) => room,
            Err(e) => {
                warn!("Could not pair {} with {}: {}", a.connection_id, b.connection_id, e);
                return None;
            }
        };

        // Remove the higher index first so the lower one stays valid.
        let (first, second) = if index_a > index_b {
            (index_a, index_b)
        } else {
            (index_b, index_a)
        };
        let removed_first = entries.remove(first);
        let removed_second = entries.remove(second);
        let (initiator, partner) = match (removed_first, removed_second) {
            (Some(x), Some(y)) if x.connection_id == connection_id => (x, y),
            (Some(x), Some(y)) => (y, x),
            _ => return None,
        };

        info!(
            "Matched {} with {} in room {}",
            initiator.connection_id, partner.connection_id, room.room_id
        );
        Some(Match {
            room,
            initiator,
            partner,
        })
    }
}

impl Default for MatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::{Mode, Preferences};
    use rstest::rstest;

    fn session(id: &str, language: &str, interests: &[&str], mode: Mode) -> Session {
        Session::new(
            id,
            Preferences::new(
                None,
                interests.iter().map(|i| i.to_string()).collect(),
                language,
                "",
                mode,
            ),
        )
    }

    #[rstest]
    #[case::same_language("en", &["music"], "en", &["sports"], true)]
    #[case::shared_interest("en", &["music", "art"], "fr", &["art"], true)]
    #[case::nothing_in_common("en", &["music"], "fr", &["sports"], false)]
    #[case::no_interests_other_language("en", &[], "de", &[], false)]
    fn test_is_compatible_soft_filter(
        #[case] language_a: &str,
        #[case] interests_a: &[&str],
        #[case] language_b: &str,
        #[case] interests_b: &[&str],
        #[case] expected: bool,
    ) {
        let a = session("a", language_a, interests_a, Mode::Text);
        let b = session("b", language_b, interests_b, Mode::Text);

        assert_eq!(is_compatible(&a, &b), expected);
        assert_eq!(is_compatible(&b, &a), expected);
    }

    #[test]
    fn test_mode_is_a_hard_filter() {
        let a = session("a", "en", &["music"], Mode::Text);
        let b = session("b", "en", &["music"], Mode::Video);

        assert!(!is_compatible(&a, &b));
    }

    #[test]
    fn test_never_compatible_with_self() {
        let a = session("a", "en", &["music"], Mode::Text);
        assert!(!is_compatible(&a, &a.clone()));
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let queue = MatchQueue::new();
        let rooms = RoomManager::new();

        assert_eq!(queue.enqueue(session("a", "en", &[], Mode::Text), &rooms), Ok(1));
        assert_eq!(queue.enqueue(session("b", "en", &[], Mode::Video), &rooms), Ok(2));
        assert_eq!(queue.enqueue(session("a", "fr", &[], Mode::Text), &rooms), Ok(1));
        assert_eq!(queue.len(), 2);

        // "a" now matches on its refreshed language.
        queue.enqueue(session("c", "fr", &[], Mode::Text), &rooms).unwrap();
        assert!(queue.attempt_match("c", &rooms).is_some());
    }

    #[test]
    fn test_refresh_only_touches_waiting_entries() {
        let queue = MatchQueue::new();
        let rooms = RoomManager::new();
        queue.enqueue(session("a", "en", &[], Mode::Text), &rooms).unwrap();
        queue.enqueue(session("b", "de", &[], Mode::Video), &rooms).unwrap();

        assert!(queue.refresh(&session("a", "de", &[], Mode::Video)));
        assert!(!queue.refresh(&session("c", "de", &[], Mode::Video)));
        assert_eq!(queue.position("a"), Some(1));
        assert_eq!(queue.len(), 2);

        let matched = queue.attempt_match("b", &rooms).unwrap();
        assert_eq!(matched.partner.connection_id, "a");
        assert_eq!(matched.partner.language, "de");
    }

    #[test]
    fn test_enqueue_rejects_roomed_connection() {
        let queue = MatchQueue::new();
        let rooms = RoomManager::new();
        rooms.create_room("a", "b", Mode::Text).unwrap();

        assert_eq!(
            queue.enqueue(session("a", "en", &[], Mode::Text), &rooms),
            Err(RoomError::AlreadyRoomed("a".to_string()))
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_remove() {
        let queue = MatchQueue::new();
        let rooms = RoomManager::new();
        queue.enqueue(session("a", "en", &[], Mode::Text), &rooms).unwrap();

        assert!(queue.remove("a"));
        assert!(!queue.remove("a"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_attempt_match_pairs_and_dequeues_both() {
        let queue = MatchQueue::new();
        let rooms = RoomManager::new();
        queue.enqueue(session("x", "en", &["music"], Mode::Text), &rooms).unwrap();
        queue.enqueue(session("y", "en", &["sports"], Mode::Text), &rooms).unwrap();

        let matched = queue.attempt_match("y", &rooms).unwrap();

        assert_eq!(matched.initiator.connection_id, "y");
        assert_eq!(matched.partner.connection_id, "x");
        assert_eq!(matched.room.mode, Mode::Text);
        assert!(queue.is_empty());
        assert_eq!(rooms.room_of("x"), Some(matched.room.room_id.clone()));
        assert_eq!(rooms.room_of("y"), Some(matched.room.room_id));
    }

    #[test]
    fn test_attempt_match_is_first_fit_in_queue_order() {
        let queue = MatchQueue::new();
        let rooms = RoomManager::new();
        queue.enqueue(session("video", "en", &["music"], Mode::Video), &rooms).unwrap();
        queue.enqueue(session("first", "fr", &["music"], Mode::Text), &rooms).unwrap();
        queue.enqueue(session("second", "en", &["music"], Mode::Text), &rooms).unwrap();
        queue.enqueue(session("new", "en", &["music"], Mode::Text), &rooms).unwrap();

        let matched = queue.attempt_match("new", &rooms).unwrap();

        // "second" shares language and interest, but "first" is earlier.
        assert_eq!(matched.partner.connection_id, "first");
        assert_eq!(queue.position("video"), Some(1));
        assert_eq!(queue.position("second"), Some(2));
    }

    #[test]
    fn test_attempt_match_leaves_entry_waiting_without_candidate() {
        let queue = MatchQueue::new();
        let rooms = RoomManager::new();
        queue.enqueue(session("z", "fr", &["art"], Mode::Video), &rooms).unwrap();

        assert!(queue.attempt_match("z", &rooms).is_none());
        assert_eq!(queue.position("z"), Some(1));
        assert_eq!(rooms.active_rooms(), 0);
    }

    #[test]
    fn test_attempt_match_for_missing_connection() {
        let queue = MatchQueue::new();
        let rooms = RoomManager::new();
        queue.enqueue(session("a", "en", &[], Mode::Text), &rooms).unwrap();

        assert!(queue.attempt_match("gone", &rooms).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_different_modes_never_match() {
        let queue = MatchQueue::new();
        let rooms = RoomManager::new();
        queue.enqueue(session("t", "en", &["music"], Mode::Text), &rooms).unwrap();
        queue.enqueue(session("v", "en", &["music"], Mode::Video), &rooms).unwrap();

        assert!(queue.attempt_match("t", &rooms).is_none());
        assert!(queue.attempt_match("v", &rooms).is_none());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_concurrent_passes_never_double_claim() {
        use std::sync::Arc;

        let queue = Arc::new(MatchQueue::new());
        let rooms = Arc::new(RoomManager::new());
        for i in 0..200 {
            queue.enqueue(session(&format!("c{}", i), "en", &[], Mode::Text), &rooms).unwrap();
        }

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let queue = queue.clone();
                let rooms = rooms.clone();
                std::thread::spawn(move || {
                    let mut matches = Vec::new();
                    for i in (worker..200).step_by(4) {
                        if let Some(m) = queue.attempt_match(&format!("c{}", i), &rooms) {
                            matches.push(m);
                        }
                    }
                    matches
                })
            })
            .collect();

        let mut seen = std::collections::HashSet::new();
        let mut total = 0;
        for handle in handles {
            for m in handle.join().unwrap() {
                assert!(seen.insert(m.initiator.connection_id.clone()));
                assert!(seen.insert(m.partner.connection_id.clone()));
                total += 1;
            }
        }

        assert_eq!(total, 100);
        assert!(queue.is_empty());
        assert_eq!(rooms.active_rooms(), 100);
    }
}
