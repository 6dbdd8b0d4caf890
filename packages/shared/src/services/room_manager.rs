use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::room::{MessageStamp, Room, RoomState};
use crate::models::session::Mode;
use crate::services::errors::room_errors::RoomError;

/// Unique room identifiers: a process-wide counter and a random v4 token,
/// prefixed with the creation time. Uniqueness does not depend on clock
/// resolution or on connection ids.
pub struct RoomIdGenerator {
    counter: AtomicU64,
}

impl RoomIdGenerator {
    pub fn new() -> Self {
        RoomIdGenerator {
            counter: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> String {
        let count = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!(
            "room-{:x}-{}-{}",
            Utc::now().timestamp_millis(),
            count,
            Uuid::new_v4().simple()
        )
    }
}

impl Default for RoomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Returned by [`RoomManager::leave`]: the room that was torn down and the
/// member that still has to be told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: Room,
    pub partner_id: String,
}

#[derive(Default)]
struct RoomTable {
    rooms: HashMap<String, Room>,
    membership: HashMap<String, String>,
}

/// Active rooms and the connection → room index.
pub struct RoomManager {
    table: Mutex<RoomTable>,
    ids: RoomIdGenerator,
}

impl RoomManager {
    pub fn new() -> Self {
        RoomManager {
            table: Mutex::new(RoomTable::default()),
            ids: RoomIdGenerator::new(),
        }
    }

    fn table(&self) -> MutexGuard<'_, RoomTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_room(&self, id_a: &str, id_b: &str, mode: Mode) -> Result<Room, RoomError> {
        if id_a == id_b {
            return Err(RoomError::SelfMatch(id_a.to_string()));
        }

        let mut table = self.table();
        for id in [id_a, id_b] {
            if table.membership.contains_key(id) {
                return Err(RoomError::AlreadyRoomed(id.to_string()));
            }
        }

        let room = Room::new(self.ids.next_id(), id_a, id_b, mode);
        table
            .membership
            .insert(id_a.to_string(), room.room_id.clone());
        table
            .membership
            .insert(id_b.to_string(), room.room_id.clone());
        table.rooms.insert(room.room_id.clone(), room.clone());

        info!(
            "Created room {} for {} and {} (mode: {})",
            room.room_id, id_a, id_b, mode
        );
        Ok(room)
    }

    /// Tears down the room `connection_id` belongs to. Returns `None` when the
    /// connection is not in a room.
    pub fn leave(&self, connection_id: &str) -> Option<Departure> {
        let mut table = self.table();
        let room_id = table.membership.get(connection_id)?.clone();
        let Some(mut room) = table.rooms.remove(&room_id) else {
            table.membership.remove(connection_id);
            return None;
        };
        room.state = RoomState::Closing;
        for member in &room.members {
            table.membership.remove(member);
        }
        let partner_id = room.partner_of(connection_id)?.to_string();

        info!(
            "Closed room {} after {} left, notifying {}",
            room.room_id, connection_id, partner_id
        );
        Some(Departure { room, partner_id })
    }

    pub fn room_of(&self, connection_id: &str) -> Option<String> {
        self.table().membership.get(connection_id).cloned()
    }

    pub fn get(&self, room_id: &str) -> Option<Room> {
        self.table().rooms.get(room_id).cloned()
    }

    /// The members of `room_id` other than `sender_id`, provided the sender is
    /// itself a member.
    pub fn recipients(&self, room_id: &str, sender_id: &str) -> Result<Vec<String>, RoomError> {
        let table = self.table();
        let room = table
            .rooms
            .get(room_id)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.to_string()))?;
        if !room.has_member(sender_id) {
            return Err(RoomError::NotAMember {
                room_id: room_id.to_string(),
                connection_id: sender_id.to_string(),
            });
        }
        Ok(room
            .members
            .iter()
            .filter(|member| member.as_str() != sender_id)
            .cloned()
            .collect())
    }

    /// Reserves the next transcript position of a room for a member. The
    /// timestamp never goes backwards within a room.
    pub fn stamp_message(&self, room_id: &str, sender_id: &str) -> Result<MessageStamp, RoomError> {
        let mut table = self.table();
        let room = table
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.to_string()))?;
        if !room.has_member(sender_id) {
            return Err(RoomError::NotAMember {
                room_id: room_id.to_string(),
                connection_id: sender_id.to_string(),
            });
        }

        let now = Utc::now();
        let timestamp = match room.last_message_at {
            Some(last) if last > now => last,
            _ => now,
        };
        room.last_sequence += 1;
        room.last_message_at = Some(timestamp);
        debug!(
            "Stamped message {} in room {} at {}",
            room.last_sequence, room_id, timestamp
        );

        Ok(MessageStamp {
            sequence: room.last_sequence,
            timestamp,
        })
    }

    pub fn active_rooms(&self) -> usize {
        self.table().rooms.len()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}
