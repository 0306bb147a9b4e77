//! Room and identity state.
//!
//! The [`crate::Session`] is the only writer of this state; it changes in
//! reaction to server replies and broadcasts. Command handlers read it through
//! the [`SessionView`] trait.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shello_proto::payloads::RoomRecord;

/// User name before any server-confirmed switch.
pub const DEFAULT_USERNAME: &str = "guest";

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport. A reconnect may be scheduled.
    Disconnected,
    /// Transport opening.
    Connecting,
    /// Transport open.
    Connected,
}

/// Local user identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Current user name.
    pub username: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self { username: DEFAULT_USERNAME.to_string() }
    }
}

/// Reference to a room by id and display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRef {
    /// Server room id.
    pub id: u64,
    /// Display name at the time it was recorded.
    pub name: String,
}

/// Cached room list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Server room id.
    pub id: u64,
    /// Display name. Not unique.
    pub name: String,
    /// Users currently present.
    pub member_count: u32,
}

impl From<RoomRecord> for Room {
    fn from(record: RoomRecord) -> Self {
        Self { id: record.id, name: record.name, member_count: record.member_count }
    }
}

/// Room list keyed by id.
#[derive(Debug, Clone, Default)]
pub struct RoomDirectory {
    rooms: BTreeMap<u64, Room>,
}

impl RoomDirectory {
    /// Replace the whole list.
    pub fn replace(&mut self, records: impl IntoIterator<Item = RoomRecord>) {
        self.rooms = records.into_iter().map(|record| (record.id, Room::from(record))).collect();
    }

    /// Insert or overwrite one room.
    pub fn upsert(&mut self, record: RoomRecord) {
        self.rooms.insert(record.id, Room::from(record));
    }

    /// Shift a room's member count, saturating at zero.
    pub fn adjust_members(&mut self, id: u64, joined: bool) {
        if let Some(room) = self.rooms.get_mut(&id) {
            room.member_count = if joined {
                room.member_count.saturating_add(1)
            } else {
                room.member_count.saturating_sub(1)
            };
        }
    }

    /// Room with this id. `None` if not cached.
    pub fn get(&self, id: u64) -> Option<&Room> {
        self.rooms.get(&id)
    }

    /// Rooms whose name matches exactly, in id order.
    pub fn find_by_name(&self, name: &str) -> Vec<&Room> {
        self.rooms.values().filter(|room| room.name == name).collect()
    }

    /// All rooms in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Number of cached rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// No rooms cached.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Persisted identity and room, restored on the next connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// User name to switch back to.
    pub user: String,
    /// Room to rejoin. `None` if no room was entered.
    #[serde(rename = "roomID", default)]
    pub room_id: Option<u64>,
    /// Display name of that room.
    #[serde(rename = "roomName", default)]
    pub room_name: Option<String>,
}

impl SessionSnapshot {
    /// Room to rejoin, if both id and name were saved.
    pub fn room(&self) -> Option<RoomRef> {
        let id = self.room_id?;
        let name = self.room_name.clone().unwrap_or_default();
        Some(RoomRef { id, name })
    }
}

/// Read-only access to session state for command handlers.
pub trait SessionView {
    /// Current connection state.
    fn connection_state(&self) -> ConnectionState;

    /// Local identity.
    fn identity(&self) -> &Identity;

    /// Room currently entered. `None` before the first join.
    fn current_room(&self) -> Option<&RoomRef>;

    /// Cached room list.
    fn rooms(&self) -> &RoomDirectory;
}
