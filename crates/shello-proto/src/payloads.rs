//! Records carried in reply results and broadcast payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat room as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    /// Server-assigned room id.
    pub id: u64,
    /// Display name. Not unique across rooms.
    pub name: String,
    /// Users currently present.
    #[serde(default)]
    pub member_count: u32,
}

/// A chat message as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Server-assigned message id.
    pub id: u64,
    /// Room the message was posted to.
    pub room_id: u64,
    /// Author's user name.
    pub username: String,
    /// Message body.
    pub text: String,
    /// Time the server accepted the message.
    pub timestamp: DateTime<Utc>,
    /// Number of users who confirmed reading it. `None` if not tracked.
    pub read_by: Option<u32>,
}

/// A user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// User name.
    pub username: String,
}

/// A user entering or leaving a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    /// Room entered or left.
    pub room_id: u64,
    /// User name.
    pub username: String,
}

/// A message removed by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    /// Server id of the removed message.
    pub message_id: u64,
    /// Room the message lived in.
    pub room_id: u64,
}

/// Updated read count for a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadReceipt {
    /// Server id of the message.
    pub message_id: u64,
    /// Number of users who confirmed reading it.
    pub read_by: u32,
}
