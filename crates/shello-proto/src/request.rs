//! Outbound requests.

use serde::{Deserialize, Serialize};

use crate::WireError;

/// Request discriminator.
///
/// Each request's `func` doubles as the `response` discriminator of its
/// reply, which is the only correlation the protocol offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    /// Post a chat message.
    Msg,
    /// Register a new user name.
    CreateUser,
    /// Switch to an existing user name.
    LoginAs,
    /// Create a room.
    CreateRoom,
    /// Enter a room.
    JoinRoom,
    /// Fetch a room's message history.
    GetMessages,
    /// Fetch the room list.
    GetRooms,
    /// Delete a message by id.
    DeleteMsg,
    /// Look up the user name bound to this connection.
    GetUsername,
    /// Confirm that a message was read.
    MarkRead,
}

impl Func {
    const ALL: [Func; 10] = [
        Func::Msg,
        Func::CreateUser,
        Func::LoginAs,
        Func::CreateRoom,
        Func::JoinRoom,
        Func::GetMessages,
        Func::GetRooms,
        Func::DeleteMsg,
        Func::GetUsername,
        Func::MarkRead,
    ];

    /// Wire name of this discriminator.
    pub fn as_str(self) -> &'static str {
        match self {
            Func::Msg => "msg",
            Func::CreateUser => "create_user",
            Func::LoginAs => "login_as",
            Func::CreateRoom => "create_room",
            Func::JoinRoom => "join_room",
            Func::GetMessages => "get_messages",
            Func::GetRooms => "get_rooms",
            Func::DeleteMsg => "delete_msg",
            Func::GetUsername => "get_username",
            Func::MarkRead => "mark_read",
        }
    }

    /// Parse a wire name. `None` if the name is not a known request.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|func| func.as_str() == name)
    }

    /// Human-readable description used in error entries.
    pub fn description(self) -> &'static str {
        match self {
            Func::Msg => "sending message",
            Func::CreateUser => "creating user",
            Func::LoginAs => "switching user",
            Func::CreateRoom => "creating room",
            Func::JoinRoom => "joining room",
            Func::GetMessages => "loading history",
            Func::GetRooms => "listing rooms",
            Func::DeleteMsg => "deleting message",
            Func::GetUsername => "looking up user name",
            Func::MarkRead => "confirming read",
        }
    }
}

impl std::fmt::Display for Func {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound request, serialized as a JSON object tagged by `func`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "func", rename_all = "snake_case")]
pub enum Request {
    /// Post `text` to a room.
    Msg {
        /// Message body.
        text: String,
        /// Target room.
        room_id: u64,
    },
    /// Register a new user.
    CreateUser {
        /// Requested user name.
        username: String,
    },
    /// Switch identity to an existing user.
    LoginAs {
        /// User name to switch to.
        username: String,
    },
    /// Create a room.
    CreateRoom {
        /// Display name of the new room.
        room_name: String,
    },
    /// Enter a room.
    JoinRoom {
        /// Room to enter.
        room_id: u64,
    },
    /// Fetch a room's history.
    GetMessages {
        /// Room whose history is requested.
        room_id: u64,
    },
    /// Fetch the room list.
    GetRooms,
    /// Delete a message.
    DeleteMsg {
        /// Server id of the message.
        message_id: u64,
        /// Room the message lives in.
        room_id: u64,
    },
    /// Look up the user bound to this connection.
    GetUsername,
    /// Confirm a message was read.
    MarkRead {
        /// Server id of the message.
        message_id: u64,
    },
}

impl Request {
    /// Discriminator of this request.
    pub fn func(&self) -> Func {
        match self {
            Request::Msg { .. } => Func::Msg,
            Request::CreateUser { .. } => Func::CreateUser,
            Request::LoginAs { .. } => Func::LoginAs,
            Request::CreateRoom { .. } => Func::CreateRoom,
            Request::JoinRoom { .. } => Func::JoinRoom,
            Request::GetMessages { .. } => Func::GetMessages,
            Request::GetRooms => Func::GetRooms,
            Request::DeleteMsg { .. } => Func::DeleteMsg,
            Request::GetUsername => Func::GetUsername,
            Request::MarkRead { .. } => Func::MarkRead,
        }
    }

    /// Encode as a JSON text frame.
    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }
}
