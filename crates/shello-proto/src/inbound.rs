//! Inbound message classification.
//!
//! A decoded frame is either a [`Reply`] (has `response`) or a [`Broadcast`]
//! (has `event`). Replies are normalized into one internal shape: the
//! discriminator plus either a typed [`ReplyBody`] or a [`RemoteError`] when
//! the server filled the `error` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Func, RemoteError, WireError,
    payloads::{
        Deletion, MessageRecord, Presence, ReadReceipt, RoomRecord, UserRecord,
    },
};

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Answer to a request this client sent.
    Reply(Reply),
    /// Unsolicited server push.
    Broadcast(Broadcast),
}

impl Inbound {
    /// Decode and classify a JSON text frame.
    ///
    /// # Errors
    ///
    /// - `WireError::Json` if the text is not JSON, a broadcast payload has the
    ///   wrong shape, or the reply envelope is malformed. A known reply whose
    ///   `result` has the wrong shape decodes as a failed [`Reply`] instead.
    /// - `WireError::Unclassified` if neither discriminator is present
    /// - `WireError::UnknownResponse` if `response` names no known request
    pub fn decode(text: &str) -> Result<Self, WireError> {
        let value: Value = serde_json::from_str(text)?;

        if value.get("event").is_some() {
            return Ok(Inbound::Broadcast(serde_json::from_value(value)?));
        }

        if value.get("response").is_some() {
            let raw: RawReply = serde_json::from_value(value)?;
            return Reply::from_raw(raw).map(Inbound::Reply);
        }

        Err(WireError::Unclassified)
    }
}

/// Server push, tagged by `event` with the record under `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum Broadcast {
    /// A message was posted.
    NewMessage(MessageRecord),
    /// A room was created.
    RoomCreated(RoomRecord),
    /// A room was renamed or its member count changed.
    RoomUpdated(RoomRecord),
    /// A user entered a room.
    UserJoined(Presence),
    /// A user left a room.
    UserLeft(Presence),
    /// A message was deleted.
    MessageDeleted(Deletion),
    /// A message's read count changed.
    MessageRead(ReadReceipt),
}

impl Broadcast {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Broadcast::NewMessage(_) => "new_message",
            Broadcast::RoomCreated(_) => "room_created",
            Broadcast::RoomUpdated(_) => "room_updated",
            Broadcast::UserJoined(_) => "user_joined",
            Broadcast::UserLeft(_) => "user_left",
            Broadcast::MessageDeleted(_) => "message_deleted",
            Broadcast::MessageRead(_) => "message_read",
        }
    }
}

/// Reply as it appears on the wire.
#[derive(Debug, Deserialize)]
struct RawReply {
    response: String,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Normalized reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Request this reply answers.
    pub func: Func,
    /// Typed result, or the server's error (including a result that could
    /// not be decoded).
    pub outcome: Result<ReplyBody, RemoteError>,
}

/// Typed reply result, one variant per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBody {
    /// `get_rooms`: full room list.
    Rooms(Vec<RoomRecord>),
    /// `get_messages`: room history, oldest first.
    Messages(Vec<MessageRecord>),
    /// `msg`: message accepted.
    MessageSent,
    /// `join_room`: the room now entered.
    RoomJoined(RoomRecord),
    /// `login_as`: identity switched.
    LoggedIn(UserRecord),
    /// `create_user`: identity created and switched.
    UserCreated(UserRecord),
    /// `create_room`: the new room.
    RoomCreated(RoomRecord),
    /// `get_username`: identity bound to this connection.
    Username(UserRecord),
    /// `delete_msg`: deletion accepted.
    MessageDeleted,
    /// `mark_read`: confirmation recorded.
    MarkedRead,
}

impl Reply {
    fn from_raw(raw: RawReply) -> Result<Self, WireError> {
        let func = Func::from_wire(&raw.response)
            .ok_or_else(|| WireError::UnknownResponse(raw.response.clone()))?;

        if let Some(message) = raw.error {
            let error = RemoteError { description: func.description(), message };
            return Ok(Self { func, outcome: Err(error) });
        }

        // A known reply with a malformed result still answers its request.
        let outcome = Self::decode_body(func, raw.result).map_err(|e| RemoteError {
            description: func.description(),
            message: format!("malformed result: {e}"),
        });

        Ok(Self { func, outcome })
    }

    fn decode_body(func: Func, result: Value) -> Result<ReplyBody, serde_json::Error> {
        Ok(match func {
            Func::GetRooms => ReplyBody::Rooms(serde_json::from_value(result)?),
            Func::GetMessages => ReplyBody::Messages(serde_json::from_value(result)?),
            Func::Msg => ReplyBody::MessageSent,
            Func::JoinRoom => ReplyBody::RoomJoined(serde_json::from_value(result)?),
            Func::LoginAs => ReplyBody::LoggedIn(serde_json::from_value(result)?),
            Func::CreateUser => ReplyBody::UserCreated(serde_json::from_value(result)?),
            Func::CreateRoom => ReplyBody::RoomCreated(serde_json::from_value(result)?),
            Func::GetUsername => ReplyBody::Username(serde_json::from_value(result)?),
            Func::DeleteMsg => ReplyBody::MessageDeleted,
            Func::MarkRead => ReplyBody::MarkedRead,
        })
    }
}
