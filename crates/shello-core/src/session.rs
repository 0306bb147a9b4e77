//! Session layer state machine.
//!
//! Owns the connection lifecycle, reply/broadcast routing, and the room and
//! identity state. Uses the action pattern: methods take time as input and
//! return [`SessionAction`]s for the driver to execute, so the machine itself
//! performs no I/O.
//!
//! # State Machine
//!
//! ```text
//!                 connect()                 transport opened
//! ┌──────────────┐ ───────> ┌────────────┐ ─────────────────> ┌───────────┐
//! │ Disconnected │          │ Connecting │                    │ Connected │
//! └──────────────┘ <─────── └────────────┘                    └───────────┘
//!     ^    │   transport closed (no notice)                         │
//!     │    │ reconnect delay elapsed (tick)                         │
//!     │    └─────────────> connect()                                │
//!     └──────────────────── transport closed ("disconnected") ──────┘
//! ```
//!
//! # Bootstrap
//!
//! On open the session lists rooms with the reply hidden (suppression), and,
//! if a snapshot was persisted, switches back to the saved user. The saved
//! room is joined only once the `login_as` reply arrives, and every joined
//! room fetches its history once the `join_room` reply arrives. Replies are
//! matched by discriminator only: two concurrent requests with the same
//! `func` are indistinguishable.

use std::{ops::Sub, time::Duration};

use chrono::{DateTime, Utc};
use shello_proto::{
    Broadcast, Func, Inbound, Reply, ReplyBody, Request,
    payloads::{MessageRecord, RoomRecord},
};

use crate::{
    error::SessionError,
    log::{Draft, Kind, MessageLog},
    state::{ConnectionState, Identity, RoomDirectory, RoomRef, SessionSnapshot, SessionView},
    store::{self, KeyValueStore, SESSION_KEY},
};

/// Delay between a transport close and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Actions returned by the session state machine.
///
/// The driver executes these:
/// - `Open`: start a new transport connection
/// - `Send`: serialize the request and write it to the open transport
/// - `Close`: tear down the transport and drop its callbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Open a new transport.
    Open,
    /// Send this request.
    Send(Request),
    /// Close the transport.
    Close,
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Wait after a close before reconnecting.
    pub reconnect_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { reconnect_delay: DEFAULT_RECONNECT_DELAY }
    }
}

/// Shared resources the session touches while handling an event.
pub struct SessionContext<'a> {
    /// Display log.
    pub log: &'a mut MessageLog,
    /// Persistence for the session snapshot.
    pub store: &'a mut dyn KeyValueStore,
    /// Wall-clock time of the event being handled.
    pub wall_clock: DateTime<Utc>,
}

impl SessionContext<'_> {
    fn note(&mut self, draft: Draft) {
        self.log.append(draft, self.wall_clock);
    }
}

/// Session state machine.
///
/// Generic over `I` to support both real and virtual time.
#[derive(Debug, Clone)]
pub struct Session<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    state: ConnectionState,
    config: SessionConfig,
    /// Set once a transport opened; guards the "disconnected" notice.
    was_online: bool,
    /// Hide the next reply's visible entry.
    suppress_next: bool,
    /// Room to join once the identity switch is confirmed.
    pending_rejoin: Option<RoomRef>,
    /// Close time of the transport a reconnect is scheduled for.
    reconnect_from: Option<I>,
    identity: Identity,
    current_room: Option<RoomRef>,
    rooms: RoomDirectory,
}

impl<I> Session<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create a session in [`ConnectionState::Disconnected`] with nothing
    /// scheduled. Call [`Session::connect`] to start.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            config,
            was_online: false,
            suppress_next: false,
            pending_rejoin: None,
            reconnect_from: None,
            identity: Identity::default(),
            current_room: None,
            rooms: RoomDirectory::default(),
        }
    }

    /// Begin a connection attempt.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if not disconnected
    pub fn connect(
        &mut self,
        ctx: &mut SessionContext<'_>,
    ) -> Result<Vec<SessionAction>, SessionError> {
        if self.state != ConnectionState::Disconnected {
            return Err(SessionError::InvalidState { state: self.state, operation: "connect" });
        }

        self.state = ConnectionState::Connecting;
        self.reconnect_from = None;
        tracing::info!("connecting");
        ctx.note(Draft::temp_info("Connecting to server..."));

        Ok(vec![SessionAction::Open])
    }

    /// Transport finished opening.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if no connection attempt is in progress
    pub fn handle_opened(
        &mut self,
        ctx: &mut SessionContext<'_>,
    ) -> Result<Vec<SessionAction>, SessionError> {
        if self.state != ConnectionState::Connecting {
            return Err(SessionError::InvalidState {
                state: self.state,
                operation: "handle_opened",
            });
        }

        self.state = ConnectionState::Connected;
        self.was_online = true;
        tracing::info!("connected");
        ctx.note(Draft::info("Connected."));

        self.suppress_next = true;
        let mut actions = vec![SessionAction::Send(Request::GetRooms)];

        match store::load_json::<SessionSnapshot>(ctx.store, SESSION_KEY) {
            Ok(Some(snapshot)) => {
                self.pending_rejoin = snapshot.room();
                actions.push(SessionAction::Send(Request::LoginAs { username: snapshot.user }));
            },
            Ok(None) => {},
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable session snapshot"),
        }

        Ok(actions)
    }

    /// Transport closed, whether it was open or still connecting.
    ///
    /// Schedules exactly one reconnect. A duplicate close while already
    /// disconnected is ignored.
    pub fn handle_closed(&mut self, now: I, ctx: &mut SessionContext<'_>) -> Vec<SessionAction> {
        if self.state == ConnectionState::Disconnected {
            return vec![];
        }

        self.state = ConnectionState::Disconnected;
        self.suppress_next = false;
        self.pending_rejoin = None;
        self.reconnect_from = Some(now);

        if std::mem::take(&mut self.was_online) {
            tracing::info!("disconnected");
            ctx.note(Draft::info("Disconnected from server."));
        } else {
            tracing::debug!("connection attempt failed");
        }

        vec![SessionAction::Close]
    }

    /// Periodic maintenance: fires the scheduled reconnect once its delay has
    /// elapsed.
    pub fn tick(&mut self, now: I, ctx: &mut SessionContext<'_>) -> Vec<SessionAction> {
        let Some(closed_at) = self.reconnect_from else {
            return vec![];
        };

        if now - closed_at < self.config.reconnect_delay {
            return vec![];
        }

        self.connect(ctx).unwrap_or_default()
    }

    /// Stop for good: cancel any scheduled reconnect and close the transport.
    pub fn shutdown(&mut self) -> Vec<SessionAction> {
        self.reconnect_from = None;
        self.suppress_next = false;
        self.pending_rejoin = None;
        self.was_online = false;

        let previous = std::mem::replace(&mut self.state, ConnectionState::Disconnected);
        if previous == ConnectionState::Disconnected { vec![] } else { vec![SessionAction::Close] }
    }

    /// A reconnect is scheduled.
    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_from.is_some()
    }

    /// Hide the visible entry of the next reply. Its state effects still
    /// apply.
    pub fn suppress_next_reply(&mut self) {
        self.suppress_next = true;
    }

    /// The next reply's visible entry will be hidden.
    pub fn is_suppressing(&self) -> bool {
        self.suppress_next
    }

    /// Wrap a request for sending.
    ///
    /// # Errors
    ///
    /// - `SessionError::NotConnected` unless connected
    pub fn request(&self, request: Request) -> Result<SessionAction, SessionError> {
        if self.state != ConnectionState::Connected {
            return Err(SessionError::NotConnected);
        }

        tracing::debug!(func = %request.func(), "queueing request");
        Ok(SessionAction::Send(request))
    }

    /// Decode and route a text frame from the transport.
    ///
    /// Undecodable frames are logged and dropped.
    pub fn handle_text(&mut self, text: &str, ctx: &mut SessionContext<'_>) -> Vec<SessionAction> {
        match Inbound::decode(text) {
            Ok(inbound) => self.handle_inbound(inbound, ctx),
            Err(e) => {
                tracing::warn!(error = %e, "dropping undecodable frame");
                vec![]
            },
        }
    }

    /// Route a decoded inbound message.
    ///
    /// Messages arriving while not connected belong to a dead transport and
    /// are ignored.
    pub fn handle_inbound(
        &mut self,
        inbound: Inbound,
        ctx: &mut SessionContext<'_>,
    ) -> Vec<SessionAction> {
        if self.state != ConnectionState::Connected {
            tracing::debug!(state = ?self.state, "ignoring inbound message while not connected");
            return vec![];
        }

        match inbound {
            Inbound::Reply(reply) => self.handle_reply(reply, ctx),
            Inbound::Broadcast(broadcast) => self.handle_broadcast(broadcast, ctx),
        }
    }

    fn handle_reply(&mut self, reply: Reply, ctx: &mut SessionContext<'_>) -> Vec<SessionAction> {
        let visible = !std::mem::take(&mut self.suppress_next);
        tracing::debug!(response = %reply.func, visible, "reply received");

        let notice = |ctx: &mut SessionContext<'_>, draft: Draft| {
            if visible {
                ctx.note(draft);
            }
        };

        let body = match reply.outcome {
            Ok(body) => body,
            Err(error) => {
                if matches!(reply.func, Func::LoginAs | Func::CreateUser) {
                    self.pending_rejoin = None;
                }
                notice(ctx, Draft::error(error.to_string()));
                return vec![];
            },
        };

        let mut actions = Vec::new();
        match body {
            ReplyBody::Rooms(records) => {
                self.rooms.replace(records);
                notice(ctx, Draft::info(self.describe_rooms()));
            },
            ReplyBody::Messages(records) => {
                let Some(room) = self.current_room.clone() else {
                    return actions;
                };
                let mut loaded = 0usize;
                for record in records.into_iter().filter(|record| record.room_id == room.id) {
                    ctx.note(self.chat_draft(record));
                    loaded += 1;
                }
                notice(ctx, Draft::info(format!("Loaded {loaded} messages from #{}.", room.name)));
            },
            ReplyBody::RoomJoined(record) => {
                let switched = self.current_room.as_ref().is_none_or(|room| room.id != record.id);
                if switched {
                    ctx.note(Draft::new(Kind::ClearAll, ""));
                }

                let room = RoomRef { id: record.id, name: record.name.clone() };
                self.rooms.upsert(record);
                self.current_room = Some(room.clone());
                self.persist(ctx);

                notice(ctx, Draft::info(format!("Joined #{}.", room.name)));
                actions.push(SessionAction::Send(Request::GetMessages { room_id: room.id }));
            },
            ReplyBody::LoggedIn(user) | ReplyBody::UserCreated(user) => {
                let text = if reply.func == Func::CreateUser {
                    format!("Created user {0}. You are now {0}.", user.username)
                } else {
                    format!("You are now {}.", user.username)
                };
                self.identity = Identity { username: user.username };
                self.persist(ctx);

                notice(ctx, Draft::info(text));

                if let Some(room) = self.pending_rejoin.take() {
                    actions.push(SessionAction::Send(Request::JoinRoom { room_id: room.id }));
                }
            },
            ReplyBody::RoomCreated(record) => {
                let text = format!("Created room #{} (id {}).", record.name, record.id);
                self.rooms.upsert(record);
                notice(ctx, Draft::info(text));
            },
            ReplyBody::Username(user) => {
                notice(ctx, Draft::info(format!("Server knows you as {}.", user.username)));
            },
            ReplyBody::MessageSent | ReplyBody::MessageDeleted | ReplyBody::MarkedRead => {},
        }

        actions
    }

    fn handle_broadcast(
        &mut self,
        broadcast: Broadcast,
        ctx: &mut SessionContext<'_>,
    ) -> Vec<SessionAction> {
        tracing::debug!(event = broadcast.name(), "broadcast received");
        let mut actions = Vec::new();

        match broadcast {
            Broadcast::NewMessage(record) => {
                if !self.in_current_room(record.room_id) {
                    return actions;
                }
                let message_id = record.id;
                let draft = self.chat_draft(record);
                let incoming = draft.kind() == Kind::In;
                ctx.note(draft);
                if incoming {
                    actions.push(SessionAction::Send(Request::MarkRead { message_id }));
                }
            },
            Broadcast::RoomCreated(record) => {
                ctx.note(Draft::info(format!("Room #{} was created.", record.name)));
                self.rooms.upsert(record);
            },
            Broadcast::RoomUpdated(record) => self.apply_room_update(record),
            Broadcast::UserJoined(presence) => {
                self.rooms.adjust_members(presence.room_id, true);
                if self.in_current_room(presence.room_id) {
                    ctx.note(Draft::info(format!("{} entered the room.", presence.username)));
                }
            },
            Broadcast::UserLeft(presence) => {
                self.rooms.adjust_members(presence.room_id, false);
                if self.in_current_room(presence.room_id) {
                    ctx.note(Draft::info(format!("{} left the room.", presence.username)));
                }
            },
            Broadcast::MessageDeleted(deletion) => {
                if !ctx.log.tombstone(deletion.message_id) {
                    tracing::debug!(message_id = deletion.message_id, "deleted message not shown");
                }
            },
            Broadcast::MessageRead(receipt) => {
                ctx.log.set_read_by(receipt.message_id, receipt.read_by, &self.identity.username);
            },
        }

        actions
    }

    fn apply_room_update(&mut self, record: RoomRecord) {
        if let Some(room) = self.current_room.as_mut().filter(|room| room.id == record.id) {
            room.name.clone_from(&record.name);
        }
        self.rooms.upsert(record);
    }

    fn in_current_room(&self, room_id: u64) -> bool {
        self.current_room.as_ref().is_some_and(|room| room.id == room_id)
    }

    fn chat_draft(&self, record: MessageRecord) -> Draft {
        let kind = if record.username == self.identity.username { Kind::Out } else { Kind::In };
        let read_by = if kind == Kind::Out { record.read_by } else { None };
        Draft::new(kind, record.text)
            .sender(record.username)
            .at(record.timestamp)
            .server_id(record.id)
            .read_by(read_by)
    }

    fn persist(&self, ctx: &mut SessionContext<'_>) {
        let room = self.current_room.as_ref().or(self.pending_rejoin.as_ref());
        let snapshot = SessionSnapshot {
            user: self.identity.username.clone(),
            room_id: room.map(|room| room.id),
            room_name: room.map(|room| room.name.clone()),
        };

        if let Err(e) = store::save_json(ctx.store, SESSION_KEY, &snapshot) {
            tracing::warn!(error = %e, "failed to persist session snapshot");
            ctx.note(Draft::error(format!("Could not save session: {e}")));
        }
    }

    fn describe_rooms(&self) -> String {
        if self.rooms.is_empty() {
            return "No rooms yet. Create one with `create room <name>`.".to_string();
        }

        let listing: Vec<String> = self
            .rooms
            .iter()
            .map(|room| format!("#{} {} ({} online)", room.id, room.name, room.member_count))
            .collect();
        format!("Rooms: {}", listing.join(", "))
    }
}

impl<I> SessionView for Session<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    fn connection_state(&self) -> ConnectionState {
        self.state
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn current_room(&self) -> Option<&RoomRef> {
        self.current_room.as_ref()
    }

    fn rooms(&self) -> &RoomDirectory {
        &self.rooms
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::{MemoryStore, store::save_json};

    type T = Duration;

    struct Harness {
        session: Session<T>,
        log: MessageLog,
        store: MemoryStore,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                session: Session::new(SessionConfig::default()),
                log: MessageLog::default(),
                store: MemoryStore::new(),
            }
        }

        fn ctx(&mut self) -> (&mut Session<T>, SessionContext<'_>) {
            let wall_clock = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
            (&mut self.session, SessionContext {
                log: &mut self.log,
                store: &mut self.store,
                wall_clock,
            })
        }

        fn connect(&mut self) -> Vec<SessionAction> {
            let (session, mut ctx) = self.ctx();
            let mut actions = session.connect(&mut ctx).unwrap();
            actions.extend(session.handle_opened(&mut ctx).unwrap());
            actions
        }

        fn receive(&mut self, value: serde_json::Value) -> Vec<SessionAction> {
            let (session, mut ctx) = self.ctx();
            session.handle_text(&value.to_string(), &mut ctx)
        }

        fn close(&mut self, at: u64) -> Vec<SessionAction> {
            let (session, mut ctx) = self.ctx();
            session.handle_closed(Duration::from_secs(at), &mut ctx)
        }

        fn texts(&self, kind: Kind) -> Vec<String> {
            self.log
                .entries()
                .iter()
                .filter(|entry| entry.kind == kind)
                .map(|entry| entry.text.clone())
                .collect()
        }
    }

    fn reply(func: &str, result: serde_json::Value) -> serde_json::Value {
        json!({ "response": func, "result": result, "error": null })
    }

    #[test]
    fn open_lists_rooms_silently() {
        let mut h = Harness::new();
        let actions = h.connect();

        assert_eq!(actions, vec![SessionAction::Open, SessionAction::Send(Request::GetRooms)]);
        assert!(h.session.is_suppressing());

        h.receive(reply("get_rooms", json!([{ "id": 1, "name": "lobby", "member_count": 2 }])));
        assert_eq!(h.session.rooms().len(), 1);
        assert_eq!(h.texts(Kind::Info), vec!["Connected."]);
    }

    #[test]
    fn suppression_is_single_shot_even_on_error() {
        let mut h = Harness::new();
        h.connect();

        h.receive(json!({ "response": "get_rooms", "result": null, "error": "db down" }));
        assert!(h.texts(Kind::Error).is_empty());

        h.receive(json!({ "response": "get_rooms", "result": null, "error": "db down" }));
        assert_eq!(h.texts(Kind::Error), vec!["listing rooms failed: db down"]);
    }

    #[test]
    fn malformed_reply_consumes_suppression() {
        let mut h = Harness::new();
        h.connect();

        h.receive(reply("get_rooms", json!({ "rooms": [] })));
        assert!(!h.session.is_suppressing());
        assert!(h.texts(Kind::Error).is_empty());

        h.receive(reply("get_rooms", json!([{ "id": 1, "name": "lobby" }])));
        assert_eq!(h.texts(Kind::Info).last().map(String::as_str), Some("Rooms: #1 lobby (0 online)"));

        h.receive(reply("get_rooms", json!("nope")));
        let errors = h.texts(Kind::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("listing rooms failed: malformed result:"));
    }

    #[test]
    fn history_ids_overlapping_local_ids_keep_order() {
        let mut h = Harness::new();
        h.connect();
        h.receive(reply("get_rooms", json!([])));
        h.receive(reply("join_room", json!({ "id": 1, "name": "lobby" })));
        let joined = h.log.entries().iter().find(|entry| entry.text == "Joined #lobby.").unwrap().id;
        assert!(joined <= 4);

        h.receive(json!({ "event": "message_deleted", "payload": { "message_id": joined, "room_id": 1 } }));
        assert_eq!(h.log.get(joined).map(|entry| entry.text.as_str()), Some("Joined #lobby."));

        let history: Vec<_> = (1..=4)
            .map(|id| json!({
                "id": id, "room_id": 1, "username": "bob", "text": format!("m{id}"),
                "timestamp": "2024-05-01T08:00:00Z"
            }))
            .collect();
        h.receive(reply("get_messages", json!(history)));

        assert_eq!(h.texts(Kind::In), vec!["m1", "m2", "m3", "m4"]);
        assert!(h.texts(Kind::Info).contains(&"Joined #lobby.".to_string()));
    }

    #[test]
    fn read_counts_are_dropped_for_incoming_messages() {
        let mut h = Harness::new();
        h.connect();
        h.receive(reply("get_rooms", json!([])));
        h.receive(reply("join_room", json!({ "id": 1, "name": "lobby" })));

        h.receive(json!({ "event": "new_message", "payload": {
            "id": 12, "room_id": 1, "username": "bob", "text": "yo",
            "timestamp": "2024-05-01T08:00:00Z", "read_by": 3
        }}));

        let entry = h.log.by_server_id(12).unwrap();
        assert_eq!(entry.kind, Kind::In);
        assert_eq!(entry.read_by, None);
    }

    #[test]
    fn snapshot_rejoin_waits_for_login_reply() {
        let mut h = Harness::new();
        let snapshot =
            SessionSnapshot { user: "ann".into(), room_id: Some(4), room_name: Some("dev".into()) };
        save_json(&mut h.store, SESSION_KEY, &snapshot).unwrap();

        let actions = h.connect();
        assert!(actions.contains(&SessionAction::Send(Request::LoginAs { username: "ann".into() })));
        assert!(!actions.iter().any(|a| matches!(a, SessionAction::Send(Request::JoinRoom { .. }))));

        h.receive(reply("get_rooms", json!([])));
        let actions = h.receive(reply("login_as", json!({ "username": "ann" })));
        assert_eq!(actions, vec![SessionAction::Send(Request::JoinRoom { room_id: 4 })]);

        let actions = h.receive(reply("join_room", json!({ "id": 4, "name": "dev" })));
        assert_eq!(actions, vec![SessionAction::Send(Request::GetMessages { room_id: 4 })]);
        assert_eq!(h.session.current_room().map(|room| room.id), Some(4));
    }

    #[test]
    fn failed_login_drops_pending_rejoin() {
        let mut h = Harness::new();
        let snapshot =
            SessionSnapshot { user: "ann".into(), room_id: Some(4), room_name: Some("dev".into()) };
        save_json(&mut h.store, SESSION_KEY, &snapshot).unwrap();
        h.connect();
        h.receive(reply("get_rooms", json!([])));

        let actions = h.receive(json!({ "response": "login_as", "result": null, "error": "who?" }));
        assert!(actions.is_empty());
        assert_eq!(h.texts(Kind::Error), vec!["switching user failed: who?"]);
    }

    #[test]
    fn close_after_open_notifies_once_and_schedules_once() {
        let mut h = Harness::new();
        h.connect();

        assert_eq!(h.close(10), vec![SessionAction::Close]);
        assert!(h.close(11).is_empty());

        assert_eq!(h.texts(Kind::Info), vec!["Connected.", "Disconnected from server."]);
        assert!(h.session.reconnect_pending());
    }

    #[test]
    fn failed_first_connect_is_silent() {
        let mut h = Harness::new();
        let (session, mut ctx) = h.ctx();
        session.connect(&mut ctx).unwrap();

        h.close(0);
        assert!(h.texts(Kind::Info).is_empty());
        assert!(h.session.reconnect_pending());
    }

    #[test]
    fn reconnect_fires_after_delay() {
        let mut h = Harness::new();
        h.connect();
        h.close(10);

        let (session, mut ctx) = h.ctx();
        assert!(session.tick(Duration::from_secs(12), &mut ctx).is_empty());
        assert_eq!(session.tick(Duration::from_secs(13), &mut ctx), vec![SessionAction::Open]);
        assert_eq!(session.connection_state(), ConnectionState::Connecting);
        assert!(session.tick(Duration::from_secs(20), &mut ctx).is_empty());
    }

    #[test]
    fn shutdown_cancels_reconnect() {
        let mut h = Harness::new();
        h.connect();
        h.close(10);

        assert!(h.session.shutdown().is_empty());
        let (session, mut ctx) = h.ctx();
        assert!(session.tick(Duration::from_secs(60), &mut ctx).is_empty());
    }

    #[test]
    fn requests_need_connection() {
        let h = Harness::new();
        assert_eq!(h.session.request(Request::GetRooms), Err(SessionError::NotConnected));
    }

    #[test]
    fn incoming_message_is_confirmed_read() {
        let mut h = Harness::new();
        h.connect();
        h.receive(reply("get_rooms", json!([])));
        h.receive(reply("join_room", json!({ "id": 1, "name": "lobby" })));

        let actions = h.receive(json!({ "event": "new_message", "payload": {
            "id": 77, "room_id": 1, "username": "bob", "text": "yo",
            "timestamp": "2024-05-01T08:00:00Z"
        }}));

        assert_eq!(actions, vec![SessionAction::Send(Request::MarkRead { message_id: 77 })]);
        assert_eq!(h.log.by_server_id(77).map(|entry| entry.kind), Some(Kind::In));
    }

    #[test]
    fn messages_for_other_rooms_are_ignored() {
        let mut h = Harness::new();
        h.connect();
        h.receive(reply("get_rooms", json!([])));
        h.receive(reply("join_room", json!({ "id": 1, "name": "lobby" })));

        h.receive(json!({ "event": "new_message", "payload": {
            "id": 5, "room_id": 2, "username": "bob", "text": "elsewhere",
            "timestamp": "2024-05-01T08:00:00Z"
        }}));
        assert!(h.log.by_server_id(5).is_none());
    }

    #[test]
    fn room_update_renames_current_room() {
        let mut h = Harness::new();
        h.connect();
        h.receive(reply("get_rooms", json!([])));
        h.receive(reply("join_room", json!({ "id": 1, "name": "lobby" })));

        h.receive(json!({ "event": "room_updated", "payload": { "id": 1, "name": "hall" } }));
        assert_eq!(h.session.current_room().map(|room| room.name.as_str()), Some("hall"));
    }
}
