//! Integration tests for App behavior against a scripted server.
//!
//! # Oracle Pattern
//!
//! Tests drive the App with the same events a driver would deliver, collect
//! the requests it emits, feed back server replies and broadcasts, and end
//! with oracle checks on:
//! - the requests sent, in order
//! - the visible log entries
//! - identity and room state

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use shello_app::{App, AppAction, AppConfig, AppEvent, SavedThemes};
use shello_core::{
    ConnectionState, Environment, KeyValueStore, Kind, SessionSnapshot, SessionView, StoreError,
    store::{self, SESSION_KEY, THEMES_KEY},
};
use shello_proto::Request;

/// Virtual clock shared between the test and the App.
#[derive(Clone, Default)]
struct TestEnv {
    millis: Arc<AtomicU64>,
}

impl TestEnv {
    fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Environment for TestEnv {
    type Instant = Duration;

    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        base + chrono::Duration::milliseconds(self.millis.load(Ordering::SeqCst) as i64)
    }
}

/// Key-value store the test can inspect while the App owns a handle to it.
#[derive(Clone, Default)]
struct SharedStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

/// App plus a record of what it asked the transport to do.
struct Harness {
    app: App<TestEnv>,
    env: TestEnv,
    store: SharedStore,
    sent: Vec<Request>,
    opens: usize,
    closes: usize,
}

impl Harness {
    fn new() -> Self {
        Self::with_store(SharedStore::default())
    }

    fn with_store(store: SharedStore) -> Self {
        let env = TestEnv::default();
        let app = App::new(env.clone(), Box::new(store.clone()), AppConfig::default());
        Self { app, env, store, sent: Vec::new(), opens: 0, closes: 0 }
    }

    /// Started, opened, and bootstrap room list answered.
    fn online() -> Self {
        let mut h = Self::new();
        h.start();
        h.event(AppEvent::TransportOpened);
        h.reply("get_rooms", json!([
            { "id": 1, "name": "lobby", "member_count": 3 },
            { "id": 2, "name": "dev", "member_count": 1 },
            { "id": 3, "name": "dev", "member_count": 0 },
        ]));
        h.sent.clear();
        h
    }

    /// Online and inside room 1 as `ann`.
    fn in_lobby() -> Self {
        let mut h = Self::online();
        h.reply("login_as", json!({ "username": "ann" }));
        h.reply("join_room", json!({ "id": 1, "name": "lobby" }));
        h.reply("get_messages", json!([]));
        h.sent.clear();
        h
    }

    fn start(&mut self) {
        let actions = self.app.start();
        self.apply(actions);
    }

    fn apply(&mut self, actions: Vec<AppAction>) {
        for action in actions {
            match action {
                AppAction::Send(request) => self.sent.push(request),
                AppAction::Open => self.opens += 1,
                AppAction::Close => self.closes += 1,
                AppAction::Render | AppAction::Quit => {},
            }
        }
    }

    fn event(&mut self, event: AppEvent) -> Vec<AppAction> {
        let actions = self.app.handle(event);
        self.apply(actions.clone());
        actions
    }

    fn submit(&mut self, line: &str) -> Vec<AppAction> {
        self.event(AppEvent::Submit(line.to_string()))
    }

    fn receive(&mut self, value: Value) {
        self.event(AppEvent::Received(value.to_string()));
    }

    fn reply(&mut self, func: &str, result: Value) {
        self.receive(json!({ "response": func, "result": result, "error": null }));
    }

    fn fail(&mut self, func: &str, error: &str) {
        self.receive(json!({ "response": func, "result": null, "error": error }));
    }

    fn texts(&self, kind: Kind) -> Vec<String> {
        self.app
            .log()
            .entries()
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.text.clone())
            .collect()
    }

    fn last_text(&self) -> String {
        self.app.log().entries().last().map(|entry| entry.text.clone()).unwrap_or_default()
    }
}

fn message(id: u64, room_id: u64, username: &str, text: &str) -> Value {
    json!({
        "id": id, "room_id": room_id, "username": username, "text": text,
        "timestamp": "2024-05-01T08:00:00Z"
    })
}

#[test]
fn startup_shows_connecting_then_connected() {
    let mut h = Harness::new();
    h.start();

    assert_eq!(h.app.connection_state(), ConnectionState::Connecting);
    assert_eq!(h.texts(Kind::TempInfo), vec!["Connecting to server..."]);

    h.event(AppEvent::TransportOpened);
    assert_eq!(h.sent, vec![Request::GetRooms]);
    assert_eq!(h.texts(Kind::Info), vec!["Connected."]);
    assert!(h.texts(Kind::TempInfo).is_empty());
}

#[test]
fn bootstrap_room_list_is_silent_but_cached() {
    let h = Harness::online();

    assert_eq!(h.app.session().rooms().len(), 3);
    assert_eq!(h.texts(Kind::Info), vec!["Connected."]);
}

#[test]
fn roomtour_after_bootstrap_is_visible() {
    let mut h = Harness::online();
    h.submit("roomtour");
    assert_eq!(h.sent, vec![Request::GetRooms]);

    h.reply("get_rooms", json!([{ "id": 1, "name": "lobby", "member_count": 3 }]));
    assert!(h.last_text().starts_with("Rooms: #1 lobby"));
}

#[test]
fn restored_session_chains_login_join_history() {
    let mut store = SharedStore::default();
    let snapshot =
        SessionSnapshot { user: "ann".into(), room_id: Some(2), room_name: Some("dev".into()) };
    store::save_json(&mut store, SESSION_KEY, &snapshot).unwrap();

    let mut h = Harness::with_store(store);
    h.start();
    h.event(AppEvent::TransportOpened);
    assert_eq!(h.sent, vec![Request::GetRooms, Request::LoginAs { username: "ann".into() }]);

    h.reply("get_rooms", json!([]));
    h.reply("login_as", json!({ "username": "ann" }));
    assert_eq!(h.sent.last(), Some(&Request::JoinRoom { room_id: 2 }));

    h.reply("join_room", json!({ "id": 2, "name": "dev" }));
    assert_eq!(h.sent.last(), Some(&Request::GetMessages { room_id: 2 }));

    h.reply("get_messages", json!([message(10, 2, "ann", "mine"), message(11, 2, "bob", "theirs")]));
    let kinds: Vec<Kind> = h.app.log().entries().iter().map(|entry| entry.kind).collect();
    assert_eq!(kinds, vec![Kind::Info, Kind::Out, Kind::In, Kind::Info]);
    assert_eq!(h.last_text(), "Loaded 2 messages from #dev.");
}

#[test]
fn join_persists_snapshot() {
    let mut h = Harness::in_lobby();
    h.submit("accede dev");

    // "dev" names rooms 2 and 3.
    assert!(h.sent.is_empty());
    assert_eq!(h.last_text(), "room name dev is ambiguous; use one of ids 2, 3");

    h.submit("accede 2");
    assert_eq!(h.sent, vec![Request::JoinRoom { room_id: 2 }]);
    h.reply("join_room", json!({ "id": 2, "name": "dev" }));

    let saved: Option<SessionSnapshot> = store::load_json(&h.store, SESSION_KEY).unwrap();
    assert_eq!(
        saved,
        Some(SessionSnapshot { user: "ann".into(), room_id: Some(2), room_name: Some("dev".into()) })
    );
    assert_eq!(h.app.session().current_room().map(|room| room.id), Some(2));
}

#[test]
fn joining_another_room_clears_the_log() {
    let mut h = Harness::in_lobby();
    h.receive(json!({ "event": "new_message", "payload": message(20, 1, "bob", "hi") }));
    assert_eq!(h.texts(Kind::In), vec!["hi"]);

    h.reply("join_room", json!({ "id": 2, "name": "dev" }));
    assert!(h.texts(Kind::In).is_empty());
    assert_eq!(h.texts(Kind::Info), vec!["Joined #dev."]);
}

#[test]
fn send_requires_room_and_connection() {
    let mut h = Harness::online();
    h.submit("send hello there");
    assert!(h.sent.is_empty());
    assert_eq!(h.texts(Kind::Error), vec!["not in a room; use `accede <room>` first"]);

    let mut h = Harness::in_lobby();
    h.submit(r#"send "hello  there" friend"#);
    assert_eq!(h.sent, vec![Request::Msg { text: "hello  there friend".into(), room_id: 1 }]);
}

#[test]
fn own_broadcast_is_out_and_not_confirmed() {
    let mut h = Harness::in_lobby();
    h.receive(json!({ "event": "new_message", "payload": message(30, 1, "ann", "mine") }));
    h.receive(json!({ "event": "new_message", "payload": message(31, 1, "bob", "yours") }));

    assert_eq!(h.texts(Kind::Out), vec!["mine"]);
    assert_eq!(h.sent, vec![Request::MarkRead { message_id: 31 }]);

    h.receive(json!({ "event": "message_read", "payload": { "message_id": 30, "read_by": 2 } }));
    assert_eq!(h.app.log().by_server_id(30).and_then(|entry| entry.read_by), Some(2));
}

#[test]
fn annihilate_checks_offset_before_room() {
    let mut h = Harness::online();
    h.submit("annihilate 0");
    assert_eq!(h.texts(Kind::Error), vec!["message offset must be a positive integer"]);

    h.submit("annihilate 1");
    assert_eq!(h.last_text(), "not in a room; use `accede <room>` first");
    assert!(h.sent.is_empty());
}

#[test]
fn annihilate_targets_own_messages_from_newest() {
    let mut h = Harness::in_lobby();
    h.receive(json!({ "event": "new_message", "payload": message(41, 1, "ann", "one") }));
    h.receive(json!({ "event": "new_message", "payload": message(42, 1, "bob", "two") }));
    h.receive(json!({ "event": "new_message", "payload": message(43, 1, "ann", "three") }));
    h.sent.clear();

    h.submit("annihilate 2");
    assert_eq!(h.sent, vec![Request::DeleteMsg { message_id: 41, room_id: 1 }]);

    h.submit("annihilate 3");
    assert_eq!(h.last_text(), "cannot reach message #3: only 2 of your messages are shown");

    h.submit("annihilate zero");
    assert_eq!(h.last_text(), "message offset must be a positive integer");

    let position = |h: &Harness| h.app.log().entries().iter().position(|entry| entry.server_id == Some(41));
    let before = position(&h);
    h.receive(json!({ "event": "message_deleted", "payload": { "message_id": 41, "room_id": 1 } }));
    assert!(before.is_some());
    assert_eq!(position(&h), before);
    assert_eq!(h.app.log().by_server_id(41).map(|entry| entry.text.as_str()), Some("[message deleted]"));
}

#[test]
fn protocol_error_names_the_operation() {
    let mut h = Harness::in_lobby();
    h.submit("create room   ");
    assert_eq!(h.last_text(), "usage: create room <name>...");

    h.submit("create room Book Club");
    assert_eq!(h.sent, vec![Request::CreateRoom { room_name: "Book Club".into() }]);

    h.fail("create_room", "name taken");
    assert_eq!(h.last_text(), "creating room failed: name taken");
}

#[test]
fn close_after_open_notifies_once_and_reconnects_after_delay() {
    let mut h = Harness::in_lobby();

    h.event(AppEvent::TransportClosed);
    h.event(AppEvent::TransportClosed);
    assert_eq!(h.closes, 1);
    assert_eq!(h.texts(Kind::Info).iter().filter(|t| t.starts_with("Disconnected")).count(), 1);
    assert_eq!(h.app.connection_state(), ConnectionState::Disconnected);

    h.env.advance(Duration::from_secs(2));
    h.event(AppEvent::Tick);
    assert_eq!(h.opens, 1);

    h.env.advance(Duration::from_secs(1));
    h.event(AppEvent::Tick);
    assert_eq!(h.opens, 2);
    assert_eq!(h.app.connection_state(), ConnectionState::Connecting);
}

#[test]
fn failed_initial_connect_is_silent_and_retries() {
    let mut h = Harness::new();
    h.start();
    h.event(AppEvent::TransportClosed);

    assert!(h.texts(Kind::Info).is_empty());
    h.env.advance(Duration::from_secs(3));
    h.event(AppEvent::Tick);
    assert_eq!(h.opens, 2);
}

#[test]
fn reply_after_reconnect_still_hides_bootstrap_list() {
    let mut h = Harness::in_lobby();
    h.event(AppEvent::TransportClosed);
    h.env.advance(Duration::from_secs(3));
    h.event(AppEvent::Tick);
    h.event(AppEvent::TransportOpened);

    let infos_before = h.texts(Kind::Info).len();
    h.reply("get_rooms", json!([]));
    assert_eq!(h.texts(Kind::Info).len(), infos_before);
}

#[test]
fn frames_from_a_dead_transport_are_ignored() {
    let mut h = Harness::in_lobby();
    h.event(AppEvent::TransportClosed);

    h.receive(json!({ "event": "new_message", "payload": message(50, 1, "bob", "late") }));
    assert!(h.app.log().by_server_id(50).is_none());
}

#[test]
fn exit_cancels_reconnect() {
    let mut h = Harness::in_lobby();
    h.event(AppEvent::TransportClosed);

    let actions = h.submit("exit");
    assert_eq!(actions.last(), Some(&AppAction::Quit));
    assert!(h.app.should_quit());

    let actions = h.app.shutdown();
    assert!(actions.is_empty());
    h.env.advance(Duration::from_secs(30));
    h.event(AppEvent::Tick);
    assert_eq!(h.opens, 1);
}

#[test]
fn theme_round_trips_through_store() {
    let mut h = Harness::new();
    h.submit("theme -tc green -sc '#777777'");
    assert_eq!(h.app.theme().text, "green");
    assert_eq!(h.app.theme().system, "#777777");

    h.submit("theme save calm");
    h.submit("theme -tc red");
    h.submit("theme load calm");
    assert_eq!(h.app.theme().text, "green");

    h.submit("theme load");
    assert_eq!(h.last_text(), "Saved themes: calm");

    h.submit("theme load loud");
    assert_eq!(h.last_text(), "no saved theme named loud");
}

#[test]
fn saved_themes_use_one_map() {
    let mut h = Harness::new();
    h.submit("theme save a");
    h.submit("theme -bg navy");
    h.submit("theme save b");

    let saved: SavedThemes = store::load_json(&h.store, THEMES_KEY).unwrap().unwrap();
    assert_eq!(saved.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(saved["a"].background, "black");
    assert_eq!(saved["b"].background, "navy");
}

#[test]
fn whoami_reports_local_state_offline() {
    let mut h = Harness::new();
    h.submit("whoami");

    assert_eq!(h.last_text(), "You are guest, not in any room.");
    assert!(h.sent.is_empty());
}

#[test]
fn whoami_confirms_with_server_when_online() {
    let mut h = Harness::in_lobby();
    h.submit("whoami");

    assert_eq!(h.sent, vec![Request::GetUsername]);
    h.reply("get_username", json!({ "username": "ann" }));
    assert_eq!(h.last_text(), "Server knows you as ann.");
}

#[test]
fn clear_keeps_incoming_only() {
    let mut h = Harness::in_lobby();
    h.receive(json!({ "event": "new_message", "payload": message(60, 1, "bob", "keep") }));
    h.receive(json!({ "event": "new_message", "payload": message(61, 1, "ann", "drop") }));

    h.submit("clear");
    let texts: Vec<String> = h.app.log().entries().iter().map(|entry| entry.text.clone()).collect();
    assert_eq!(texts, vec!["keep"]);

    h.submit("clearall");
    assert!(h.app.log().is_empty());
}

#[test]
fn presence_updates_member_counts() {
    let mut h = Harness::in_lobby();
    h.receive(json!({ "event": "user_joined", "payload": { "room_id": 1, "username": "cy" } }));
    h.receive(json!({ "event": "user_left", "payload": { "room_id": 2, "username": "di" } }));

    let rooms = h.app.session().rooms();
    assert_eq!(rooms.get(1).map(|room| room.member_count), Some(4));
    assert_eq!(rooms.get(2).map(|room| room.member_count), Some(0));
    assert_eq!(h.last_text(), "cy entered the room.");
}

#[test]
fn help_lists_every_command() {
    let mut h = Harness::new();
    h.submit("h");

    let listing = h.texts(Kind::Info).join("\n");
    insta::assert_snapshot!(listing, @r"
Commands:
accede <id|name>                                 enter a room
annihilate <n>                                   delete your n-th most recent message
clear                                            clear everything but incoming messages
clearall                                         clear the whole screen
create room <name>...                            create a room
exit                                             quit
forge <name>                                     create a user and become it
h                                                list commands
help                                             list commands
history                                          reload the current room's messages
impersonate <name>                               switch to an existing user
roomtour                                         list rooms
send <text>...                                   send a message to the current room
theme [-tc|-bg|-bc|-ob|-hv|-sc <color>]...       show or set colors
theme load [name]                                load saved colors, or list them
theme save <name>                                save the current colors
whoami                                           show who and where you are
");
}
