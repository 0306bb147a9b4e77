//! Fuzz target for the App state machine
//!
//! Drives arbitrary key presses, submitted lines, transport lifecycle events
//! and server frames through one App.
//!
//! # Invariants
//!
//! - No request is sent unless the session is connected
//! - Log entry ids stay unique
//! - The input cursor stays inside the buffer

#![no_main]

use std::{collections::HashSet, time::Duration};

use arbitrary::Arbitrary;
use chrono::{DateTime, TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use shello_app::{App, AppAction, AppConfig, AppEvent, KeyInput};
use shello_core::{ConnectionState, Environment, MemoryStore};

#[derive(Clone)]
struct StepEnv(Duration);

impl Environment for StepEnv {
    type Instant = Duration;

    fn now(&self) -> Duration {
        self.0
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Char(char),
    Backspace,
    Left,
    Right,
    Up,
    Enter,
    Submit(String),
    Tick,
    Opened,
    Closed,
    Frame(FrameChoice),
}

#[derive(Debug, Clone, Arbitrary)]
enum FrameChoice {
    Rooms,
    Joined(u8),
    LoggedIn,
    NewMessage { id: u8, room: u8 },
    Deleted(u8),
    Read { id: u8, count: u8 },
    Raw(String),
}

fn frame(choice: FrameChoice) -> String {
    match choice {
        FrameChoice::Rooms => {
            r#"{"response":"get_rooms","result":[{"id":1,"name":"lobby"},{"id":2,"name":"dev"}],"error":null}"#.to_string()
        }
        FrameChoice::Joined(id) => format!(
            r#"{{"response":"join_room","result":{{"id":{id},"name":"room{id}"}},"error":null}}"#
        ),
        FrameChoice::LoggedIn => r#"{"response":"login_as","result":{"username":"ann"},"error":null}"#.to_string(),
        FrameChoice::NewMessage { id, room } => format!(
            r#"{{"event":"new_message","payload":{{"id":{id},"room_id":{room},"username":"bob","text":"x","timestamp":"2024-01-01T00:00:00Z"}}}}"#
        ),
        FrameChoice::Deleted(id) => format!(
            r#"{{"event":"message_deleted","payload":{{"message_id":{id},"room_id":1}}}}"#
        ),
        FrameChoice::Read { id, count } => format!(
            r#"{{"event":"message_read","payload":{{"message_id":{id},"room_id":1,"read_by":{count}}}}}"#
        ),
        FrameChoice::Raw(text) => text,
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let mut app = App::new(StepEnv(Duration::ZERO), Box::new(MemoryStore::new()), AppConfig::default());
    let _ = app.start();

    for op in ops {
        let event = match op {
            Op::Char(c) => AppEvent::Key(KeyInput::Char(c)),
            Op::Backspace => AppEvent::Key(KeyInput::Backspace),
            Op::Left => AppEvent::Key(KeyInput::Left),
            Op::Right => AppEvent::Key(KeyInput::Right),
            Op::Up => AppEvent::Key(KeyInput::Up),
            Op::Enter => AppEvent::Key(KeyInput::Enter),
            Op::Submit(line) => AppEvent::Submit(line),
            Op::Tick => AppEvent::Tick,
            Op::Opened => AppEvent::TransportOpened,
            Op::Closed => AppEvent::TransportClosed,
            Op::Frame(choice) => AppEvent::Received(frame(choice)),
        };

        let actions = app.handle(event);

        if app.connection_state() != ConnectionState::Connected {
            assert!(
                !actions.iter().any(|a| matches!(a, AppAction::Send(_))),
                "request sent while offline"
            );
        }

        let ids: HashSet<u64> = app.log().entries().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), app.log().len(), "duplicate log ids");

        assert!(app.input().cursor() <= app.input().buffer().chars().count());
    }
});
