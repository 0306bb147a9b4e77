//! Commands
//!
//! The [`Registry`] dispatch table, the [`CommandContext`] handlers run
//! against, and the built-in command set.

mod handlers;
mod registry;

use chrono::{DateTime, Utc};
pub use handlers::builtin;
pub use registry::{CommandSpec, Handler, Registry, Resolved};
use shello_core::{
    CommandError, ConnectionState, Draft, KeyValueStore, MessageLog, RoomRef, SessionError,
    SessionView,
};
use shello_proto::Request;

use crate::Theme;

/// Everything a handler may touch.
///
/// Session state is read-only. Requests are queued here and sent by the app
/// once the handler returns successfully.
pub struct CommandContext<'a> {
    /// Read access to identity, room and connection state.
    pub session: &'a dyn SessionView,
    /// The registry being dispatched from, for `help`.
    pub registry: &'a Registry,
    /// Display log.
    pub log: &'a mut MessageLog,
    /// Persistence for saved themes.
    pub store: &'a mut dyn KeyValueStore,
    /// Current theme.
    pub theme: &'a mut Theme,
    /// Wall-clock time of the submission.
    pub wall_clock: DateTime<Utc>,
    outbox: Vec<Request>,
    quit: bool,
}

impl<'a> CommandContext<'a> {
    /// Build a context with an empty outbox.
    pub fn new(
        session: &'a dyn SessionView,
        registry: &'a Registry,
        log: &'a mut MessageLog,
        store: &'a mut dyn KeyValueStore,
        theme: &'a mut Theme,
        wall_clock: DateTime<Utc>,
    ) -> Self {
        Self { session, registry, log, store, theme, wall_clock, outbox: Vec::new(), quit: false }
    }

    /// Append an entry to the log.
    pub fn note(&mut self, draft: Draft) {
        self.log.append(draft, self.wall_clock);
    }

    /// Queue a request.
    ///
    /// # Errors
    ///
    /// - `CommandError::Session(NotConnected)` unless connected
    pub fn request(&mut self, request: Request) -> Result<(), CommandError> {
        if self.session.connection_state() != ConnectionState::Connected {
            return Err(SessionError::NotConnected.into());
        }
        self.outbox.push(request);
        Ok(())
    }

    /// The current room.
    ///
    /// # Errors
    ///
    /// - `CommandError::BadArguments` before any room was entered
    pub fn require_room(&self) -> Result<RoomRef, CommandError> {
        self.session
            .current_room()
            .cloned()
            .ok_or_else(|| CommandError::bad_args("not in a room; use `accede <room>` first"))
    }

    /// Ask the app to quit once this command returns.
    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Consume the context, yielding queued requests and the quit flag.
    pub fn finish(self) -> (Vec<Request>, bool) {
        (self.outbox, self.quit)
    }
}
