//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns every piece of
//! client state: the command registry, the session, the message log, the
//! key-value store, the theme and the input line.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//! Events are handled one at a time through `&mut self`, so a command handler
//! always runs to completion before the next line or frame is looked at.

use shello_core::{
    ConnectionState, Draft, Environment, KeyValueStore, Kind, LogConfig, MessageLog, Session,
    SessionAction, SessionConfig, SessionContext, SessionView, tokenizer,
};
use shello_proto::Request;

use crate::{
    AppAction, AppEvent, InputState, KeyInput, Theme,
    commands::{self, CommandContext, Registry},
};

/// Application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Session lifecycle settings.
    pub session: SessionConfig,
    /// Message log retention.
    pub log: LogConfig,
}

/// Application state machine.
///
/// Generic over `E` so tests run on virtual time.
pub struct App<E: Environment> {
    env: E,
    registry: Registry,
    session: Session<E::Instant>,
    log: MessageLog,
    store: Box<dyn KeyValueStore + Send>,
    theme: Theme,
    input: InputState,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    quit: bool,
}

impl<E: Environment> App<E> {
    /// Create an app with the built-in command set. Nothing is connected
    /// until [`App::start`].
    pub fn new(env: E, store: Box<dyn KeyValueStore + Send>, config: AppConfig) -> Self {
        Self {
            env,
            registry: commands::builtin(),
            session: Session::new(config.session),
            log: MessageLog::new(config.log),
            store,
            theme: Theme::default(),
            input: InputState::new(),
            terminal_size: (80, 24),
            quit: false,
        }
    }

    /// Begin the first connection attempt.
    pub fn start(&mut self) -> Vec<AppAction> {
        let (session, mut ctx) = self.session_context();
        let actions = match session.connect(&mut ctx) {
            Ok(actions) => actions,
            Err(e) => {
                tracing::warn!(error = %e, "start ignored");
                vec![]
            },
        };
        self.with_render(actions)
    }

    /// Stop for good: cancel the reconnect timer and close the transport.
    pub fn shutdown(&mut self) -> Vec<AppAction> {
        self.session.shutdown().into_iter().map(AppAction::from).collect()
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(KeyInput::Enter) => {
                let line = self.input.take_line();
                self.submit(&line)
            },
            AppEvent::Key(KeyInput::Esc) => {
                self.quit = true;
                vec![AppAction::Quit]
            },
            AppEvent::Key(key) => {
                self.input.edit(key);
                vec![AppAction::Render]
            },
            AppEvent::Submit(line) => self.submit(&line),
            AppEvent::Tick => {
                let now = self.env.now();
                let (session, mut ctx) = self.session_context();
                let actions = session.tick(now, &mut ctx);
                if actions.is_empty() { vec![] } else { self.with_render(actions) }
            },
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::TransportOpened => {
                let (session, mut ctx) = self.session_context();
                match session.handle_opened(&mut ctx) {
                    Ok(actions) => self.with_render(actions),
                    Err(e) => {
                        tracing::warn!(error = %e, "stale transport open");
                        vec![]
                    },
                }
            },
            AppEvent::TransportClosed => {
                let now = self.env.now();
                let (session, mut ctx) = self.session_context();
                let actions = session.handle_closed(now, &mut ctx);
                self.with_render(actions)
            },
            AppEvent::Received(text) => {
                let (session, mut ctx) = self.session_context();
                let actions = session.handle_text(&text, &mut ctx);
                self.with_render(actions)
            },
        }
    }

    /// Run one input line: echo it, tokenize, dispatch.
    ///
    /// This is the single place command failures surface: any error becomes
    /// one `Error` entry and the app carries on.
    pub fn submit(&mut self, line: &str) -> Vec<AppAction> {
        let wall_clock = self.env.wall_clock();
        let parsed = match tokenizer::parse(line) {
            Ok(parsed) if parsed.is_empty() => return vec![],
            Ok(parsed) => parsed,
            Err(e) => {
                self.log.append(Draft::new(Kind::Command, line), wall_clock);
                self.log.append(Draft::error(e.to_string()), wall_clock);
                return vec![AppAction::Render];
            },
        };

        self.log.append(Draft::new(Kind::Command, line), wall_clock);

        let mut ctx = CommandContext::new(
            &self.session,
            &self.registry,
            &mut self.log,
            self.store.as_mut(),
            &mut self.theme,
            wall_clock,
        );
        let outcome = self.registry.dispatch(&parsed.command, &parsed.args, &mut ctx);
        let (requests, quit) = ctx.finish();

        if let Err(e) = outcome {
            tracing::debug!(command = %parsed.command, error = %e, "command failed");
            self.log.append(Draft::error(e.to_string()), wall_clock);
            return vec![AppAction::Render];
        }

        let mut actions: Vec<AppAction> = requests.into_iter().filter_map(|r| self.send(r)).collect();
        actions.push(AppAction::Render);
        if quit {
            self.quit = true;
            actions.push(AppAction::Quit);
        }
        actions
    }

    fn send(&self, request: Request) -> Option<AppAction> {
        match self.session.request(request) {
            Ok(action) => Some(action.into()),
            Err(e) => {
                tracing::warn!(error = %e, "request dropped");
                None
            },
        }
    }

    fn session_context(&mut self) -> (&mut Session<E::Instant>, SessionContext<'_>) {
        let wall_clock = self.env.wall_clock();
        (&mut self.session, SessionContext {
            log: &mut self.log,
            store: self.store.as_mut(),
            wall_clock,
        })
    }

    fn with_render(&self, actions: Vec<SessionAction>) -> Vec<AppAction> {
        let mut actions: Vec<AppAction> = actions.into_iter().map(AppAction::from).collect();
        actions.push(AppAction::Render);
        actions
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.session.connection_state()
    }

    /// Session state, read-only.
    pub fn session(&self) -> &Session<E::Instant> {
        &self.session
    }

    /// Display log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Command registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Line editor.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Quit was requested.
    pub fn should_quit(&self) -> bool {
        self.quit
    }
}
