//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Network uses a WebSocket per
//! connection attempt.

use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use shello_app::{App, AppEvent, Driver, KeyInput};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    SystemEnv,
    transport::{self, Connection, TransportEvent, TransportKind},
    ui,
};

/// Interval between ticks when no other event arrives.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), and the WebSocket
/// connection. Transport events from connections other than the live one are
/// dropped.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    server_url: String,
    connection: Option<Connection>,
    generation: u64,
    transport_tx: mpsc::UnboundedSender<TransportEvent>,
    transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
}

impl TerminalDriver {
    /// Create a new terminal driver and enter the alternate screen.
    pub fn new(server_url: String) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let (transport_tx, transport_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            server_url,
            connection: None,
            generation: 0,
            transport_tx,
            transport_rx,
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Env = SystemEnv;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        Ok(Self::convert_key(key_event.code).map(AppEvent::Key))
                    },
                    Some(Ok(Event::Resize(cols, rows))) => Ok(Some(AppEvent::Resize(cols, rows))),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(None),
                }
            }

            // Transport events
            Some(event) = self.transport_rx.recv() => {
                let live = self.connection.as_ref().is_some_and(|conn| conn.generation() == event.generation);
                if !live {
                    tracing::debug!(generation = event.generation, "dropping stale transport event");
                    return Ok(None);
                }
                Ok(Some(match event.kind {
                    TransportKind::Opened => AppEvent::TransportOpened,
                    TransportKind::Closed => AppEvent::TransportClosed,
                    TransportKind::Text(text) => AppEvent::Received(text),
                }))
            }

            // Tick timeout
            () = tokio::time::sleep(TICK_INTERVAL) => Ok(Some(AppEvent::Tick)),
        }
    }

    async fn open(&mut self) -> Result<(), Self::Error> {
        self.close();
        self.generation += 1;
        tracing::debug!(url = %self.server_url, generation = self.generation, "opening transport");
        self.connection =
            Some(transport::spawn(self.server_url.clone(), self.generation, self.transport_tx.clone()));
        Ok(())
    }

    async fn send(&mut self, text: String) -> Result<(), Self::Error> {
        match &self.connection {
            Some(conn) => {
                if let Err(e) = conn.send(text).await {
                    tracing::warn!(error = %e, "frame dropped");
                }
            },
            None => tracing::warn!("send without transport"),
        }
        Ok(())
    }

    fn close(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.stop();
        }
    }

    fn render(&mut self, app: &App<SystemEnv>) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        self.close();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
