//! WebSocket transport.
//!
//! Provides [`Connection`], a handle to a background task that owns one
//! WebSocket. Outbound text goes in through a channel; lifecycle changes and
//! inbound text come back as [`TransportEvent`]s tagged with the connection's
//! generation, so events from a torn-down connection can be told apart from
//! the live one. Protocol logic stays in the Sans-IO session.

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Outbound queue depth per connection.
const OUTBOUND_CAPACITY: usize = 64;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection is gone; the frame was not queued.
    #[error("connection closed")]
    Closed,
}

/// What a connection task reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    /// Handshake completed.
    Opened,
    /// Connection failed or ended.
    Closed,
    /// Text frame from the server.
    Text(String),
}

/// Transport event from the connection with id `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    /// Connection that produced the event.
    pub generation: u64,
    /// What happened.
    pub kind: TransportKind,
}

/// Handle to a connection task.
///
/// Dropping the handle does not stop the task; call [`Connection::stop`].
pub struct Connection {
    generation: u64,
    to_server: mpsc::Sender<String>,
    abort_handle: tokio::task::AbortHandle,
}

impl Connection {
    /// Connection id.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Queue a text frame.
    ///
    /// # Errors
    ///
    /// - `TransportError::Closed` if the task has ended
    pub async fn send(&self, text: String) -> Result<(), TransportError> {
        self.to_server.send(text).await.map_err(|_| TransportError::Closed)
    }

    /// Stop the connection task.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Spawn a task that connects to `url` and bridges it to channels.
///
/// Every outcome, including a failed handshake, is reported on `events`.
pub fn spawn(
    url: String,
    generation: u64,
    events: mpsc::UnboundedSender<TransportEvent>,
) -> Connection {
    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(OUTBOUND_CAPACITY);
    let handle = tokio::spawn(run_connection(url, generation, to_server_rx, events));

    Connection { generation, to_server: to_server_tx, abort_handle: handle.abort_handle() }
}

/// Run one connection from handshake to close.
async fn run_connection(
    url: String,
    generation: u64,
    mut to_server: mpsc::Receiver<String>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    let report = |kind: TransportKind| {
        // Receiver gone means the driver is shutting down.
        let _ = events.send(TransportEvent { generation, kind });
    };

    let ws = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            tracing::debug!(%url, error = %e, "connect failed");
            report(TransportKind::Closed);
            return;
        },
    };

    tracing::info!(%url, generation, "websocket open");
    report(TransportKind::Opened);

    let (mut writer, mut reader) = ws.split();

    loop {
        tokio::select! {
            outbound = to_server.recv() => {
                let Some(text) = outbound else { break };
                if let Err(e) = writer.send(Message::Text(text.into())).await {
                    tracing::warn!(error = %e, "websocket write failed");
                    break;
                }
            }

            inbound = reader.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => report(TransportKind::Text(text.as_str().to_owned())),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {},
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "websocket read failed");
                        break;
                    },
                }
            }
        }
    }

    let _ = writer.close().await;
    tracing::info!(generation, "websocket closed");
    report(TransportKind::Closed);
}
