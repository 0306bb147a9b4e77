//! Error types for the shello engine.
//!
//! One type per layer: the tokenizer raises [`ParseError`], the session
//! raises [`SessionError`], persistence raises [`StoreError`], and command
//! handlers raise [`CommandError`], which absorbs the others so the input
//! boundary can turn any failure into a single visible log entry.

use thiserror::Error;

use crate::state::ConnectionState;

/// Command-line tokenization failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Line ended while a quoted span was still open.
    #[error("unterminated {quote} quote opened at column {column}")]
    UnterminatedQuote {
        /// Quote character that opened the span.
        quote: char,
        /// Zero-based character column of the opening quote.
        column: usize,
    },
}

/// Session state machine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Lifecycle operation attempted from the wrong state.
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// State when the operation was attempted.
        state: ConnectionState,
        /// Operation that was attempted.
        operation: &'static str,
    },

    /// A request was issued while no connection is established.
    #[error("not connected to server")]
    NotConnected,
}

/// Key-value persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing storage could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be encoded or decoded.
    #[error("stored value is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while resolving or running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The input line could not be tokenized.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// No handler is registered under this name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Missing or malformed arguments.
    #[error("{0}")]
    BadArguments(String),

    /// Relative offset reaches past the available own messages.
    #[error("cannot reach message #{requested}: only {available} of your messages are shown")]
    OutOfRange {
        /// Requested offset (1 = most recent).
        requested: usize,
        /// Own chat messages currently in the log.
        available: usize,
    },

    /// The session rejected the request.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CommandError {
    /// Shorthand for [`CommandError::BadArguments`].
    pub fn bad_args(message: impl Into<String>) -> Self {
        Self::BadArguments(message.into())
    }
}
