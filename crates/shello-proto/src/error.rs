//! Wire-level error types.

use thiserror::Error;

/// Errors raised while encoding or decoding wire messages.
#[derive(Debug, Error)]
pub enum WireError {
    /// Text was not valid JSON or did not match the expected shape.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON object carried neither an `event` nor a `response` field.
    #[error("message has neither `event` nor `response` discriminator")]
    Unclassified,

    /// Reply discriminator does not name any known request.
    #[error("unknown response `{0}`")]
    UnknownResponse(String),
}

/// Failed reply: the server filled the `error` field, or sent a `result`
/// that does not match the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description} failed: {message}")]
pub struct RemoteError {
    /// Human-readable description of the request that failed.
    pub description: &'static str,
    /// Error text as sent by the server, or the decode failure.
    pub message: String,
}
