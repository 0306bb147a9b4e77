//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use shello_core::SessionAction;
use shello_proto::Request;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Open a new transport connection.
    Open,

    /// Send a request over the open transport.
    Send(Request),

    /// Close the transport and drop its callbacks.
    Close,
}

impl From<SessionAction> for AppAction {
    fn from(action: SessionAction) -> Self {
        match action {
            SessionAction::Open => Self::Open,
            SessionAction::Send(request) => Self::Send(request),
            SessionAction::Close => Self::Close,
        }
    }
}
