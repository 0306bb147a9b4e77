//! Application input events.
//!
//! This module defines [`AppEvent`], the complete set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (keyboard, resize) and system ticks.
//! - Transport lifecycle callbacks and inbound text frames.

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// A complete input line, bypassing the line editor.
    Submit(String),

    /// Periodic tick. Drives the reconnect timer.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Transport finished opening.
    TransportOpened,

    /// Transport closed or failed to open.
    TransportClosed,

    /// Text frame received from the server.
    Received(String),
}
