//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use shello_core::Environment;

use crate::{App, AppEvent};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures the
/// same orchestration code runs in the terminal client and in tests.
///
/// Transport failures never surface as errors: a connection that cannot be
/// opened, or that drops, is reported as [`AppEvent::TransportClosed`] from
/// [`poll_event`](Driver::poll_event). Errors are reserved for the driver's
/// own I/O (terminal, rendering).
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Clock and time source shared with the [`App`].
    type Env: Environment;

    /// Wait for the next input, transport or tick event.
    ///
    /// Yields [`AppEvent::Tick`] when nothing else arrives within the
    /// driver's tick interval. Returns `None` for input the app ignores.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Start opening a transport. Completion is reported as
    /// [`AppEvent::TransportOpened`] or [`AppEvent::TransportClosed`].
    fn open(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send a text frame on the open transport.
    fn send(&mut self, text: String) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Tear down the transport and drop its callbacks.
    fn close(&mut self);

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App<Self::Env>) -> Result<(), Self::Error>;

    /// Release platform resources before exit.
    fn stop(&mut self);
}
