//! Terminal UI for shello
//!
//! A thin shell over [`shello_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`shello_app::Runtime`].
//!
//! This crate handles terminal rendering, the WebSocket transport and the
//! on-disk key-value file.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod store;
pub mod terminal;
pub mod transport;
pub mod ui;

pub use env::SystemEnv;
pub use shello_app::{App, AppAction, AppConfig, AppEvent, Driver, KeyInput, Runtime};
pub use store::FileStore;
pub use terminal::{TerminalDriver, TerminalError};
