//! Application layer for shello
//!
//! Pure state machines and a generic runtime for the chat client, so the same
//! code that runs in the terminal runs under deterministic tests.
//!
//! # Components
//!
//! - [`App`]: client state machine (input line, command submission, session
//!   events)
//! - [`Registry`]: command dispatch table with subcommand resolution
//! - [`Theme`]: themeable colors and saved themes
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
pub mod commands;
mod driver;
mod event;
mod input;
mod runtime;
mod theme;

pub use action::AppAction;
pub use app::{App, AppConfig};
pub use commands::{CommandContext, Registry};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{InputState, KeyInput};
pub use runtime::Runtime;
pub use theme::{SavedThemes, Theme};
