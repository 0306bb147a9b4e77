//! Shello core
//!
//! Sans-IO building blocks of the chat client engine. Nothing in this crate
//! performs I/O: time is passed in, transport work is returned as
//! [`SessionAction`]s, and persistence goes through the [`KeyValueStore`]
//! trait.
//!
//! # Components
//!
//! - [`tokenizer`]: quoting-aware command-line splitting
//! - [`MessageLog`]: display entries with kind-based retention and tombstones
//! - [`Session`]: connection lifecycle, reply/broadcast routing, room and
//!   identity state
//! - [`KeyValueStore`]: opaque string persistence seam

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod error;
pub mod log;
pub mod session;
pub mod state;
pub mod store;
pub mod tokenizer;

pub use env::Environment;
pub use error::{CommandError, ParseError, SessionError, StoreError};
pub use log::{ClearScope, DateGroup, Draft, Kind, LogConfig, Message, MessageLog};
pub use session::{Session, SessionAction, SessionConfig, SessionContext};
pub use state::{
    ConnectionState, Identity, Room, RoomDirectory, RoomRef, SessionSnapshot, SessionView,
};
pub use store::{KeyValueStore, MemoryStore};
pub use tokenizer::CommandLine;
