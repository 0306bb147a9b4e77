//! Shello wire protocol
//!
//! JSON messages exchanged with the chat server over a single persistent
//! connection. Three shapes travel on the wire:
//!
//! - [`Request`]: outbound, discriminated by `func`.
//! - [`Reply`]: inbound answer to a request, discriminated by `response`
//!   (same name as the request's `func`).
//! - [`Broadcast`]: inbound server push, discriminated by `event`.
//!
//! Replies carry no request identifier. Two in-flight requests with the same
//! `func` cannot be told apart by their replies; callers correlate by
//! discriminator name only.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod inbound;
pub mod payloads;
mod request;

pub use error::{RemoteError, WireError};
pub use inbound::{Broadcast, Inbound, Reply, ReplyBody};
pub use request::{Func, Request};
