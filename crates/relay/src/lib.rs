//! # Mentorlink Relay Crate
//!
//! The real-time core of the backend: a presence registry mapping user
//! identifiers to live transport sessions, and a message relay that forwards
//! chat payloads to the receiver's session if one is currently connected.
//!
//! Delivery is at-most-once and best-effort. A message to an offline
//! receiver is dropped from the real-time path without an error; durability
//! is the store's concern, not the relay's.

mod events;
mod presence;
mod relay;

pub use events::{ClientEvent, MessagePayload, ServerEvent};
pub use presence::{PresenceRegistry, SessionId};
pub use relay::{MessageRelay, RouteOutcome};
