//! Domain layer for the chat client.
//!
//! This module contains the chat models, the typed event set and input
//! validation. It is independent of the wire format and of any transport.

pub mod entity;
pub mod error;
pub mod event;
pub mod value_object;

pub use entity::{Message, MessageKind, User};
pub use error::ValueObjectError;
pub use event::{
    ChatEvent, ErrorEvent, EventKind, JoinedEvent, NewMessageEvent, UserJoinedEvent,
    UserLeftEvent, UserListEvent,
};
pub use value_object::{MessageContent, Nickname};
