//! Typed events delivered to subscribers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::{Message, User};

/// Payload of a `joined` event: the caller's own profile and a history snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedEvent {
    pub user: User,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Payload of a `user_joined` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserJoinedEvent {
    pub user: User,
}

/// Payload of a `user_left` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLeftEvent {
    pub user: User,
}

/// Payload of a `new_message` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessageEvent {
    pub message: Message,
}

/// Payload of a `user_list` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListEvent {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Payload of an `error` event, whether sent by the server or raised locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
}

impl ErrorEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Every event a subscriber can observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The transport opened.
    Connected,
    /// The transport closed, deliberately or not.
    Disconnected,
    Joined(JoinedEvent),
    UserJoined(UserJoinedEvent),
    UserLeft(UserLeftEvent),
    NewMessage(NewMessageEvent),
    UserList(UserListEvent),
    /// A server-reported error, a transport failure, or budget exhaustion.
    Error(ErrorEvent),
    Pong,
}

impl ChatEvent {
    /// The subscription key this event is dispatched under.
    pub fn kind(&self) -> EventKind {
        match self {
            ChatEvent::Connected => EventKind::Connected,
            ChatEvent::Disconnected => EventKind::Disconnected,
            ChatEvent::Joined(_) => EventKind::Joined,
            ChatEvent::UserJoined(_) => EventKind::UserJoined,
            ChatEvent::UserLeft(_) => EventKind::UserLeft,
            ChatEvent::NewMessage(_) => EventKind::NewMessage,
            ChatEvent::UserList(_) => EventKind::UserList,
            ChatEvent::Error(_) => EventKind::Error,
            ChatEvent::Pong => EventKind::Pong,
        }
    }
}

/// Discriminant of [`ChatEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connected,
    Disconnected,
    Joined,
    UserJoined,
    UserLeft,
    NewMessage,
    UserList,
    Error,
    Pong,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::Connected,
        EventKind::Disconnected,
        EventKind::Joined,
        EventKind::UserJoined,
        EventKind::UserLeft,
        EventKind::NewMessage,
        EventKind::UserList,
        EventKind::Error,
        EventKind::Pong,
    ];

    /// Event name as used on the wire and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Connected => "connected",
            EventKind::Disconnected => "disconnected",
            EventKind::Joined => "joined",
            EventKind::UserJoined => "user_joined",
            EventKind::UserLeft => "user_left",
            EventKind::NewMessage => "new_message",
            EventKind::UserList => "user_list",
            EventKind::Error => "error",
            EventKind::Pong => "pong",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
