//! Chat models as delivered by the server.

use serde::{Deserialize, Serialize};

/// Kind of a chat message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    System,
    Emoji,
}

/// Represents a user in the chat room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned user identifier
    pub id: String,
    /// Identifier of the server-side socket owning this user
    #[serde(default)]
    pub socket_id: String,
    /// Display name
    pub nickname: String,
    /// Avatar seed used by pixel-avatar renderers
    #[serde(default)]
    pub avatar: String,
    /// RFC 3339 timestamp when the user joined
    #[serde(default)]
    pub join_time: String,
    /// RFC 3339 timestamp of the user's last activity
    #[serde(default)]
    pub last_activity: String,
    #[serde(default)]
    pub is_online: bool,
}

/// Represents a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier
    pub id: String,
    /// Sender's user ID
    pub user_id: String,
    /// Sender's nickname at send time
    pub user_nickname: String,
    /// Sender's avatar seed at send time
    #[serde(default)]
    pub user_avatar: String,
    /// Message content
    pub content: String,
    /// RFC 3339 timestamp when the server accepted the message
    pub timestamp: String,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
}

impl Message {
    /// Whether this message was generated by the server (join/leave notices).
    pub fn is_system(&self) -> bool {
        self.kind == MessageKind::System
    }
}
