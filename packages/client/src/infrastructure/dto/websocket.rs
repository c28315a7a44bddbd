//! WebSocket message DTOs for the chat protocol.
//!
//! Every frame is a JSON envelope `{"type": <tag>, "data": <object|null>}`.

use serde::{Deserialize, Serialize};

/// Envelope tags sent by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundType {
    Join,
    SendMessage,
    Ping,
}

/// Envelope tags understood when received from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundType {
    Joined,
    UserJoined,
    UserLeft,
    NewMessage,
    UserList,
    Error,
    Pong,
}

impl InboundType {
    /// Look up a tag received on the wire. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "joined" => Some(Self::Joined),
            "user_joined" => Some(Self::UserJoined),
            "user_left" => Some(Self::UserLeft),
            "new_message" => Some(Self::NewMessage),
            "user_list" => Some(Self::UserList),
            "error" => Some(Self::Error),
            "pong" => Some(Self::Pong),
            _ => None,
        }
    }
}

/// Outbound envelope
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEnvelope<T: Serialize> {
    pub r#type: OutboundType,
    pub data: Option<T>,
}

/// Inbound envelope; the tag stays a string so unknown tags can be reported
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEnvelope {
    pub r#type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// `join` request payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// `send_message` request payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}
