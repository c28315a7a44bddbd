//! Protocol codec: outbound intents to JSON text, inbound JSON text to events.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::domain::{ChatEvent, EventKind};

use super::dto::websocket::{
    InboundEnvelope, InboundType, JoinRequest, OutboundEnvelope, OutboundType, SendMessageRequest,
};

/// An outbound intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Join { nickname: Option<String> },
    SendMessage { content: String },
    Ping,
}

impl ClientMessage {
    pub fn message_type(&self) -> OutboundType {
        match self {
            ClientMessage::Join { .. } => OutboundType::Join,
            ClientMessage::SendMessage { .. } => OutboundType::SendMessage,
            ClientMessage::Ping => OutboundType::Ping,
        }
    }
}

/// Reasons an inbound frame is dropped
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not a JSON object carrying a string `type`
    #[error("malformed envelope: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// Known tag, but `data` does not match the payload shape
    #[error("invalid payload for '{kind}': {source}")]
    Payload {
        kind: EventKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Serialize an intent into envelope JSON text.
pub fn encode(message: &ClientMessage) -> Result<String, serde_json::Error> {
    let r#type = message.message_type();
    match message {
        ClientMessage::Join { nickname } => to_text(
            r#type,
            Some(JoinRequest {
                nickname: nickname.clone(),
            }),
        ),
        ClientMessage::SendMessage { content } => to_text(
            r#type,
            Some(SendMessageRequest {
                content: content.clone(),
            }),
        ),
        ClientMessage::Ping => to_text::<()>(r#type, None),
    }
}

fn to_text<T: Serialize>(
    r#type: OutboundType,
    data: Option<T>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&OutboundEnvelope { r#type, data })
}

/// Parse envelope JSON text into a typed event.
pub fn decode(text: &str) -> Result<ChatEvent, DecodeError> {
    let envelope: InboundEnvelope = serde_json::from_str(text).map_err(DecodeError::Malformed)?;

    let Some(inbound) = InboundType::from_tag(&envelope.r#type) else {
        return Err(DecodeError::UnknownType(envelope.r#type));
    };

    let data = envelope.data;
    let event = match inbound {
        InboundType::Joined => ChatEvent::Joined(payload(EventKind::Joined, data)?),
        InboundType::UserJoined => ChatEvent::UserJoined(payload(EventKind::UserJoined, data)?),
        InboundType::UserLeft => ChatEvent::UserLeft(payload(EventKind::UserLeft, data)?),
        InboundType::NewMessage => ChatEvent::NewMessage(payload(EventKind::NewMessage, data)?),
        InboundType::UserList => ChatEvent::UserList(payload(EventKind::UserList, data)?),
        InboundType::Error => ChatEvent::Error(payload(EventKind::Error, data)?),
        InboundType::Pong => ChatEvent::Pong,
    };
    Ok(event)
}

fn payload<T: DeserializeOwned>(kind: EventKind, data: serde_json::Value) -> Result<T, DecodeError> {
    serde_json::from_value(data).map_err(|source| DecodeError::Payload { kind, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorEvent;
    use serde_json::json;

    fn user_json(id: &str, nickname: &str) -> serde_json::Value {
        json!({
            "id": id,
            "socket_id": format!("sock-{id}"),
            "nickname": nickname,
            "avatar": "1234567890123456",
            "join_time": "2024-01-01T00:00:00Z",
            "last_activity": "2024-01-01T00:00:00Z",
            "is_online": true
        })
    }

    #[test]
    fn test_encode_join_with_nickname() {
        // テスト項目: ニックネーム付き join が {type, data:{nickname}} にエンコードされる
        // when (操作):
        let text = encode(&ClientMessage::Join {
            nickname: Some("alice".to_string()),
        })
        .unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({"type": "join", "data": {"nickname": "alice"}}));
    }

    #[test]
    fn test_encode_join_without_nickname_omits_key() {
        // テスト項目: ニックネームなしの join では nickname キーが省略される
        let text = encode(&ClientMessage::Join { nickname: None }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({"type": "join", "data": {}}));
    }

    #[test]
    fn test_encode_send_message() {
        // テスト項目: send_message が {type, data:{content}} にエンコードされる
        let text = encode(&ClientMessage::SendMessage {
            content: "hello".to_string(),
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({"type": "send_message", "data": {"content": "hello"}}));
    }

    #[test]
    fn test_encode_ping_has_null_data() {
        // テスト項目: ping の data は null になる
        let text = encode(&ClientMessage::Ping).unwrap();
        assert_eq!(text, r#"{"type":"ping","data":null}"#);
    }

    #[test]
    fn test_decode_joined() {
        // テスト項目: joined がユーザーと履歴付きで復元される
        // given (前提条件):
        let text = json!({
            "type": "joined",
            "data": {
                "user": user_json("u1", "alice"),
                "messages": [{
                    "id": "m1",
                    "user_id": "system",
                    "user_nickname": "SYSTEM",
                    "user_avatar": "",
                    "content": "alice joined",
                    "timestamp": "2024-01-01T00:00:00Z",
                    "type": "system"
                }]
            }
        })
        .to_string();

        // when (操作):
        let event = decode(&text).unwrap();

        // then (期待する結果):
        match event {
            ChatEvent::Joined(joined) => {
                assert_eq!(joined.user.nickname, "alice");
                assert_eq!(joined.messages.len(), 1);
                assert!(joined.messages[0].is_system());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_user_events() {
        // テスト項目: user_joined / user_left / user_list を復元できる
        let joined = json!({"type": "user_joined", "data": {"user": user_json("u2", "bob")}});
        let left = json!({"type": "user_left", "data": {"user": user_json("u2", "bob")}});
        let list = json!({"type": "user_list", "data": {"users": [user_json("u1", "alice"), user_json("u2", "bob")]}});

        assert!(matches!(
            decode(&joined.to_string()).unwrap(),
            ChatEvent::UserJoined(e) if e.user.id == "u2"
        ));
        assert!(matches!(
            decode(&left.to_string()).unwrap(),
            ChatEvent::UserLeft(e) if e.user.nickname == "bob"
        ));
        assert!(matches!(
            decode(&list.to_string()).unwrap(),
            ChatEvent::UserList(e) if e.users.len() == 2
        ));
    }

    #[test]
    fn test_decode_new_message_echo() {
        // テスト項目: サーバーがエコーした new_message の content が保持される
        let text = json!({
            "type": "new_message",
            "data": {"message": {
                "id": "m9",
                "user_id": "u1",
                "user_nickname": "alice",
                "user_avatar": "",
                "content": "hello",
                "timestamp": "2024-01-01T00:00:00Z",
                "type": "text"
            }}
        })
        .to_string();

        match decode(&text).unwrap() {
            ChatEvent::NewMessage(e) => assert_eq!(e.message.content, "hello"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_error_and_pong() {
        // テスト項目: error と pong を復元できる（pong は data を無視する）
        assert_eq!(
            decode(r#"{"type":"error","data":{"message":"room is full"}}"#).unwrap(),
            ChatEvent::Error(ErrorEvent::new("room is full"))
        );
        assert_eq!(decode(r#"{"type":"pong","data":null}"#).unwrap(), ChatEvent::Pong);
        assert_eq!(decode(r#"{"type":"pong"}"#).unwrap(), ChatEvent::Pong);
    }

    #[test]
    fn test_decode_unknown_type() {
        // テスト項目: 未知の type は UnknownType になる
        let err = decode(r#"{"type":"typing","data":{}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownType(t) if t == "typing"));
    }

    #[test]
    fn test_decode_malformed_inputs() {
        // テスト項目: JSON でない・オブジェクトでない・type がない入力は Malformed になる
        for text in ["not json", "[1,2,3]", r#""joined""#, r#"{"data":{}}"#, r#"{"type":5}"#] {
            assert!(
                matches!(decode(text), Err(DecodeError::Malformed(_))),
                "expected malformed for {text}"
            );
        }
    }

    #[test]
    fn test_decode_payload_mismatch() {
        // テスト項目: 既知の type で data の形が合わない場合は Payload エラーになる
        let err = decode(r#"{"type":"new_message","data":null}"#).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Payload {
                kind: EventKind::NewMessage,
                ..
            }
        ));
    }
}
