//! Test fixtures for integration tests.
//!
//! A minimal chat server speaking the `{"type", "data"}` envelope protocol
//! over axum WebSockets, bound to an ephemeral port.

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::broadcast, task::JoinHandle};

#[derive(Clone)]
struct FixtureState {
    kick: broadcast::Sender<()>,
    connections: Arc<AtomicUsize>,
    close_frames: Arc<AtomicUsize>,
}

/// Test server that shuts down when dropped
pub struct TestServer {
    addr: SocketAddr,
    state: FixtureState,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let (kick, _) = broadcast::channel(16);
        let state = FixtureState {
            kick,
            connections: Arc::new(AtomicUsize::new(0)),
            close_frames: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new()
            .route("/ws", get(websocket_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Number of WebSocket upgrades accepted so far
    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    /// Number of close frames received from clients
    pub fn close_frames(&self) -> usize {
        self.state.close_frames.load(Ordering::SeqCst)
    }

    /// Close every open socket from the server side
    pub fn kick_all(&self) {
        let _ = self.state.kick.send(());
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<FixtureState>,
) -> impl IntoResponse {
    state.connections.fetch_add(1, Ordering::SeqCst);
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: FixtureState) {
    let (mut sender, mut receiver) = socket.split();
    let mut kick = state.kick.subscribe();

    loop {
        tokio::select! {
            _ = kick.recv() => {
                let _ = sender.send(Message::Close(None)).await;
                return;
            }
            msg = receiver.next() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) => {
                        state.close_frames.fetch_add(1, Ordering::SeqCst);
                        return;
                    }
                    Some(Ok(_)) => continue,
                    _ => return,
                };
                for reply in respond(text.as_str()) {
                    if sender.send(Message::Text(reply.into())).await.is_err() {
                        return;
                    }
                }
            }
        }
    }
}

fn respond(text: &str) -> Vec<String> {
    let Ok(envelope) = serde_json::from_str::<Value>(text) else {
        return vec![error("Invalid message format")];
    };

    match envelope["type"].as_str() {
        Some("join") => {
            let nickname = envelope["data"]["nickname"]
                .as_str()
                .filter(|n| !n.is_empty())
                .unwrap_or("Guest1")
                .to_string();
            let user = user(&nickname);
            vec![
                json!({"type": "joined", "data": {"user": user, "messages": []}}).to_string(),
                json!({"type": "user_list", "data": {"users": [user]}}).to_string(),
            ]
        }
        Some("send_message") => {
            let content = envelope["data"]["content"].as_str().unwrap_or_default();
            vec![
                json!({"type": "new_message", "data": {"message": {
                    "id": "m1",
                    "user_id": "u1",
                    "user_nickname": "tester",
                    "user_avatar": "",
                    "content": content,
                    "timestamp": "2024-01-01T00:00:00Z",
                    "type": "text"
                }}})
                .to_string(),
            ]
        }
        Some("ping") => vec![json!({"type": "pong", "data": null}).to_string()],
        _ => vec![error("Unknown message type")],
    }
}

fn user(nickname: &str) -> Value {
    json!({
        "id": "u1",
        "socket_id": "s1",
        "nickname": nickname,
        "avatar": "",
        "join_time": "2024-01-01T00:00:00Z",
        "last_activity": "2024-01-01T00:00:00Z",
        "is_online": true
    })
}

fn error(message: &str) -> String {
    json!({"type": "error", "data": {"message": message}}).to_string()
}
