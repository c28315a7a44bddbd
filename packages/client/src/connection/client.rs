//! Public handle to a reconnecting chat connection.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::{
    config::ClientConfig,
    domain::{
        ChatEvent, ErrorEvent, EventKind, JoinedEvent, NewMessageEvent, UserJoinedEvent,
        UserLeftEvent, UserListEvent,
    },
    infrastructure::{
        codec::ClientMessage,
        transport::{Connector, WebSocketConnector},
    },
};

use super::{
    event_bus::{EventBus, Subscription},
    state::ConnectionState,
    task::{Command, ConnectionTask},
};

/// Handle to one logical chat connection.
///
/// Cloning is cheap and every clone drives the same connection. All
/// operations return immediately; outcomes are reported through events
/// registered with [`ChatClient::on`]. The background task stops, closing
/// any open transport, once every clone has been dropped.
#[derive(Clone)]
pub struct ChatClient {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ConnectionState>,
    bus: Arc<EventBus>,
}

impl ChatClient {
    /// Create a client that connects over WebSocket.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_connector(config, Arc::new(WebSocketConnector))
    }

    /// Create a client using a custom transport.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_connector(config: ClientConfig, connector: Arc<dyn Connector>) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(ConnectionState::Disconnected);
        let bus = Arc::new(EventBus::new());

        let task = ConnectionTask::new(
            config.url().to_string(),
            config.reconnect_policy(),
            connector,
            Arc::clone(&bus),
            state_tx,
        );
        tokio::spawn(task.run(command_rx));

        Self {
            commands,
            state,
            bus,
        }
    }

    /// Open the connection. Resets the reconnection budget. No-op while
    /// already connecting or connected.
    pub fn connect(&self) {
        self.command(Command::Connect);
    }

    /// Close the connection and cancel any pending reconnect. No-op when
    /// already disconnected.
    pub fn disconnect(&self) {
        self.command(Command::Disconnect(None));
    }

    /// Like [`disconnect`](Self::disconnect), but resolves only once the
    /// connection task has closed the transport.
    ///
    /// Await this before shutting down the runtime so the server receives a
    /// close frame instead of an abrupt EOF.
    pub async fn disconnect_and_wait(&self) {
        let (done, closed) = oneshot::channel();
        self.command(Command::Disconnect(Some(done)));
        if closed.await.is_err() {
            tracing::debug!("Connection task stopped before acknowledging disconnect");
        }
    }

    /// Ask to enter the chat; the server assigns a nickname when `None`.
    pub fn join(&self, nickname: Option<String>) {
        self.send(ClientMessage::Join { nickname });
    }

    /// Submit a chat message. Dropped with a warning when not connected.
    pub fn send_message(&self, content: impl Into<String>) {
        self.send(ClientMessage::SendMessage {
            content: content.into(),
        });
    }

    /// Liveness probe; the server answers with a `pong` event.
    pub fn ping(&self) {
        self.send(ClientMessage::Ping);
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Register a callback for every event of `kind`.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&ChatEvent) + Send + Sync + 'static,
    {
        self.bus.on(kind, callback)
    }

    /// Remove a registration; later events no longer reach it.
    pub fn off(&self, subscription: &Subscription) -> bool {
        self.bus.off(subscription)
    }

    pub fn clear_subscriptions(&self) {
        self.bus.clear();
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.bus.subscriber_count(kind)
    }

    /// Register a callback for the transport opening.
    ///
    /// `connected`, `disconnected` and `pong` carry no payload, so their
    /// callbacks take no arguments.
    pub fn on_connected<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(EventKind::Connected, move |_| callback())
    }

    pub fn on_disconnected<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(EventKind::Disconnected, move |_| callback())
    }

    pub fn on_pong<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(EventKind::Pong, move |_| callback())
    }

    pub fn on_joined<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&JoinedEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::Joined, move |event| {
            if let ChatEvent::Joined(payload) = event {
                callback(payload);
            }
        })
    }

    pub fn on_user_joined<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&UserJoinedEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::UserJoined, move |event| {
            if let ChatEvent::UserJoined(payload) = event {
                callback(payload);
            }
        })
    }

    pub fn on_user_left<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&UserLeftEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::UserLeft, move |event| {
            if let ChatEvent::UserLeft(payload) = event {
                callback(payload);
            }
        })
    }

    pub fn on_new_message<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&NewMessageEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::NewMessage, move |event| {
            if let ChatEvent::NewMessage(payload) = event {
                callback(payload);
            }
        })
    }

    pub fn on_user_list<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&UserListEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::UserList, move |event| {
            if let ChatEvent::UserList(payload) = event {
                callback(payload);
            }
        })
    }

    pub fn on_error<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ErrorEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::Error, move |event| {
            if let ChatEvent::Error(payload) = event {
                callback(payload);
            }
        })
    }

    fn send(&self, message: ClientMessage) {
        if !self.is_connected() {
            tracing::debug!(
                "Not connected, dropping {:?} before queueing",
                message.message_type()
            );
            return;
        }
        self.command(Command::Send(message));
    }

    fn command(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Connection task has stopped; command dropped");
        }
    }
}
