//! Background task owning the transport.
//!
//! One task per [`ChatClient`](super::ChatClient). It is the only place the
//! transport handle, the connection state and the retry counter are
//! mutated, and every transport hook, decode and dispatch runs here, in the
//! order the task observes them.

use std::{future::Future, pin::Pin, sync::Arc};

use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{Instant, sleep_until},
};

use crate::{
    domain::{ChatEvent, ErrorEvent},
    infrastructure::{
        codec::{self, ClientMessage, DecodeError},
        transport::{Connector, Transport, TransportError},
    },
};

use super::{
    event_bus::EventBus,
    reconnect::{ReconnectDecision, ReconnectPolicy, RetryCounter},
    state::ConnectionState,
};

/// Message of the `error` event raised for any transport failure
pub const TRANSPORT_ERROR_MESSAGE: &str = "WebSocket connection error";

/// Message of the terminal `error` event raised when retries are used up
pub const RECONNECT_EXHAUSTED_MESSAGE: &str =
    "Connection failed after repeated attempts; reconnect manually or restart the client";

type TransportResult = Result<Box<dyn Transport>, TransportError>;
type Handshake = Pin<Box<dyn Future<Output = TransportResult> + Send>>;

/// Requests from [`ChatClient`](super::ChatClient) handles
#[derive(Debug)]
pub(crate) enum Command {
    Connect,
    /// Acknowledged through the sender once the transport is closed
    Disconnect(Option<oneshot::Sender<()>>),
    Send(ClientMessage),
}

enum Step {
    Command(Command),
    Established(TransportResult),
    Inbound(Option<Result<String, TransportError>>),
    RetryDue,
    Shutdown,
}

pub(crate) struct ConnectionTask {
    url: String,
    connector: Arc<dyn Connector>,
    bus: Arc<EventBus>,
    state: watch::Sender<ConnectionState>,
    retries: RetryCounter,
    transport: Option<Box<dyn Transport>>,
    handshake: Option<Handshake>,
    retry_at: Option<Instant>,
}

impl ConnectionTask {
    pub(crate) fn new(
        url: String,
        policy: ReconnectPolicy,
        connector: Arc<dyn Connector>,
        bus: Arc<EventBus>,
        state: watch::Sender<ConnectionState>,
    ) -> Self {
        Self {
            url,
            connector,
            bus,
            state,
            retries: RetryCounter::new(policy),
            transport: None,
            handshake: None,
            retry_at: None,
        }
    }

    /// Run until every command sender is dropped.
    pub(crate) async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            let step = tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(command) => Step::Command(command),
                    None => Step::Shutdown,
                },
                result = wait_handshake(&mut self.handshake), if self.handshake.is_some() => {
                    Step::Established(result)
                }
                frame = next_frame(&mut self.transport), if self.transport.is_some() => {
                    Step::Inbound(frame)
                }
                _ = wait_retry(self.retry_at), if self.retry_at.is_some() => Step::RetryDue,
            };

            match step {
                Step::Command(Command::Connect) => self.connect_requested(),
                Step::Command(Command::Disconnect(done)) => {
                    self.disconnect().await;
                    if let Some(done) = done {
                        let _ = done.send(());
                    }
                }
                Step::Command(Command::Send(message)) => self.send(message).await,
                Step::Established(result) => self.on_established(result),
                Step::Inbound(frame) => self.on_inbound(frame),
                Step::RetryDue => {
                    self.retry_at = None;
                    self.begin_handshake();
                }
                Step::Shutdown => {
                    self.shutdown().await;
                    break;
                }
            }
        }
    }

    fn connect_requested(&mut self) {
        if self.transport.is_some() || self.handshake.is_some() {
            tracing::debug!("Connect ignored: already {}", *self.state.borrow());
            return;
        }
        // An explicit connect always starts with a full retry budget
        self.retries.reset();
        self.retry_at = None;
        self.begin_handshake();
    }

    fn begin_handshake(&mut self) {
        tracing::info!("Connecting to {}", self.url);
        let connector = Arc::clone(&self.connector);
        let url = self.url.clone();
        self.handshake = Some(Box::pin(async move { connector.connect(&url).await }));
        self.set_state(ConnectionState::Connecting);
    }

    fn on_established(&mut self, result: TransportResult) {
        self.handshake = None;
        match result {
            Ok(transport) => {
                self.transport = Some(transport);
                self.retries.reset();
                self.set_state(ConnectionState::Connected);
                tracing::info!("Connected to {}", self.url);
                self.bus.emit(&ChatEvent::Connected);
            }
            Err(e) => {
                tracing::warn!("Connection attempt to {} failed: {}", self.url, e);
                self.set_state(ConnectionState::Disconnected);
                self.bus
                    .emit(&ChatEvent::Error(ErrorEvent::new(TRANSPORT_ERROR_MESSAGE)));
                self.bus.emit(&ChatEvent::Disconnected);
                self.schedule_reconnect();
            }
        }
    }

    fn on_inbound(&mut self, frame: Option<Result<String, TransportError>>) {
        match frame {
            Some(Ok(text)) => self.dispatch(&text),
            Some(Err(e)) => {
                tracing::warn!("Transport error: {}", e);
                self.bus
                    .emit(&ChatEvent::Error(ErrorEvent::new(TRANSPORT_ERROR_MESSAGE)));
                self.connection_lost();
            }
            None => {
                tracing::info!("Connection closed by server");
                self.connection_lost();
            }
        }
    }

    fn dispatch(&self, text: &str) {
        match codec::decode(text) {
            Ok(event) => {
                tracing::debug!("Received '{}'", event.kind());
                self.bus.emit(&event);
            }
            Err(DecodeError::UnknownType(message_type)) => {
                tracing::info!("Unknown message type '{}', dropping", message_type);
            }
            Err(e) => {
                tracing::warn!("Dropping inbound message: {}", e);
            }
        }
    }

    fn connection_lost(&mut self) {
        self.transport = None;
        self.set_state(ConnectionState::Disconnected);
        self.bus.emit(&ChatEvent::Disconnected);
        self.schedule_reconnect();
    }

    fn schedule_reconnect(&mut self) {
        match self.retries.next_attempt() {
            ReconnectDecision::Retry { attempt, delay } => {
                tracing::info!(
                    "Reconnecting in {:?} (attempt {}/{})",
                    delay,
                    attempt,
                    self.retries.policy().max_attempts
                );
                self.retry_at = Some(Instant::now() + delay);
            }
            ReconnectDecision::Exhausted => {
                tracing::error!(
                    "Giving up after {} reconnect attempts",
                    self.retries.attempts()
                );
                self.bus
                    .emit(&ChatEvent::Error(ErrorEvent::new(RECONNECT_EXHAUSTED_MESSAGE)));
            }
        }
    }

    async fn disconnect(&mut self) {
        let cancelled_retry = self.retry_at.take().is_some();
        let cancelled_handshake = self.handshake.take().is_some();
        let transport = self.transport.take();

        if transport.is_none() && !cancelled_handshake {
            if cancelled_retry {
                tracing::info!("Pending reconnect cancelled");
            } else {
                tracing::debug!("Disconnect ignored: not connected");
            }
            return;
        }

        if let Some(mut transport) = transport
            && let Err(e) = transport.close().await
        {
            tracing::debug!("Error while closing transport: {}", e);
        }
        self.set_state(ConnectionState::Disconnected);
        tracing::info!("Disconnected from {}", self.url);
        self.bus.emit(&ChatEvent::Disconnected);
    }

    async fn send(&mut self, message: ClientMessage) {
        let Some(transport) = self.transport.as_mut() else {
            match message {
                ClientMessage::SendMessage { .. } => {
                    tracing::warn!("Not connected, dropping chat message")
                }
                _ => tracing::debug!("Not connected, dropping {:?}", message.message_type()),
            }
            return;
        };

        let text = match codec::encode(&message) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to encode {:?}: {}", message.message_type(), e);
                return;
            }
        };

        tracing::debug!("Sending {}", text);
        // A broken socket also fails the next read; loss is handled there
        if let Err(e) = transport.send(text).await {
            tracing::warn!("Failed to send {:?}: {}", message.message_type(), e);
        }
    }

    async fn shutdown(&mut self) {
        self.retry_at = None;
        self.handshake = None;
        if let Some(mut transport) = self.transport.take()
            && let Err(e) = transport.close().await
        {
            tracing::debug!("Error while closing transport: {}", e);
        }
        self.set_state(ConnectionState::Disconnected);
        tracing::debug!("Connection task stopped");
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.send_replace(state);
    }
}

async fn wait_handshake(handshake: &mut Option<Handshake>) -> TransportResult {
    match handshake {
        Some(handshake) => handshake.await,
        None => std::future::pending().await,
    }
}

async fn next_frame(
    transport: &mut Option<Box<dyn Transport>>,
) -> Option<Result<String, TransportError>> {
    match transport {
        Some(transport) => transport.recv().await,
        None => std::future::pending().await,
    }
}

async fn wait_retry(at: Option<Instant>) {
    match at {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
