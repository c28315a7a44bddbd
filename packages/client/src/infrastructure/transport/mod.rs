//! Transport abstraction.
//!
//! The connection core only talks to these traits, so the socket can be
//! swapped (WebSocket in production, channels in tests) without touching the
//! lifecycle or dispatch logic. A [`Connector`] performs one handshake and
//! yields a fresh [`Transport`]; transports are never reused across attempts.

pub mod inmemory;
pub mod websocket;

use async_trait::async_trait;
use thiserror::Error;

pub use inmemory::{InMemoryConnector, InMemoryPeer, InMemoryTransport};
pub use websocket::{WebSocketConnector, WebSocketTransport};

/// Transport-level failures. These never reach callers directly; the
/// connection task turns them into events and log lines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Endpoint unreachable or handshake rejected
    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("failed to send frame: {0}")]
    Send(String),

    #[error("failed to receive frame: {0}")]
    Receive(String),

    /// The transport was already closed
    #[error("transport closed")]
    Closed,
}

/// An open duplex text channel to the server.
#[async_trait]
pub trait Transport: Send {
    /// Write one text payload.
    async fn send(&mut self, text: String) -> Result<(), TransportError>;

    /// Wait for the next text payload.
    ///
    /// Returns `None` once the connection is closed. Must be cancel-safe:
    /// the connection task drops this future whenever another event wins
    /// the race.
    async fn recv(&mut self) -> Option<Result<String, TransportError>>;

    /// Close the connection. Closing an already-closed transport may fail.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Factory that establishes a new [`Transport`] for each attempt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError>;
}
