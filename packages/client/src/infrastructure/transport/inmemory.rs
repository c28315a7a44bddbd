//! In-memory transport built on tokio channels.
//!
//! Each handshake outcome is scripted up front on an [`InMemoryConnector`];
//! an accepted handshake hands the test (or embedding code) an
//! [`InMemoryPeer`] that plays the server side of that one connection.

use std::{
    collections::VecDeque,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{Connector, Transport, TransportError};

enum Outcome {
    Accept(InMemoryTransport),
    Refuse(String),
    Hang,
}

/// Connector whose handshakes are scripted in FIFO order.
///
/// Once the script runs out every further attempt is refused.
#[derive(Default)]
pub struct InMemoryConnector {
    outcomes: Mutex<VecDeque<Outcome>>,
    attempts: AtomicUsize,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next handshake to succeed and return the server side.
    pub fn accept_next(&self) -> InMemoryPeer {
        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        self.push(Outcome::Accept(InMemoryTransport {
            inbound,
            outbound: Some(outbound),
        }));
        InMemoryPeer {
            to_client: Some(to_client),
            from_client,
        }
    }

    /// Script the next handshake to fail.
    pub fn refuse_next(&self, reason: impl Into<String>) {
        self.push(Outcome::Refuse(reason.into()));
    }

    /// Script the next handshake to never complete.
    pub fn hang_next(&self) {
        self.push(Outcome::Hang);
    }

    /// Number of handshakes attempted so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn push(&self, outcome: Outcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }
}

#[async_trait]
impl Connector for InMemoryConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match outcome {
            Some(Outcome::Accept(transport)) => Ok(Box::new(transport)),
            Some(Outcome::Refuse(reason)) => Err(TransportError::Connect(reason)),
            Some(Outcome::Hang) => std::future::pending().await,
            None => Err(TransportError::Connect(format!("{url}: connection refused"))),
        }
    }
}

/// Client side of an in-memory connection
pub struct InMemoryTransport {
    inbound: UnboundedReceiver<Result<String, TransportError>>,
    outbound: Option<UnboundedSender<String>>,
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        let outbound = self.outbound.as_ref().ok_or(TransportError::Closed)?;
        outbound.send(text).map_err(|_| TransportError::Closed)
    }

    async fn recv(&mut self) -> Option<Result<String, TransportError>> {
        self.inbound.recv().await
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self.outbound.take() {
            Some(_) => {
                self.inbound.close();
                Ok(())
            }
            None => Err(TransportError::Closed),
        }
    }
}

/// Server side of an in-memory connection
pub struct InMemoryPeer {
    to_client: Option<UnboundedSender<Result<String, TransportError>>>,
    from_client: UnboundedReceiver<String>,
}

impl InMemoryPeer {
    /// Deliver a text frame to the client. Returns `false` if the client
    /// side is gone.
    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.to_client
            .as_ref()
            .is_some_and(|tx| tx.send(Ok(text.into())).is_ok())
    }

    /// Make the client's next read fail.
    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.to_client
            .as_ref()
            .is_some_and(|tx| tx.send(Err(TransportError::Receive(reason.into()))).is_ok())
    }

    /// Close the connection from the server side.
    pub fn close(&mut self) {
        self.to_client = None;
    }

    /// Wait for the next frame written by the client; `None` once the
    /// client closed or dropped its side.
    pub async fn recv(&mut self) -> Option<String> {
        self.from_client.recv().await
    }

    /// Take a frame written by the client without waiting.
    pub fn try_recv(&mut self) -> Option<String> {
        self.from_client.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accepted_connection_is_duplex() {
        // テスト項目: 受け入れた接続で双方向にテキストを送受信できる
        // given (前提条件):
        let connector = InMemoryConnector::new();
        let mut peer = connector.accept_next();
        let mut transport = connector.connect("mem://chat").await.unwrap();

        // when (操作):
        transport.send("from client".to_string()).await.unwrap();
        peer.send_text("from server");

        // then (期待する結果):
        assert_eq!(peer.recv().await.as_deref(), Some("from client"));
        assert_eq!(transport.recv().await, Some(Ok("from server".to_string())));
        assert_eq!(connector.attempts(), 1);
    }

    #[tokio::test]
    async fn test_script_order_and_exhaustion() {
        // テスト項目: スクリプト順に結果が返り、尽きたら接続拒否になる
        // given (前提条件):
        let connector = InMemoryConnector::new();
        connector.refuse_next("boom");
        let _peer = connector.accept_next();

        // when (操作):
        let first = connector.connect("mem://chat").await;
        let second = connector.connect("mem://chat").await;
        let third = connector.connect("mem://chat").await;

        // then (期待する結果):
        assert_eq!(first.err(), Some(TransportError::Connect("boom".to_string())));
        assert!(second.is_ok());
        assert!(matches!(third, Err(TransportError::Connect(_))));
        assert_eq!(connector.attempts(), 3);
    }

    #[tokio::test]
    async fn test_peer_close_ends_client_stream() {
        // テスト項目: サーバー側が閉じるとクライアントの recv が None を返す
        let connector = InMemoryConnector::new();
        let mut peer = connector.accept_next();
        let mut transport = connector.connect("mem://chat").await.unwrap();

        peer.close();

        assert_eq!(transport.recv().await, None);
    }

    #[tokio::test]
    async fn test_client_close_is_visible_to_peer() {
        // テスト項目: クライアントが閉じるとサーバー側の recv が None を返し、再送信は失敗する
        let connector = InMemoryConnector::new();
        let mut peer = connector.accept_next();
        let mut transport = connector.connect("mem://chat").await.unwrap();

        transport.close().await.unwrap();

        assert_eq!(peer.recv().await, None);
        assert_eq!(
            transport.send("late".to_string()).await,
            Err(TransportError::Closed)
        );
        assert_eq!(transport.close().await, Err(TransportError::Closed));
    }
}
