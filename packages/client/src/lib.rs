//! Reconnecting WebSocket chat client.
//!
//! The core is [`ChatClient`]: it keeps one connection to the chat server
//! alive, encodes outbound intents into `{"type", "data"}` envelopes, decodes
//! inbound envelopes into typed [`ChatEvent`]s and fans them out to
//! subscribers. A terminal front end built on it lives in [`ui`].

pub mod config;
pub mod connection;
pub mod domain;
pub mod infrastructure;
pub mod ui;

// Re-export entry points
pub use config::ClientConfig;
pub use connection::{ChatClient, ConnectionState, ReconnectPolicy, Subscription};
pub use domain::{ChatEvent, EventKind};
pub use ui::run as run_client;
