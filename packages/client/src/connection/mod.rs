//! Connection Manager.
//!
//! Keeps one logical connection to the chat server alive: opens and closes
//! the transport, decodes inbound envelopes into [`ChatEvent`](crate::domain::ChatEvent)s,
//! fans them out to subscribers, and reconnects at a fixed interval after an
//! unexpected close until the retry budget is spent.
//!
//! ```text
//!  ChatClient (clonable handle)           ConnectionTask (tokio task)
//!  connect / disconnect / send ──mpsc──▶  select! { command, handshake,
//!  is_connected / state  ◀──watch──────            inbound frame, retry timer }
//!  on / off ──────────▶ EventBus ◀────── emit
//! ```

mod client;
pub mod event_bus;
pub mod reconnect;
mod state;
mod task;

pub use client::ChatClient;
pub use event_bus::{Callback, EventBus, Subscription};
pub use reconnect::{ReconnectDecision, ReconnectPolicy, RetryCounter};
pub use state::ConnectionState;
pub use task::{RECONNECT_EXHAUSTED_MESSAGE, TRANSPORT_ERROR_MESSAGE};
