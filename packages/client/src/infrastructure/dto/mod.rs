//! Data transfer objects exchanged with the chat server.

pub mod websocket;
