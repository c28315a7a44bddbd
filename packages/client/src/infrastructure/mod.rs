//! Infrastructure layer: wire format and transports.

pub mod codec;
pub mod dto;
pub mod transport;
