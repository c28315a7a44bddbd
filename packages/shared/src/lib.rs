//! Shared utilities for Pixel Chat.
//!
//! Logging setup and time helpers used by the client crate and its binary.

pub mod logger;
pub mod time;
