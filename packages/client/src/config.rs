//! Client configuration.
//!
//! The endpoint is read once at startup and handed to the connection core;
//! it is not re-read afterwards.

use std::time::Duration;

use thiserror::Error;

use crate::connection::ReconnectPolicy;

/// Endpoint used when nothing else is configured
pub const DEFAULT_WS_URL: &str = "ws://localhost:3001/ws";

/// Environment variable overriding the endpoint
pub const WS_URL_ENV: &str = "PIXEL_CHAT_WS_URL";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid WebSocket URL '{0}': expected ws:// or wss://")]
    InvalidUrl(String),
}

/// Settings for a [`ChatClient`](crate::ChatClient)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    url: String,
    reconnect: ReconnectPolicy,
}

impl ClientConfig {
    /// Create a config for the given endpoint with the default reconnection
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` unless the URL uses the `ws` or
    /// `wss` scheme and names a host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let has_host = url
            .strip_prefix("ws://")
            .or_else(|| url.strip_prefix("wss://"))
            .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'));
        if !has_host {
            return Err(ConfigError::InvalidUrl(url));
        }
        Ok(Self {
            url,
            reconnect: ReconnectPolicy::default(),
        })
    }

    pub fn with_reconnect_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    pub fn with_max_reconnect_attempts(mut self, max_attempts: u32) -> Self {
        self.reconnect.max_attempts = max_attempts;
        self
    }

    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect.interval = interval;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        self.reconnect
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WS_URL.to_string(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}
