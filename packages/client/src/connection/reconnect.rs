//! Fixed-interval, bounded reconnection policy.

use std::time::Duration;

/// Default number of automatic reconnect attempts after an unexpected close
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Default delay between automatic reconnect attempts
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(3);

/// Reconnection limits. The delay is constant, not exponential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            interval: DEFAULT_RECONNECT_INTERVAL,
        }
    }
}

/// Outcome of asking for another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Try again after `delay`; `attempt` is 1-based
    Retry { attempt: u32, delay: Duration },
    /// The budget is spent
    Exhausted,
}

/// Retry counter bounded by a [`ReconnectPolicy`]
#[derive(Debug, Clone)]
pub struct RetryCounter {
    policy: ReconnectPolicy,
    attempts: u32,
}

impl RetryCounter {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
        }
    }

    /// Called after a successful connection or an explicit connect.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    /// Consume one attempt from the budget if any is left.
    pub fn next_attempt(&mut self) -> ReconnectDecision {
        if self.attempts < self.policy.max_attempts {
            self.attempts += 1;
            ReconnectDecision::Retry {
                attempt: self.attempts,
                delay: self.policy.interval,
            }
        } else {
            ReconnectDecision::Exhausted
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }
}
