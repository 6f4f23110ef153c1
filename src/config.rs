//! Manager configuration - passed from higher layers.

use std::time::Duration;

/// Tunables for the connection state machine.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Provider lookup attempts during restore. Extensions register
    /// asynchronously, so the saved wallet may not be there on the first
    /// look after a reload.
    pub restore_retries: u32,
    /// Delay between restore lookup attempts.
    pub restore_retry_delay: Duration,
    /// Upper bound on a pending wallet connect call. Expiry surfaces as
    /// [`ConnectError::Timeout`](crate::ConnectError::Timeout), distinct
    /// from user cancellation.
    pub connect_timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            restore_retries: 3,
            restore_retry_delay: Duration::from_millis(250),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl LinkConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_restore_retries(mut self, retries: u32) -> Self {
        self.restore_retries = retries;
        self
    }
    pub fn with_restore_retry_delay(mut self, delay: Duration) -> Self {
        self.restore_retry_delay = delay;
        self
    }
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}
