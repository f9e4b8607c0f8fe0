// src/rcon/pacing.rs
use std::time::Duration;

/// Delay between consecutive statistics queries in one sweep.
pub const DEFAULT_CALL_DELAY: Duration = Duration::from_millis(1000);

/// Fixed-interval throttle for batches of statistics queries against one server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    interval: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self { interval: DEFAULT_CALL_DELAY }
    }
}

impl PacingPolicy {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn between_statistics_calls(&self) -> Duration {
        self.interval
    }

    pub async fn pause(&self) {
        let delay = self.between_statistics_calls();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
