//! Per-connection liveness tracking.
//!
//! The connection task pings every `ping_interval` and feeds every inbound
//! frame (pong or otherwise) into [`Liveness::record`]. A connection that
//! stays silent for longer than `ping_timeout` is considered dead.

use std::time::Duration;

use tokio::time::Instant;

/// Last-activity clock for one connection.
#[derive(Debug, Clone, Copy)]
pub struct Liveness {
    last_seen: Instant,
    timeout: Duration,
}

impl Liveness {
    /// Starts the clock now.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            last_seen: Instant::now(),
            timeout,
        }
    }

    /// Records inbound activity.
    pub fn record(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Time since the last inbound frame.
    #[must_use]
    pub fn silence(&self) -> Duration {
        self.last_seen.elapsed()
    }

    /// Returns `true` once the peer has been silent past the timeout.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.silence() > self.timeout
    }
}
