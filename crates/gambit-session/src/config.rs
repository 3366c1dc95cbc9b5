//! Configuration for the session store.

use std::time::Duration;

use crate::expiry::ExpiryPolicy;

/// Default ceiling on concurrently live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 100;

/// Default hard cap on moves recorded per session.
pub const DEFAULT_MAX_MOVES: usize = 500;

/// Default idle period after which a session is evicted (10 minutes).
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Default total lifetime of a session (1 hour).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// Default period between eviction sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of live sessions. Creation is refused at this size.
    pub max_sessions: usize,

    /// Maximum number of moves a single session will accept.
    pub max_moves: usize,

    /// Sessions without an accepted move for longer than this are evicted.
    pub idle_timeout: Duration,

    /// Sessions older than this are evicted regardless of activity.
    pub max_age: Duration,

    /// Interval between eviction sweeps.
    pub sweep_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
            max_moves: DEFAULT_MAX_MOVES,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_age: DEFAULT_MAX_AGE,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the live-session ceiling.
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max;
        self
    }

    /// Set the per-session move cap.
    pub fn with_max_moves(mut self, max: usize) -> Self {
        self.max_moves = max;
        self
    }

    /// Set the idle timeout.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the maximum session age.
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = age;
        self
    }

    /// Set the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Expiry policy derived from the configured timeouts.
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::new(self.idle_timeout, self.max_age)
    }
}
