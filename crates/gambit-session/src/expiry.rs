//! Expiry rules for idle and over-age sessions.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::{DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_AGE};
use crate::session::Session;

/// Why a session was judged expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryReason {
    /// No accepted move within the idle timeout.
    Idle,
    /// Total age exceeded the maximum lifetime.
    MaxAge,
}

impl fmt::Display for ExpiryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryReason::Idle => write!(f, "idle"),
            ExpiryReason::MaxAge => write!(f, "max_age"),
        }
    }
}

/// Decides when a session should be evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    /// Maximum time since the last accepted move.
    pub idle_timeout: Duration,

    /// Maximum time since creation.
    pub max_age: Duration,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_AGE)
    }
}

impl ExpiryPolicy {
    /// Create a policy with the given thresholds.
    pub fn new(idle_timeout: Duration, max_age: Duration) -> Self {
        Self {
            idle_timeout,
            max_age,
        }
    }

    /// Reason the session is expired as of `now`, if it is.
    ///
    /// Age is checked first so an over-age session that is also idle
    /// reports [`ExpiryReason::MaxAge`].
    pub fn check(&self, session: &Session, now: Instant) -> Option<ExpiryReason> {
        if now.saturating_duration_since(session.created_at()) > self.max_age {
            Some(ExpiryReason::MaxAge)
        } else if now.saturating_duration_since(session.last_activity_at()) > self.idle_timeout {
            Some(ExpiryReason::Idle)
        } else {
            None
        }
    }

    /// Check if the session is expired as of `now`.
    pub fn is_expired(&self, session: &Session, now: Instant) -> bool {
        self.check(session, now).is_some()
    }
}
