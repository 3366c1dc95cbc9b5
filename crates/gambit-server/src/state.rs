//! Application state shared across handlers.

use std::sync::Arc;

use gambit_session::{SessionError, SessionStore};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::ratelimit::{SharedRateLimiter, create_rate_limiter};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Game session store.
    pub store: SessionStore,

    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// Per-IP request limiter.
    pub limiter: SharedRateLimiter,
}

impl AppState {
    /// Create a new application state.
    pub fn new(store: SessionStore, config: ServerConfig) -> Self {
        let limiter = create_rate_limiter(config.api_rpm, config.rate_limit_burst);
        Self {
            store,
            config: Arc::new(config),
            limiter,
        }
    }

    /// Convert a store result into a handler result.
    ///
    /// Lookups of unknown games are answered only after the configured
    /// not-found delay. The store call has already returned at this point,
    /// so the delay never holds the store lock.
    pub async fn settle<T>(
        &self,
        result: std::result::Result<T, SessionError>,
    ) -> crate::error::Result<T> {
        match result {
            Err(e) if e.is_not_found() => {
                let delay = self.config.not_found_delay;
                if !delay.is_zero() {
                    tracing::debug!(delay_ms = delay.as_millis() as u64, "Delaying not-found response");
                    tokio::time::sleep(delay).await;
                }
                Err(ServerError::from(e))
            }
            other => other.map_err(ServerError::from),
        }
    }
}
