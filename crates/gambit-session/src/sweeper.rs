//! Background eviction of expired sessions.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::store::SessionStore;

/// Shortest period the sweeper will tick at.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Periodically removes idle and over-age sessions from a store.
///
/// The sweeper synchronizes with request handlers only through the
/// store's own lock. A session that stops receiving moves is reclaimed
/// within `interval + idle_timeout`.
#[derive(Debug, Clone)]
pub struct EvictionSweeper {
    store: SessionStore,
    interval: Duration,
}

impl EvictionSweeper {
    /// Create a sweeper using the store's configured interval.
    pub fn new(store: SessionStore) -> Self {
        let interval = store.config().sweep_interval.max(MIN_INTERVAL);
        Self { store, interval }
    }

    /// Override the sweep interval. Values below 1 ms are raised to 1 ms.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Get the sweep interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the sweeper on the current runtime until `shutdown` fires.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Sweep every interval until `shutdown` fires.
    ///
    /// The first sweep happens one full interval after start.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = self.interval.as_secs(), "Eviction sweeper started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = self.store.sweep();
                    if removed > 0 {
                        info!(removed, live = self.store.len(), "Evicted expired sessions");
                    } else {
                        debug!(live = self.store.len(), "Eviction sweep found nothing to remove");
                    }
                }
            }
        }

        info!("Eviction sweeper stopped");
    }
}
