//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8543;

/// Default prefix the game routes are mounted under.
pub const DEFAULT_ROUTE_PREFIX: &str = "/uc2024";

/// Default delay before answering a request for an unknown game (5 seconds).
pub const DEFAULT_NOT_FOUND_DELAY: Duration = Duration::from_secs(5);

/// Default requests per minute allowed per client IP.
///
/// Two players behind one address each poll twice a second and send moves
/// on top of that; this stays well above that traffic.
pub const DEFAULT_API_RPM: u32 = 600;

/// Default burst allowance per client IP.
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 60;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Path prefix for the game routes. Empty mounts them at the root.
    pub route_prefix: String,

    /// Enable per-IP rate limiting.
    pub rate_limiting: bool,

    /// Rate limit: requests per minute per client IP.
    pub api_rpm: u32,

    /// Rate limit: requests a client may make in a burst.
    pub rate_limit_burst: u32,

    /// Enable request logging.
    pub request_logging: bool,

    /// Delay before responding to a lookup of an unknown game.
    /// Slows down callers guessing game keys. Applied outside the store lock.
    pub not_found_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            rate_limiting: true,
            api_rpm: DEFAULT_API_RPM,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            request_logging: true,
            not_found_delay: DEFAULT_NOT_FOUND_DELAY,
        }
    }
}

impl ServerConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set the route prefix. A leading `/` is added and trailing ones removed.
    pub fn with_route_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.route_prefix = normalize_prefix(prefix.as_ref());
        self
    }

    /// Enable or disable rate limiting.
    pub fn with_rate_limiting(mut self, enabled: bool) -> Self {
        self.rate_limiting = enabled;
        self
    }

    /// Set the API rate limit (requests per minute per IP).
    pub fn with_api_rpm(mut self, rpm: u32) -> Self {
        self.api_rpm = rpm;
        self
    }

    /// Set the per-IP burst allowance.
    pub fn with_rate_limit_burst(mut self, burst: u32) -> Self {
        self.rate_limit_burst = burst;
        self
    }

    /// Enable or disable request logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    /// Set the not-found delay.
    pub fn with_not_found_delay(mut self, delay: Duration) -> Self {
        self.not_found_delay = delay;
        self
    }
}

/// Normalize a route prefix to `""` or `/segment[/segment...]`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
