//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [server]                 # listener, route prefix, throttling
//! [sessions]               # store limits and expiry
//! [logging]                # console level, log files
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default values shared by the config sections.
pub mod defaults {
    pub const DEFAULT_PORT: u16 = 8543;
    pub const DEFAULT_BIND: &str = "0.0.0.0";
    pub const DEFAULT_ROUTE_PREFIX: &str = "/uc2024";
    pub const REQUESTS_PER_MINUTE: u32 = 600;
    pub const RATE_LIMIT_BURST: u32 = 60;
    pub const NOT_FOUND_DELAY_SECS: u64 = 5;

    pub const MAX_SESSIONS: usize = 100;
    pub const MAX_MOVES: usize = 500;
    pub const IDLE_TIMEOUT_SECS: u64 = 10 * 60;
    pub const MAX_AGE_SECS: u64 = 60 * 60;
    pub const SWEEP_INTERVAL_SECS: u64 = 60;

    pub const LOG_LEVEL: &str = "info";
}

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GambitConfig {
    /// Server configuration.
    pub server: Option<ServerSection>,

    /// Session store configuration.
    pub sessions: Option<SessionsSection>,

    /// Logging configuration.
    pub logging: Option<LoggingSection>,
}

impl GambitConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Merge another config on top of this one (other takes priority).
    ///
    /// Sections replace whole; a section present in `other` wins.
    pub fn merge(&mut self, other: GambitConfig) {
        if other.server.is_some() {
            self.server = other.server;
        }

        if other.sessions.is_some() {
            self.sessions = other.sessions;
        }

        if other.logging.is_some() {
            self.logging = other.logging;
        }
    }

    /// Server section, or defaults when absent.
    pub fn server_or_default(&self) -> ServerSection {
        self.server.clone().unwrap_or_default()
    }

    /// Sessions section, or defaults when absent.
    pub fn sessions_or_default(&self) -> SessionsSection {
        self.sessions.clone().unwrap_or_default()
    }

    /// Logging section, or defaults when absent.
    pub fn logging_or_default(&self) -> LoggingSection {
        self.logging.clone().unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Port to listen on.
    pub port: u16,
    /// Address to bind to.
    pub bind: String,
    /// Prefix the game routes are mounted under. Empty mounts at the root.
    pub route_prefix: String,
    /// Enable per-IP rate limiting.
    pub rate_limiting: bool,
    /// Requests per minute per client IP.
    pub api_rpm: u32,
    /// Burst allowance per client IP.
    pub rate_limit_burst: u32,
    /// Enable request logging.
    pub request_logging: bool,
    /// Seconds to wait before answering a lookup of an unknown game.
    pub not_found_delay_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: defaults::DEFAULT_PORT,
            bind: defaults::DEFAULT_BIND.to_string(),
            route_prefix: defaults::DEFAULT_ROUTE_PREFIX.to_string(),
            rate_limiting: true,
            api_rpm: defaults::REQUESTS_PER_MINUTE,
            rate_limit_burst: defaults::RATE_LIMIT_BURST,
            request_logging: true,
            not_found_delay_secs: defaults::NOT_FOUND_DELAY_SECS,
        }
    }
}

impl ServerSection {
    /// Combine `bind` and `port` into a socket address.
    pub fn bind_address(&self) -> crate::Result<SocketAddr> {
        let ip: IpAddr = self.bind.parse().map_err(|_| ConfigError::Invalid {
            field: "server.bind".to_string(),
            message: format!("'{}' is not an IP address", self.bind),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Not-found delay as a duration.
    pub fn not_found_delay(&self) -> Duration {
        Duration::from_secs(self.not_found_delay_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// `[sessions]` section.
///
/// ```toml
/// [sessions]
/// max_sessions = 100
/// max_moves = 500
/// idle_timeout_secs = 600
/// max_age_secs = 3600
/// sweep_interval_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsSection {
    /// Ceiling on live sessions; creates beyond it are rejected.
    pub max_sessions: usize,
    /// Moves a session may hold.
    pub max_moves: usize,
    /// Seconds without a move before a session is evicted.
    pub idle_timeout_secs: u64,
    /// Seconds after creation before a session is evicted regardless of activity.
    pub max_age_secs: u64,
    /// Seconds between eviction sweeps.
    pub sweep_interval_secs: u64,
}

impl Default for SessionsSection {
    fn default() -> Self {
        Self {
            max_sessions: defaults::MAX_SESSIONS,
            max_moves: defaults::MAX_MOVES,
            idle_timeout_secs: defaults::IDLE_TIMEOUT_SECS,
            max_age_secs: defaults::MAX_AGE_SECS,
            sweep_interval_secs: defaults::SWEEP_INTERVAL_SECS,
        }
    }
}

impl SessionsSection {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Reject values the store cannot run with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "sessions.sweep_interval_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Console filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Write JSON logs to daily rolling files.
    pub file: bool,
    /// Directory for log files. Defaults to `<config dir>/logs`.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            file: true,
            dir: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
