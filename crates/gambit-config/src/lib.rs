//! Configuration system for the Gambit relay.
//!
//! Provides TOML-based configuration with:
//! - `[server]` listener, route prefix and throttling settings
//! - `[sessions]` store limits and expiry timeouts
//! - `[logging]` console level and rolling log files
//! - Config file layering (user config dir + project-local overrides)
//!
//! Every section and field is optional; missing values take the
//! documented defaults.

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options,
    xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
