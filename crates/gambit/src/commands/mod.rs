//! CLI command handlers.

pub mod games;
pub mod start;
pub mod status;

use std::path::Path;

use anyhow::Result;
use gambit_client::GambitClient;
use gambit_config::{ConfigSource, GambitConfig, LoadedConfig};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Server URL to connect to.
    pub server_url: String,
    /// Route prefix the server mounts game routes under.
    pub route_prefix: String,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Merged configuration.
    pub config: GambitConfig,
}

impl Context {
    /// Build a client for the configured server.
    pub fn client(&self) -> Result<GambitClient> {
        Ok(GambitClient::builder()
            .base_url(&self.server_url)
            .route_prefix(&self.route_prefix)
            .build()?)
    }
}

/// Load configuration from an explicit file, or by discovery.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    match path {
        Some(path) => {
            let config = gambit_config::load_config_file(path)?;
            Ok(LoadedConfig {
                config,
                sources: vec![ConfigSource {
                    path: path.to_path_buf(),
                    loaded: true,
                }],
                warnings: Vec::new(),
            })
        }
        None => Ok(gambit_config::load_config(None)?),
    }
}
