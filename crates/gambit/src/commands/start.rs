//! Start command - launches the Gambit relay server.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context as _, Result};
use clap::Args;
use console::{Style, style};

use gambit_config::{ServerSection, SessionsSection};
use gambit_server::{Server, ServerConfig};
use gambit_session::{SessionStore, StoreConfig};

use super::Context;

/// Arguments for the start command.
///
/// CLI arguments override config file values.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long)]
    pub bind: Option<IpAddr>,

    /// Route prefix for game routes, "" for the root (overrides config)
    #[arg(long)]
    pub route_prefix: Option<String>,

    /// Maximum number of live games (overrides config)
    #[arg(long)]
    pub max_sessions: Option<usize>,

    /// Disable per-IP rate limiting
    #[arg(long)]
    pub no_rate_limit: bool,
}

/// Run the start command.
pub async fn run(args: StartArgs, ctx: &Context) -> Result<()> {
    let mut server_section = ctx.config.server_or_default();
    let mut sessions_section = ctx.config.sessions_or_default();

    if let Some(port) = args.port {
        server_section.port = port;
    }
    if let Some(bind) = args.bind {
        server_section.bind = bind.to_string();
    }
    if let Some(prefix) = args.route_prefix {
        server_section.route_prefix = prefix;
    }
    if let Some(max) = args.max_sessions {
        sessions_section.max_sessions = max;
    }
    if args.no_rate_limit {
        server_section.rate_limiting = false;
    }

    let server_config = server_config(&server_section)?;
    let store_config = store_config(&sessions_section)?;

    if !ctx.json_output {
        print_banner(&server_config, &store_config);
    }

    tracing::info!(
        addr = %server_config.bind_address,
        max_sessions = store_config.max_sessions,
        max_moves = store_config.max_moves,
        "Starting relay"
    );

    let store = SessionStore::new(store_config);
    Server::new(store, server_config)
        .run()
        .await
        .context("server stopped with an error")?;

    Ok(())
}

/// Build the server's runtime config from the `[server]` section.
pub fn server_config(section: &ServerSection) -> Result<ServerConfig> {
    let addr: SocketAddr = section.bind_address()?;
    Ok(ServerConfig::new()
        .with_bind_address(addr)
        .with_route_prefix(&section.route_prefix)
        .with_rate_limiting(section.rate_limiting)
        .with_api_rpm(section.api_rpm)
        .with_rate_limit_burst(section.rate_limit_burst)
        .with_request_logging(section.request_logging)
        .with_not_found_delay(section.not_found_delay()))
}

/// Build the store config from the `[sessions]` section.
pub fn store_config(section: &SessionsSection) -> Result<StoreConfig> {
    section.validate()?;
    Ok(StoreConfig::new()
        .with_max_sessions(section.max_sessions)
        .with_max_moves(section.max_moves)
        .with_idle_timeout(section.idle_timeout())
        .with_max_age(section.max_age())
        .with_sweep_interval(section.sweep_interval()))
}

fn print_banner(server: &ServerConfig, store: &StoreConfig) {
    let dim = Style::new().dim();
    let prefix = if server.route_prefix.is_empty() {
        "/"
    } else {
        server.route_prefix.as_str()
    };

    println!();
    println!("{}", style("Gambit Relay").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("  {} {}", dim.apply_to("Listening:"), server.bind_address);
    println!("  {} {}", dim.apply_to("Routes:"), prefix);
    println!(
        "  {} {} games, {} moves each",
        dim.apply_to("Limits:"),
        store.max_sessions,
        store.max_moves
    );
    println!(
        "  {} {}",
        dim.apply_to("Rate limit:"),
        if server.rate_limiting {
            format!("{} req/min per IP", server.api_rpm)
        } else {
            "disabled".to_string()
        }
    );
    println!();
    println!("  {}", dim.apply_to("Press Ctrl-C to stop"));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_server_config_from_defaults() {
        let config = server_config(&ServerSection::default()).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8543".parse().unwrap());
        assert_eq!(config.route_prefix, "/uc2024");
        assert_eq!(config.not_found_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_server_config_rejects_bad_bind() {
        let section = ServerSection {
            bind: "not-an-ip".to_string(),
            ..Default::default()
        };
        assert!(server_config(&section).is_err());
    }

    #[test]
    fn test_store_config_from_section() {
        let section = SessionsSection {
            max_sessions: 5,
            idle_timeout_secs: 30,
            ..Default::default()
        };
        let config = store_config(&section).unwrap();
        assert_eq!(config.max_sessions, 5);
        assert_eq!(config.max_moves, 500);
        assert_eq!(config.idle_timeout, Duration::from_secs(30));
    }
}
