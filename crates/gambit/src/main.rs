//! Gambit - relay server and CLI for two-player remote chess
//!
//! Main entry point for the Gambit CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::Style;

mod commands;

use commands::{games, start, status};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Gambit - relay server and CLI for two-player remote chess
#[derive(Parser)]
#[command(name = "gambit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Server URL (default: http://localhost:8543)
    #[arg(long, global = true, env = "GAMBIT_SERVER_URL")]
    pub server: Option<String>,

    /// Route prefix of the game routes (default: from config, else /uc2024)
    #[arg(long, global = true, env = "GAMBIT_ROUTE_PREFIX")]
    pub prefix: Option<String>,

    /// Path to config file (overrides default discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Gambit relay server
    Start(start::StartArgs),

    /// Show server status
    Status(status::StatusArgs),

    /// Create a new game and print its key
    Create(games::CreateArgs),

    /// Join a game as the second player
    Join(games::JoinArgs),

    /// Submit a move to a game
    Move(games::MoveArgs),

    /// Show a game's state
    Show(games::ShowArgs),

    /// Mark a game as over
    Finish(games::FinishArgs),

    /// Delete a game
    Delete(games::DeleteArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

/// Crates whose logs the console layer shows.
const LOG_TARGETS: &[&str] = &[
    "gambit",
    "gambit_server",
    "gambit_session",
    "gambit_config",
    "gambit_client",
];

/// Console filter directive.
///
/// `level` is either a bare level applied to the gambit crates or a full
/// filter directive used as-is.
fn console_filter(verbose: bool, level: &str) -> String {
    if verbose {
        return targets_at("debug", "info");
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    targets_at(level, "warn")
}

fn targets_at(level: &str, fallback: &str) -> String {
    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push(fallback.to_string());
    directives.join(",")
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = commands::load_config(cli.config.as_deref())?;
    let logging = loaded.config.logging_or_default();

    // Console layer on stderr, optional JSON layer in a daily log file
    let console_directive = console_filter(cli.verbose, &logging.level);
    let console_env = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&console_directive));

    let mut _guard = None;
    let file_layer = if logging.file {
        let log_dir = logging.dir.clone().unwrap_or_else(|| {
            gambit_config::xdg_config_dir()
                .map(|d| d.join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        });
        let file_appender = tracing_appender::rolling::daily(&log_dir, "gambit.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        _guard = Some(guard);
        Some(non_blocking)
    } else {
        None
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(console_env),
        )
        .with(file_layer.map(|writer| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(tracing_subscriber::EnvFilter::new(targets_at(
                    "trace", "info",
                )))
        }))
        .init();

    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }
    for source in loaded.loaded_from() {
        tracing::debug!(path = %source.display(), "Loaded config");
    }

    let server_section = loaded.config.server_or_default();

    // Create context for commands
    let ctx = commands::Context {
        server_url: cli
            .server
            .unwrap_or_else(|| format!("http://localhost:{}", server_section.port)),
        route_prefix: cli.prefix.unwrap_or(server_section.route_prefix),
        json_output: cli.json,
        verbose: cli.verbose,
        config: loaded.config,
    };

    // Dispatch to command handlers
    let result = match cli.command {
        Commands::Start(args) => start::run(args, &ctx).await,
        Commands::Status(args) => status::run(args, &ctx).await,
        Commands::Create(args) => games::create(args, &ctx).await,
        Commands::Join(args) => games::join(args, &ctx).await,
        Commands::Move(args) => games::submit_move(args, &ctx).await,
        Commands::Show(args) => games::show(args, &ctx).await,
        Commands::Finish(args) => games::finish(args, &ctx).await,
        Commands::Delete(args) => games::delete(args, &ctx).await,
    };

    if let Err(e) = result {
        let red = Style::new().red();
        eprintln!("{} {:#}", red.apply_to("Error:"), e);
        std::process::exit(1);
    }

    Ok(())
}
