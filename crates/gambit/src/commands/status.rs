//! Status command - shows relay health.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;

use super::Context;

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Status response for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    running: bool,
    version: Option<String>,
    active_games: Option<usize>,
    server_url: String,
}

/// Run the status command.
pub async fn run(_args: StatusArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let dim = Style::new().dim();

    match client.health().check().await {
        Ok(health) => {
            if ctx.json_output {
                let output = StatusOutput {
                    running: true,
                    version: health.version,
                    active_games: health.active_games,
                    server_url: ctx.server_url.clone(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let green = Style::new().green();

                println!();
                println!("{}", style("Gambit Relay Status").bold());
                println!("{}", dim.apply_to("─".repeat(40)));
                println!();
                println!(
                    "  {} {}",
                    dim.apply_to("Status:"),
                    green.apply_to("● running")
                );
                if let Some(version) = &health.version {
                    println!("  {} {}", dim.apply_to("Version:"), version);
                }
                if let Some(active) = health.active_games {
                    println!("  {} {}", dim.apply_to("Active games:"), active);
                }
                println!("  {} {}", dim.apply_to("Server:"), ctx.server_url);
                println!();
            }
        }
        Err(e) => {
            if ctx.json_output {
                let output = StatusOutput {
                    running: false,
                    version: None,
                    active_games: None,
                    server_url: ctx.server_url.clone(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let red = Style::new().red();

                println!();
                println!("{}", style("Gambit Relay Status").bold());
                println!("{}", dim.apply_to("─".repeat(40)));
                println!();
                println!(
                    "  {} {}",
                    dim.apply_to("Status:"),
                    red.apply_to("● not running")
                );
                println!("  {} {}", dim.apply_to("Server:"), ctx.server_url);

                if ctx.verbose {
                    println!();
                    println!("  {} {}", dim.apply_to("Error:"), e);
                }

                println!();
                println!("  {}", dim.apply_to("Start the server with: gambit start"));
                println!();
            }
        }
    }

    Ok(())
}
