//! Game commands - create, join, move, show, finish and delete games.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use console::{Style, style};

use gambit_client::GameState;

use super::Context;

/// Arguments for the create command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Your player key (1-20 characters)
    #[arg(short, long, env = "GAMBIT_PLAYER")]
    pub player: String,

    /// Chess variant: Standard, Horde, Horsies, Kawns or Chess960(<seed>)
    #[arg(long, default_value = "Standard")]
    pub variant: String,
}

/// Arguments for the join command.
#[derive(Args, Debug)]
pub struct JoinArgs {
    /// Game key shared by the host
    pub game_key: String,

    /// Your player key (1-20 characters)
    #[arg(short, long, env = "GAMBIT_PLAYER")]
    pub player: String,
}

/// Arguments for the move command.
#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Game key
    pub game_key: String,

    /// Move text, e.g. e2e4
    #[arg(value_name = "MOVE")]
    pub mv: String,

    /// Your player key; when set the server checks you are in the game
    #[arg(short, long, env = "GAMBIT_PLAYER")]
    pub player: Option<String>,
}

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Game key
    pub game_key: String,

    /// Keep polling and print new moves until the game completes
    #[arg(short, long)]
    pub watch: bool,

    /// Seconds between polls when watching
    #[arg(long, default_value = "2")]
    pub interval: u64,
}

/// Arguments for the finish command.
#[derive(Args, Debug)]
pub struct FinishArgs {
    /// Game key
    pub game_key: String,

    /// Your player key; when set the server checks you are in the game
    #[arg(short, long, env = "GAMBIT_PLAYER")]
    pub player: Option<String>,
}

/// Arguments for the delete command.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Game key
    pub game_key: String,
}

/// Run the create command.
pub async fn create(args: CreateArgs, ctx: &Context) -> Result<()> {
    let created = ctx.client()?.games().create(&args.player, &args.variant).await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        let green = Style::new().green();
        let dim = Style::new().dim();
        println!(
            "{} Game created: {}",
            green.apply_to("✓"),
            style(&created.game_key).bold()
        );
        println!(
            "  {}",
            dim.apply_to(format!(
                "Share the key; your opponent runs: gambit join {} --player <name>",
                created.game_key
            ))
        );
    }

    Ok(())
}

/// Run the join command.
pub async fn join(args: JoinArgs, ctx: &Context) -> Result<()> {
    let joined = ctx.client()?.games().join(&args.game_key, &args.player).await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&joined)?);
    } else {
        let green = Style::new().green();
        let dim = Style::new().dim();
        println!(
            "{} Joined {} as {}",
            green.apply_to("✓"),
            style(&joined.game_key).bold(),
            style(joined.team).bold()
        );
        println!("  {} {}", dim.apply_to("Host plays:"), joined.host_team);
        println!("  {} {}", dim.apply_to("Variant:"), joined.chess_variant);
    }

    Ok(())
}

/// Run the move command.
pub async fn submit_move(args: MoveArgs, ctx: &Context) -> Result<()> {
    let ack = ctx
        .client()?
        .games()
        .submit_move(&args.game_key, &args.mv, args.player.as_deref())
        .await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&ack)?);
    } else {
        let green = Style::new().green();
        println!("{} Played {}", green.apply_to("✓"), style(&args.mv).bold());
    }

    Ok(())
}

/// Run the show command.
pub async fn show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let state = client.games().poll(&args.game_key).await?;

    if ctx.json_output && !args.watch {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    if !ctx.json_output {
        print_state(&args.game_key, &state);
    }
    if !args.watch {
        return Ok(());
    }

    let interval = Duration::from_secs(args.interval.max(1));
    let mut seen = state.moves.len();
    let mut complete = state.game_complete;

    while !complete {
        tokio::time::sleep(interval).await;
        let state = client.games().poll(&args.game_key).await?;

        for (index, mv) in state.moves.iter().enumerate().skip(seen) {
            if ctx.json_output {
                println!("{}", serde_json::json!({ "index": index, "move": mv }));
            } else {
                println!("  {:>3}. {}", index + 1, mv);
            }
        }
        seen = state.moves.len();
        complete = state.game_complete;
    }

    if !ctx.json_output {
        println!();
        println!("{}", style("Game complete").bold());
    }

    Ok(())
}

/// Run the finish command.
pub async fn finish(args: FinishArgs, ctx: &Context) -> Result<()> {
    let ack = ctx
        .client()?
        .games()
        .finish(&args.game_key, args.player.as_deref())
        .await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&ack)?);
    } else {
        let green = Style::new().green();
        println!("{} Game {} finished", green.apply_to("✓"), args.game_key);
    }

    Ok(())
}

/// Run the delete command.
pub async fn delete(args: DeleteArgs, ctx: &Context) -> Result<()> {
    let ack = ctx.client()?.games().delete(&args.game_key).await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&ack)?);
    } else {
        let green = Style::new().green();
        println!("{} Game {} deleted", green.apply_to("✓"), args.game_key);
    }

    Ok(())
}

fn print_state(game_key: &str, state: &GameState) {
    let dim = Style::new().dim();
    let green = Style::new().green();
    let yellow = Style::new().yellow();

    println!();
    println!("{} {}", style("Game").bold(), style(game_key).bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("  {} {}", dim.apply_to("Host plays:"), state.host_team);
    println!(
        "  {} {}",
        dim.apply_to("Players:"),
        if state.game_ready {
            green.apply_to("both seated")
        } else {
            yellow.apply_to("waiting for opponent")
        }
    );
    println!(
        "  {} {}",
        dim.apply_to("Status:"),
        if state.game_complete {
            "complete"
        } else {
            "in progress"
        }
    );
    println!();

    if state.moves.is_empty() {
        println!("  {}", dim.apply_to("No moves yet"));
    } else {
        for (index, mv) in state.moves.iter().enumerate() {
            println!("  {:>3}. {}", index + 1, mv);
        }
    }
    println!();
}
