//! HTTP client SDK for the Gambit chess relay.
//!
//! This crate provides a typed client for the relay's game routes.
//!
//! # Example
//!
//! ```no_run
//! use gambit_client::{GambitClient, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = GambitClient::builder()
//!     .base_url("http://localhost:8543")
//!     .build()?;
//!
//! if client.health().is_healthy().await {
//!     println!("Relay is up");
//! }
//!
//! let game = client.games().create("alice", "Standard").await?;
//! let joined = client.games().join(&game.game_key, "bob").await?;
//! println!("bob plays {}", joined.team);
//!
//! client.games().submit_move(&game.game_key, "e2e4", Some("alice")).await?;
//! let state = client.games().poll(&game.game_key).await?;
//! println!("{} moves", state.moves.len());
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Games**: create, join, move, finish, poll, delete
//! - **Health**: server health checks

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, GambitClient};
pub use error::{Error, Result};
pub use types::*;
