//! Response types for the Gambit relay API.
//!
//! These types mirror the server's API contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    White,
    Black,
}

impl Team {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::White => f.write_str("white"),
            Team::Black => f.write_str("black"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Games
// ─────────────────────────────────────────────────────────────────────────────

/// Response to creating a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameResponse {
    /// Key the second player joins with.
    pub game_key: String,
}

/// Response to joining a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinGameResponse {
    pub game_key: String,
    /// Team assigned to the joiner.
    pub team: Team,
    pub host_team: Team,
    /// Legacy duplicate of `host_team`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<Team>,
    /// Variant name, e.g. `Standard` or `Chess960(518)`.
    pub chess_variant: String,
}

/// Polled state of a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Every accepted move in order.
    pub moves: Vec<String>,
    /// Both seats are filled.
    pub game_ready: bool,
    pub host_team: Team,
    /// The game was finished or reached the move cap.
    pub game_complete: bool,
}

/// Acknowledgement for move, finish and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Health
// ─────────────────────────────────────────────────────────────────────────────

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status (`ok` when serving).
    pub status: String,
    /// Server version.
    #[serde(default)]
    pub version: Option<String>,
    /// Live game sessions.
    #[serde(default)]
    pub active_games: Option<usize>,
}
