//! Game relay endpoints.
//!
//! Every parameter arrives in the query string, matching what the game
//! client sends. Missing parameters are treated as empty strings so the
//! store's validation decides the outcome.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use gambit_session::{ChessVariant, Team};

use crate::error::ServerError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

/// Query for `POST /create`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGameQuery {
    #[serde(default)]
    pub player_key: String,
    #[serde(default)]
    pub chess_variant: String,
}

/// Query for `POST /join/{game_key}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoinGameQuery {
    #[serde(default)]
    pub player_key: String,
}

/// Query for `POST /move/{game_key}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoveQuery {
    #[serde(default, rename = "move")]
    pub mv: String,
    pub player_key: Option<String>,
}

/// Query for `POST /finish/{game_key}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinishQuery {
    pub player_key: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// Response for a created game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameResponse {
    pub game_key: String,
}

/// Response for a successful join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinGameResponse {
    pub game_key: String,
    /// Team assigned to the joiner.
    pub team: Team,
    pub host_team: Team,
    /// Same as `host_team`; older clients read this field.
    pub host: Team,
    pub chess_variant: ChessVariant,
}

/// Polled game state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateResponse {
    pub moves: Vec<String>,
    pub game_ready: bool,
    pub host_team: Team,
    pub game_complete: bool,
}

/// Acknowledgement for mutations with no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /create - Start a new game hosted by `player_key`.
pub async fn create_game_handler(
    State(state): State<AppState>,
    Query(query): Query<CreateGameQuery>,
) -> Result<Json<CreateGameResponse>, ServerError> {
    let key = state
        .settle(state.store.create(&query.player_key, &query.chess_variant))
        .await?;

    Ok(Json(CreateGameResponse {
        game_key: key.to_string(),
    }))
}

/// POST /join/{game_key} - Take the second seat of a game.
pub async fn join_game_handler(
    State(state): State<AppState>,
    Path(game_key): Path<String>,
    Query(query): Query<JoinGameQuery>,
) -> Result<Json<JoinGameResponse>, ServerError> {
    let outcome = state
        .settle(state.store.join(&game_key, &query.player_key))
        .await?;

    Ok(Json(JoinGameResponse {
        game_key: outcome.key.to_string(),
        team: outcome.team,
        host_team: outcome.host_team,
        host: outcome.host_team,
        chess_variant: outcome.variant,
    }))
}

/// POST /move/{game_key} - Append a move to the game's log.
pub async fn submit_move_handler(
    State(state): State<AppState>,
    Path(game_key): Path<String>,
    Query(query): Query<MoveQuery>,
) -> Result<Json<StatusResponse>, ServerError> {
    state
        .settle(
            state
                .store
                .submit_move(&game_key, &query.mv, query.player_key.as_deref()),
        )
        .await?;

    Ok(Json(StatusResponse::ok()))
}

/// POST /finish/{game_key} - Mark the game as over.
pub async fn finish_game_handler(
    State(state): State<AppState>,
    Path(game_key): Path<String>,
    Query(query): Query<FinishQuery>,
) -> Result<Json<StatusResponse>, ServerError> {
    state
        .settle(state.store.finish(&game_key, query.player_key.as_deref()))
        .await?;

    Ok(Json(StatusResponse::ok()))
}

/// GET /game/{game_key} - Poll the game state.
pub async fn get_game_handler(
    State(state): State<AppState>,
    Path(game_key): Path<String>,
) -> Result<Json<GameStateResponse>, ServerError> {
    let snapshot = state.settle(state.store.get(&game_key)).await?;

    Ok(Json(GameStateResponse {
        moves: snapshot.moves,
        game_ready: snapshot.ready,
        host_team: snapshot.host_team,
        game_complete: snapshot.complete,
    }))
}

/// DELETE /game/{game_key} - Remove the game.
pub async fn delete_game_handler(
    State(state): State<AppState>,
    Path(game_key): Path<String>,
) -> Result<Json<StatusResponse>, ServerError> {
    state.settle(state.store.delete(&game_key)).await?;

    Ok(Json(StatusResponse::ok()))
}

/// Create the game routes, to be mounted under the route prefix.
pub fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_game_handler))
        .route("/join/{game_key}", post(join_game_handler))
        .route("/move/{game_key}", post(submit_move_handler))
        .route("/finish/{game_key}", post(finish_game_handler))
        .route(
            "/game/{game_key}",
            get(get_game_handler).delete(delete_game_handler),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
