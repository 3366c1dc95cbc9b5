//! Games API.

use crate::client::GambitClient;
use crate::error::Result;
use crate::types::{CreateGameResponse, GameState, JoinGameResponse, StatusResponse};

/// Games API client.
pub struct GamesApi {
    client: GambitClient,
}

impl GamesApi {
    pub(crate) fn new(client: GambitClient) -> Self {
        Self { client }
    }

    /// Create a game hosted by `player_key`.
    pub async fn create(&self, player_key: &str, variant: &str) -> Result<CreateGameResponse> {
        self.client
            .post(
                &["create"],
                &[("player_key", player_key), ("chess_variant", variant)],
            )
            .await
    }

    /// Join a game as the second player.
    pub async fn join(&self, game_key: &str, player_key: &str) -> Result<JoinGameResponse> {
        self.client
            .post(&["join", game_key], &[("player_key", player_key)])
            .await
    }

    /// Submit a move. Pass `player_key` to have the server check membership.
    pub async fn submit_move(
        &self,
        game_key: &str,
        mv: &str,
        player_key: Option<&str>,
    ) -> Result<StatusResponse> {
        let mut query = vec![("move", mv)];
        if let Some(player_key) = player_key {
            query.push(("player_key", player_key));
        }
        self.client
            .post(&["move", game_key], &query)
            .await
    }

    /// Mark a game as over.
    pub async fn finish(&self, game_key: &str, player_key: Option<&str>) -> Result<StatusResponse> {
        let query: Vec<(&str, &str)> = player_key.map(|k| ("player_key", k)).into_iter().collect();
        self.client
            .post(&["finish", game_key], &query)
            .await
    }

    /// Fetch the current state of a game.
    pub async fn poll(&self, game_key: &str) -> Result<GameState> {
        self.client.get(&["game", game_key]).await
    }

    /// Delete a game.
    pub async fn delete(&self, game_key: &str) -> Result<StatusResponse> {
        self.client.delete(&["game", game_key]).await
    }
}
