//! API routes.

pub mod games;
pub mod health;

pub use games::{
    CreateGameQuery, CreateGameResponse, FinishQuery, GameStateResponse, JoinGameQuery,
    JoinGameResponse, MoveQuery, StatusResponse, create_game_handler, delete_game_handler,
    finish_game_handler, game_routes, get_game_handler, join_game_handler, submit_move_handler,
};
pub use health::{HealthResponse, health_routes};
