//! API endpoint implementations.

mod games;
mod health;

pub use games::GamesApi;
pub use health::HealthApi;
