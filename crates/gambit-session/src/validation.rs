//! Input validation for player keys, variants and moves.
//!
//! Every check here is a pure function. The store runs them before taking
//! its lock so malformed input never contends with real traffic.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::ChessVariant;

/// Maximum length of a player key, in characters.
pub const MAX_PLAYER_KEY_LEN: usize = 20;

/// Maximum length of a move string, in characters.
pub const MAX_MOVE_LEN: usize = 20;

/// Named variants accepted verbatim.
pub const NAMED_VARIANTS: &[&str] = &["Standard", "Horde", "Horsies", "Kawns"];

static CHESS960_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Chess960\((\d{1,10})\)$").expect("Chess960 pattern is a valid regex")
});

/// Error type for input validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Player key is empty or longer than [`MAX_PLAYER_KEY_LEN`].
    #[error("invalid player key")]
    InvalidPlayerKey,

    /// Variant is neither a named variant nor `Chess960(<digits>)`.
    #[error("invalid chess variant")]
    InvalidVariant(String),

    /// Move string is longer than [`MAX_MOVE_LEN`].
    #[error("move too long")]
    MoveTooLong {
        /// Length of the rejected move, in characters.
        len: usize,
    },
}

/// Check a caller-supplied player key.
pub fn validate_player_key(player_key: &str) -> Result<(), ValidationError> {
    let len = player_key.chars().count();
    if len == 0 || len > MAX_PLAYER_KEY_LEN {
        return Err(ValidationError::InvalidPlayerKey);
    }
    Ok(())
}

/// Parse and check a variant name.
pub fn validate_variant(variant: &str) -> Result<ChessVariant, ValidationError> {
    if let Some(captures) = CHESS960_PATTERN.captures(variant) {
        // At most ten digits, so this always fits.
        return captures[1]
            .parse()
            .map(ChessVariant::Chess960)
            .map_err(|_| ValidationError::InvalidVariant(variant.to_string()));
    }

    match variant {
        "Standard" => Ok(ChessVariant::Standard),
        "Horde" => Ok(ChessVariant::Horde),
        "Horsies" => Ok(ChessVariant::Horsies),
        "Kawns" => Ok(ChessVariant::Kawns),
        _ => Err(ValidationError::InvalidVariant(variant.to_string())),
    }
}

/// Check a move string. Moves are opaque; only the length is enforced.
pub fn validate_move(mv: &str) -> Result<(), ValidationError> {
    let len = mv.chars().count();
    if len > MAX_MOVE_LEN {
        return Err(ValidationError::MoveTooLong { len });
    }
    Ok(())
}
