//! Error types for session store operations.
//!
//! Display strings double as the wire messages returned to clients, so
//! they are short, lowercase and stable.

use crate::validation::ValidationError;

/// Broad category of a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed caller input.
    Validation,
    /// The session key does not resolve to a live session.
    NotFound,
    /// A structural limit was hit.
    Capacity,
    /// The operation is invalid for the session's lifecycle state.
    State,
}

/// Error type for session store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Caller input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No live session has this key.
    #[error("game not found")]
    NotFound(String),

    /// The live-session ceiling has been reached.
    #[error("too many active games")]
    TooManySessions,

    /// Both seats are taken.
    #[error("game already full")]
    SessionFull,

    /// The session holds the maximum number of moves.
    #[error("max moves hit")]
    MoveLimit,

    /// No unused key could be generated.
    #[error("could not allocate a game key")]
    KeyExhausted,

    /// The session has been marked over.
    #[error("game already over")]
    GameOver,

    /// The player key already holds a seat in this session.
    #[error("player already joined")]
    AlreadyJoined,

    /// The player key does not hold a seat in this session.
    #[error("player not in game")]
    NotParticipant,
}

impl SessionError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::TooManySessions | Self::SessionFull | Self::MoveLimit | Self::KeyExhausted => {
                ErrorKind::Capacity
            }
            Self::GameOver | Self::AlreadyJoined | Self::NotParticipant => ErrorKind::State,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            SessionError::from(ValidationError::InvalidPlayerKey).kind(),
            ErrorKind::Validation
        );
        assert_eq!(SessionError::NotFound("abc".into()).kind(), ErrorKind::NotFound);
        assert_eq!(SessionError::TooManySessions.kind(), ErrorKind::Capacity);
        assert_eq!(SessionError::SessionFull.kind(), ErrorKind::Capacity);
        assert_eq!(SessionError::MoveLimit.kind(), ErrorKind::Capacity);
        assert_eq!(SessionError::GameOver.kind(), ErrorKind::State);
        assert_eq!(SessionError::NotParticipant.kind(), ErrorKind::State);
    }

    #[test]
    fn test_wire_messages() {
        assert_eq!(SessionError::NotFound("abc".into()).to_string(), "game not found");
        assert_eq!(SessionError::SessionFull.to_string(), "game already full");
        assert_eq!(
            SessionError::from(ValidationError::MoveTooLong { len: 21 }).to_string(),
            "move too long"
        );
    }
}
