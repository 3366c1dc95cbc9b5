//! The session record and its lifecycle transitions.

use serde::Serialize;
use tokio::time::Instant;

use crate::error::{Result, SessionError};
use crate::types::{ChessVariant, SessionKey, Team};

/// A player holding a seat in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    /// Caller-supplied opaque key identifying the player.
    pub player_key: String,
    /// Side the player was assigned.
    pub team: Team,
}

/// Coordination record for one game between two remote players.
///
/// The host seat is filled at creation and the guest seat at most once
/// afterwards, so a session always has one or two participants.
#[derive(Debug, Clone)]
pub struct Session {
    key: SessionKey,
    moves: Vec<String>,
    is_over: bool,
    created_at: Instant,
    last_activity_at: Instant,
    host: Participant,
    guest: Option<Participant>,
    variant: ChessVariant,
}

impl Session {
    /// Create a waiting session with only the host seated.
    pub fn new(
        key: SessionKey,
        host_key: impl Into<String>,
        host_team: Team,
        variant: ChessVariant,
        now: Instant,
    ) -> Self {
        Self {
            key,
            moves: Vec::new(),
            is_over: false,
            created_at: now,
            last_activity_at: now,
            host: Participant {
                player_key: host_key.into(),
                team: host_team,
            },
            guest: None,
            variant,
        }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Moves in the order they were accepted.
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Time of the last accepted move (creation time if none).
    pub fn last_activity_at(&self) -> Instant {
        self.last_activity_at
    }

    pub fn host(&self) -> &Participant {
        &self.host
    }

    pub fn guest(&self) -> Option<&Participant> {
        self.guest.as_ref()
    }

    pub fn host_key(&self) -> &str {
        &self.host.player_key
    }

    pub fn host_team(&self) -> Team {
        self.host.team
    }

    pub fn variant(&self) -> ChessVariant {
        self.variant
    }

    /// All seated participants, host first.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        std::iter::once(&self.host).chain(self.guest.iter())
    }

    pub fn participant_count(&self) -> usize {
        1 + usize::from(self.guest.is_some())
    }

    /// Team of the given player, if they hold a seat.
    pub fn team_of(&self, player_key: &str) -> Option<Team> {
        self.participants()
            .find(|p| p.player_key == player_key)
            .map(|p| p.team)
    }

    /// Both seats are filled.
    pub fn is_ready(&self) -> bool {
        self.guest.is_some()
    }

    /// Over by explicit signal, or by reaching the move cap.
    pub fn is_complete(&self, max_moves: usize) -> bool {
        self.is_over || self.moves.len() >= max_moves
    }

    /// Seat a second player on the side opposite the host.
    pub(crate) fn seat_guest(&mut self, player_key: &str) -> Result<Team> {
        if self.guest.is_some() {
            return Err(SessionError::SessionFull);
        }
        if self.host.player_key == player_key {
            return Err(SessionError::AlreadyJoined);
        }

        let team = self.host.team.opponent();
        self.guest = Some(Participant {
            player_key: player_key.to_string(),
            team,
        });
        Ok(team)
    }

    /// Append a move and refresh the activity timestamp.
    pub(crate) fn push_move(&mut self, mv: String, max_moves: usize, now: Instant) -> Result<()> {
        if self.is_over {
            return Err(SessionError::GameOver);
        }
        if self.moves.len() >= max_moves {
            return Err(SessionError::MoveLimit);
        }

        self.moves.push(mv);
        self.last_activity_at = now;
        Ok(())
    }

    /// Mark the game over. Returns `false` if it already was.
    pub(crate) fn finish(&mut self) -> bool {
        !std::mem::replace(&mut self.is_over, true)
    }

    /// Read-only copy of the state clients poll for.
    pub fn snapshot(&self, max_moves: usize) -> GameSnapshot {
        GameSnapshot {
            key: self.key.clone(),
            moves: self.moves.clone(),
            ready: self.is_ready(),
            host_team: self.host.team,
            complete: self.is_complete(max_moves),
            variant: self.variant,
        }
    }
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub key: SessionKey,
    pub moves: Vec<String>,
    /// Both seats are filled.
    pub ready: bool,
    pub host_team: Team,
    /// The game is over or has reached the move cap.
    pub complete: bool,
    pub variant: ChessVariant,
}

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinOutcome {
    pub key: SessionKey,
    /// Side assigned to the joining player.
    pub team: Team,
    pub host_team: Team,
    pub variant: ChessVariant,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_session() -> Session {
        Session::new(
            SessionKey::from("abcdef"),
            "host",
            Team::Black,
            ChessVariant::Horde,
            Instant::now(),
        )
    }

    #[test]
    fn test_new_session_is_waiting() {
        let session = new_session();
        assert_eq!(session.participant_count(), 1);
        assert!(!session.is_ready());
        assert!(!session.is_over());
        assert!(session.moves().is_empty());
        assert_eq!(session.team_of("host"), Some(Team::Black));
    }

    #[test]
    fn test_guest_gets_opposite_team() {
        let mut session = new_session();
        assert_eq!(session.seat_guest("guest").unwrap(), Team::White);
        assert!(session.is_ready());
        assert_eq!(session.participant_count(), 2);
        assert_eq!(session.team_of("guest"), Some(Team::White));
    }

    #[test]
    fn test_third_player_is_refused() {
        let mut session = new_session();
        session.seat_guest("guest").unwrap();

        assert_eq!(session.seat_guest("third"), Err(SessionError::SessionFull));
        assert_eq!(session.participant_count(), 2);
        assert_eq!(session.team_of("third"), None);
    }

    #[test]
    fn test_host_cannot_take_guest_seat() {
        let mut session = new_session();
        assert_eq!(session.seat_guest("host"), Err(SessionError::AlreadyJoined));
        assert_eq!(session.participant_count(), 1);
        assert_eq!(session.host_team(), Team::Black);
    }

    #[test]
    fn test_push_move_respects_cap() {
        let mut session = new_session();
        let now = Instant::now();
        session.push_move("a".into(), 2, now).unwrap();
        session.push_move("b".into(), 2, now).unwrap();

        assert_eq!(
            session.push_move("c".into(), 2, now),
            Err(SessionError::MoveLimit)
        );
        assert_eq!(session.moves(), ["a", "b"]);
        assert!(session.is_complete(2));
    }

    #[test]
    fn test_finished_game_rejects_moves() {
        let mut session = new_session();
        assert!(session.finish());
        assert!(!session.finish());

        assert_eq!(
            session.push_move("e2e4".into(), 500, Instant::now()),
            Err(SessionError::GameOver)
        );
        assert!(session.moves().is_empty());
    }

    #[test]
    fn test_snapshot() {
        let mut session = new_session();
        session.seat_guest("guest").unwrap();
        session.push_move("e2e4".into(), 500, Instant::now()).unwrap();

        let snapshot = session.snapshot(500);
        assert_eq!(snapshot.moves, vec!["e2e4".to_string()]);
        assert!(snapshot.ready);
        assert_eq!(snapshot.host_team, Team::Black);
        assert!(!snapshot.complete);
        assert_eq!(snapshot.variant, ChessVariant::Horde);
    }
}
