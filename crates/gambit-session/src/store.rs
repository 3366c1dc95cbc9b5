//! The authoritative session store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::config::StoreConfig;
use crate::error::{Result, SessionError};
use crate::key::{KeyGenerator, RandomKeyGenerator};
use crate::session::{GameSnapshot, JoinOutcome, Session};
use crate::types::{SessionKey, Team};
use crate::validation;

/// Attempts at drawing an unused key before giving up.
const MAX_KEY_ATTEMPTS: usize = 32;

/// Concurrent map of session key to session record.
///
/// Every operation takes the same exclusive lock for its whole duration,
/// so operations are totally ordered. The lock is synchronous and never
/// held across an `.await`.
///
/// Cloning is cheap and yields a handle to the same store.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionKey, Session>>>,
    keys: Arc<dyn KeyGenerator>,
    config: StoreConfig,
}

impl SessionStore {
    /// Create an empty store using random session keys.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_key_generator(config, RandomKeyGenerator)
    }

    /// Create an empty store with a custom key source.
    pub fn with_key_generator(config: StoreConfig, keys: impl KeyGenerator + 'static) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            keys: Arc::new(keys),
            config,
        }
    }

    /// Get the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Check if there are no live sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Check if a live session has this key.
    pub fn contains(&self, key: &str) -> bool {
        self.sessions.lock().contains_key(key)
    }

    /// Create a session hosted by `player_key` and return its key.
    ///
    /// The host is seated on a random side.
    pub fn create(&self, player_key: &str, variant: &str) -> Result<SessionKey> {
        validation::validate_player_key(player_key)?;
        let variant = validation::validate_variant(variant)?;

        let mut sessions = self.sessions.lock();
        if sessions.len() >= self.config.max_sessions {
            warn!(
                live = sessions.len(),
                max = self.config.max_sessions,
                "Refusing to create session: store at capacity"
            );
            return Err(SessionError::TooManySessions);
        }

        // Check-and-insert under the same lock so a live key is never reused.
        let key = (0..MAX_KEY_ATTEMPTS)
            .map(|_| self.keys.generate())
            .find(|candidate| !sessions.contains_key(candidate))
            .ok_or(SessionError::KeyExhausted)?;

        let host_team = Team::random();
        let session = Session::new(key.clone(), player_key, host_team, variant, Instant::now());
        sessions.insert(key.clone(), session);

        info!(
            game_key = %key,
            host_team = %host_team,
            variant = %variant,
            live = sessions.len(),
            "Session created"
        );

        Ok(key)
    }

    /// Seat a second player in the session.
    pub fn join(&self, key: &str, player_key: &str) -> Result<JoinOutcome> {
        validation::validate_player_key(player_key)?;

        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(key)
            .ok_or_else(|| SessionError::NotFound(key.to_string()))?;

        let team = session.seat_guest(player_key)?;

        info!(game_key = %key, team = %team, "Player joined session");

        Ok(JoinOutcome {
            key: session.key().clone(),
            team,
            host_team: session.host_team(),
            variant: session.variant(),
        })
    }

    /// Append a move to the session.
    ///
    /// When `player_key` is given it must belong to a seated participant.
    pub fn submit_move(&self, key: &str, mv: &str, player_key: Option<&str>) -> Result<()> {
        validation::validate_move(mv)?;

        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(key)
            .ok_or_else(|| SessionError::NotFound(key.to_string()))?;

        if let Some(player_key) = player_key
            && session.team_of(player_key).is_none()
        {
            return Err(SessionError::NotParticipant);
        }

        session.push_move(mv.to_string(), self.config.max_moves, Instant::now())?;

        trace!(game_key = %key, ply = session.moves().len(), "Move recorded");
        Ok(())
    }

    /// Mark the session over. Further moves are refused.
    ///
    /// Finishing an already finished session succeeds.
    pub fn finish(&self, key: &str, player_key: Option<&str>) -> Result<()> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(key)
            .ok_or_else(|| SessionError::NotFound(key.to_string()))?;

        if let Some(player_key) = player_key
            && session.team_of(player_key).is_none()
        {
            return Err(SessionError::NotParticipant);
        }

        if session.finish() {
            info!(game_key = %key, moves = session.moves().len(), "Session finished");
        }
        Ok(())
    }

    /// Snapshot of the session's moves and readiness.
    pub fn get(&self, key: &str) -> Result<GameSnapshot> {
        let sessions = self.sessions.lock();
        let session = sessions
            .get(key)
            .ok_or_else(|| SessionError::NotFound(key.to_string()))?;

        Ok(session.snapshot(self.config.max_moves))
    }

    /// Remove the session unconditionally.
    pub fn delete(&self, key: &str) -> Result<()> {
        let removed = self.sessions.lock().remove(key);

        match removed {
            Some(session) => {
                info!(game_key = %key, moves = session.moves().len(), "Session deleted");
                Ok(())
            }
            None => Err(SessionError::NotFound(key.to_string())),
        }
    }

    /// Remove every expired session. Returns the number removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Remove every session expired as of `now`.
    ///
    /// The lock is held for the whole scan.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let policy = self.config.expiry_policy();
        let mut sessions = self.sessions.lock();
        let before = sessions.len();

        sessions.retain(|key, session| match policy.check(session, now) {
            Some(reason) => {
                debug!(game_key = %key, reason = %reason, "Evicting expired session");
                false
            }
            None => true,
        });

        before - sessions.len()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("live", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
