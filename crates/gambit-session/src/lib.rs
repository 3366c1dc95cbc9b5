//! Game session store for the Gambit relay.
//!
//! This crate owns the shared state two remote chess clients use to
//! rendezvous and exchange moves:
//! - A [`SessionStore`] guarding every session behind a single mutex
//! - Admission control (live-session ceiling, move cap, seat limit)
//! - Short, typable session keys from a [`KeyGenerator`]
//! - An [`EvictionSweeper`] that reclaims idle and over-age sessions
//!
//! # Example
//!
//! ```rust,ignore
//! use gambit_session::{SessionStore, StoreConfig};
//!
//! let store = SessionStore::new(StoreConfig::default());
//! let key = store.create("alice", "Standard")?;
//! let joined = store.join(key.as_str(), "bob")?;
//! assert_eq!(joined.team, joined.host_team.opponent());
//! ```

mod config;
mod error;
mod expiry;
mod key;
mod session;
mod store;
mod sweeper;
mod types;
pub mod validation;

pub use config::{
    DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_AGE, DEFAULT_MAX_MOVES, DEFAULT_MAX_SESSIONS,
    DEFAULT_SWEEP_INTERVAL, StoreConfig,
};
pub use error::{ErrorKind, Result, SessionError};
pub use expiry::{ExpiryPolicy, ExpiryReason};
pub use key::{KEY_ALPHABET, KEY_LENGTH, KeyGenerator, RandomKeyGenerator};
pub use session::{GameSnapshot, JoinOutcome, Participant, Session};
pub use store::SessionStore;
pub use sweeper::EvictionSweeper;
pub use types::{ChessVariant, SessionKey, Team};
pub use validation::ValidationError;
