//! Value types shared by the store and the API layer.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::validation::{self, ValidationError};

/// Side a participant plays.
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

    /// Pick a side uniformly at random.
    pub fn random() -> Self {
        if rand::random::<bool>() {
            Team::White
        } else {
            Team::Black
        }
    }

    /// Wire name of the side.
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::White => "white",
            Team::Black => "black",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public identifier players type to address a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Wrap a key string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SessionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Rule set a session is played under.
///
/// Serialized as its display string, e.g. `"Standard"` or `"Chess960(42)"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChessVariant {
    #[default]
    Standard,
    /// Fischer random chess with the given layout seed.
    Chess960(u64),
    Horde,
    Horsies,
    Kawns,
}

impl fmt::Display for ChessVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChessVariant::Standard => f.write_str("Standard"),
            ChessVariant::Chess960(seed) => write!(f, "Chess960({seed})"),
            ChessVariant::Horde => f.write_str("Horde"),
            ChessVariant::Horsies => f.write_str("Horsies"),
            ChessVariant::Kawns => f.write_str("Kawns"),
        }
    }
}

impl FromStr for ChessVariant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validation::validate_variant(s)
    }
}

impl Serialize for ChessVariant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChessVariant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
