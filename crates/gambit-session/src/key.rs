//! Session key generation.

use rand::Rng;

use crate::types::SessionKey;

/// Characters session keys are drawn from. Letters and digits that are
/// easily confused when read aloud or typed (`i l o p q 0 1 2 5 9`) are
/// left out.
pub const KEY_ALPHABET: &[u8] = b"abcdefghjkmnrstuvwxyz34678";

/// Length of every generated key.
pub const KEY_LENGTH: usize = 6;

/// Source of candidate session keys.
///
/// Generators need not guarantee uniqueness: the store re-rolls any key
/// that collides with a live session.
pub trait KeyGenerator: Send + Sync {
    /// Produce a candidate key.
    fn generate(&self) -> SessionKey;
}

/// Uniform random keys of [`KEY_LENGTH`] characters over [`KEY_ALPHABET`].
///
/// Not cryptographically secure. Keys are public rendezvous codes, not
/// credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> SessionKey {
        let mut rng = rand::rng();
        let key: String = (0..KEY_LENGTH)
            .map(|_| KEY_ALPHABET[rng.random_range(0..KEY_ALPHABET.len())] as char)
            .collect();
        SessionKey::new(key)
    }
}
