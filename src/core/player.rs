//! Player identification.
//!
//! Players are identified by the match service; the engine treats the id
//! as opaque and only compares it for equality. Board ownership is tracked
//! separately through [`Side`](super::Side).

use serde::{Deserialize, Serialize};

/// Opaque player identifier supplied by the match service.
///
/// Serialized transparently so it can key JSON maps (e.g. mana balances).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for PlayerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}
