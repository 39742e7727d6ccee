//! Error types.
//!
//! Two families:
//! - [`FailureKind`]: recoverable skill failures, carried as values inside
//!   a `SkillEffectResult` with `success = false`.
//! - [`EngineError`]: failures of state and persistence operations,
//!   returned as `Err`. Only the `Io`/`Serialization` variants come from
//!   outside the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a skill execution did not succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Skill id absent from the catalog (or its entry is malformed).
    NotFound,
    /// Targets, counts or cell contents do not satisfy the handler.
    InvalidInput,
    /// The catalog names an effect tag this engine does not know.
    UnknownEffect,
    /// The acting player is under an active silence.
    Silenced,
}

impl FailureKind {
    /// Stable code for client-side messages.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            FailureKind::NotFound => "skill_not_found",
            FailureKind::InvalidInput => "invalid_input",
            FailureKind::UnknownEffect => "unknown_effect_type",
            FailureKind::Silenced => "silenced",
        }
    }
}

/// Errors from state and persistence operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Balance is below the requested cost; state was not modified.
    #[error("insufficient mana: have {have}, need {need}")]
    InsufficientMana { have: u32, need: u32 },

    /// The stored snapshot moved on since this one was loaded.
    #[error("stale snapshot for match {match_id}: expected version {expected}, found {found}")]
    StaleSnapshot {
        match_id: String,
        expected: u64,
        found: u64,
    },

    #[error("persistence I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Stable code for client-side messages.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InsufficientMana { .. } => "insufficient_mana",
            EngineError::StaleSnapshot { .. } => "stale_snapshot",
            EngineError::Io(_) => "persistence_io",
            EngineError::Serialization(_) => "persistence_format",
        }
    }
}

/// Result alias for state and persistence operations.
pub type EngineResult<T> = Result<T, EngineError>;
