//! # caro-skills
//!
//! Server-authoritative skill and effect engine for Caro (Gomoku) combat
//! matches.
//!
//! ## Design Principles
//!
//! 1. **Values In, Values Out**: Boards, contexts and match snapshots are
//!    passed in and returned. The engine holds no per-match state of its
//!    own; the caller serializes access per match.
//!
//! 2. **Failures Are Results**: A bad target or an unknown skill yields a
//!    `SkillEffectResult` with `success = false`, never a panic. Only
//!    persistence and mana checks return `Err`.
//!
//! 3. **Reproducible Randomness**: Every random draw comes from a stream
//!    derived from `(match_seed, purpose, turn)`, so replaying a match
//!    reproduces its hands and chaos rolls exactly.
//!
//! ## Turn Flow
//!
//! 1. `TurnSkillRandomizer` offers a hand
//! 2. `SkillEngine::execute` runs the chosen skill; destructive changes
//!    pass through the `ConflictResolver`
//! 3. The caller commits the returned board and hands the new effects to
//!    `EffectStateManager::apply_effects`
//! 4. At the start of the next turn `EffectStateManager::tick` regenerates
//!    mana and counts effects down
//!
//! ## Modules
//!
//! - `core`: Board, players, RNG, configuration, errors
//! - `skills`: Catalog entries, effect types, parameters
//! - `effects`: Dispatcher, handlers, conflict resolution, queries
//! - `state`: Match snapshots, stores, the state manager
//! - `draw`: Turn hand generation

pub mod core;
pub mod draw;
pub mod effects;
pub mod skills;
pub mod state;

#[cfg(feature = "python")]
mod python;

// Re-export commonly used types
pub use crate::core::{
    BoardState, Cell, Direction, EngineConfig, EngineError, EngineResult, FailureKind, GameRng,
    PlayerId, Position, Side,
};

pub use crate::skills::{EffectParams, EffectType, Rarity, Skill, SkillCatalog, SkillId, SkillRegistry};

pub use crate::effects::{
    BoardChange, ChangeKind, ConflictResolver, EffectId, EffectInstance, EffectKind,
    ResolutionContext, SkillEffectResult, SkillEngine,
};

pub use crate::state::{
    EffectStateManager, JsonFileStore, MatchSkillState, MemoryStateStore, Modifiers,
    SkillStateStore, TickOutcome,
};

pub use crate::draw::{TurnDrawRequest, TurnSkillRandomizer};
