//! Per-match effect state.
//!
//! - `MatchSkillState`: turn counter, mana balances, active effects
//! - `SkillStateStore`: load/save of whole snapshots with a version check
//! - `EffectStateManager`: tick, effect registration, mana and queries
//!
//! The store only guards against lost updates. Callers still need to
//! serialize turn processing per match; a `StaleSnapshot` error means
//! another writer won and the turn should be retried from a fresh load.

mod manager;
mod snapshot;
mod store;

pub use manager::{EffectStateManager, Modifiers, TickOutcome};
pub use snapshot::MatchSkillState;
pub use store::{JsonFileStore, MemoryStateStore, SkillStateStore};
