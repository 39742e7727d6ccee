//! Per-match skill state.
//!
//! `MatchSkillState` is a value: every manager operation takes a snapshot
//! and returns a new one. Effects live in an `im::Vector`, so the copies
//! made along the way share structure.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::effects::{EffectId, EffectInstance};

/// Turn counter, mana balances and active effects of one match.
///
/// ## Example
///
/// ```
/// use caro_skills::state::MatchSkillState;
///
/// let state: MatchSkillState = serde_json::from_str("{}").unwrap();
/// assert_eq!(state.turn, 1);
/// assert!(state.effects.is_empty());
/// assert_eq!(state, MatchSkillState::new());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSkillState {
    #[serde(default = "first_turn")]
    pub turn: u32,

    /// Recorded balances. Players without an entry hold the configured
    /// starting mana.
    #[serde(default)]
    pub mana: FxHashMap<PlayerId, u32>,

    /// Active effects in registration order.
    #[serde(default)]
    pub effects: Vector<EffectInstance>,

    #[serde(default)]
    pub next_effect_id: u64,

    /// Optimistic concurrency token; bumped by every successful save.
    #[serde(default)]
    pub version: u64,
}

fn first_turn() -> u32 {
    1
}

impl Default for MatchSkillState {
    fn default() -> Self {
        Self {
            turn: first_turn(),
            mana: FxHashMap::default(),
            effects: Vector::new(),
            next_effect_id: 0,
            version: 0,
        }
    }
}

impl MatchSkillState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored effect by id.
    #[must_use]
    pub fn effect(&self, id: EffectId) -> Option<&EffectInstance> {
        self.effects.iter().find(|e| e.id == Some(id))
    }

    /// The effect list as a plain `Vec`, for a `ResolutionContext`.
    #[must_use]
    pub fn active_effects(&self) -> Vec<EffectInstance> {
        self.effects.iter().cloned().collect()
    }

    /// Effects that apply to `player` (targeted at them, or owned and
    /// untargeted).
    pub fn effects_for(&self, player: PlayerId) -> impl Iterator<Item = &EffectInstance> {
        self.effects.iter().filter(move |e| e.applies_to(player))
    }

    pub(crate) fn allocate_id(&mut self) -> EffectId {
        let id = EffectId::new(self.next_effect_id);
        self.next_effect_id += 1;
        id
    }
}
