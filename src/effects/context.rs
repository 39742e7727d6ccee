//! Per-invocation input to the dispatcher.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, PlayerId, Position, Side};
use crate::skills::SkillId;

use super::instance::{EffectInstance, Element};

/// Everything a handler may read about the acting player and the match.
///
/// Built by the caller for each `execute` call; the engine never mutates it.
///
/// ## Example
///
/// ```
/// use caro_skills::core::{PlayerId, Position, Side};
/// use caro_skills::effects::ResolutionContext;
///
/// let ctx = ResolutionContext::new(PlayerId::new(1), Side::X, PlayerId::new(2))
///     .with_target(Position::new(7, 7))
///     .with_last_enemy_move(Position::new(7, 8))
///     .with_level(2);
///
/// assert_eq!(ctx.opponent_side, Side::O);
/// assert_eq!(ctx.targets.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolutionContext {
    pub player: PlayerId,
    pub opponent: PlayerId,
    pub side: Side,
    pub opponent_side: Side,

    #[serde(default)]
    pub targets: Vec<Position>,

    /// The acting player's most recent placement.
    #[serde(default)]
    pub last_move: Option<Position>,

    /// The opponent's most recent placement.
    #[serde(default)]
    pub last_enemy_move: Option<Position>,

    #[serde(default = "default_level")]
    pub level: u32,

    /// Effects active in the match, as stored by the state manager.
    #[serde(default)]
    pub active_effects: Vec<EffectInstance>,

    #[serde(default)]
    pub luck_stacks: u32,

    #[serde(default)]
    pub direction: Option<Direction>,

    #[serde(default)]
    pub element: Option<Element>,

    /// Opponent skill named by erase/copy/freeze style effects.
    #[serde(default)]
    pub target_skill: Option<SkillId>,

    /// Skill the player gives up in exchange for a stronger effect.
    #[serde(default)]
    pub sacrifice: Option<SkillId>,

    #[serde(default = "default_turn")]
    pub turn: u32,

    #[serde(default)]
    pub match_seed: u64,
}

fn default_level() -> u32 {
    1
}

fn default_turn() -> u32 {
    1
}

impl ResolutionContext {
    /// Create a context for `player` playing `side` against `opponent`.
    #[must_use]
    pub fn new(player: PlayerId, side: Side, opponent: PlayerId) -> Self {
        Self {
            player,
            opponent,
            side,
            opponent_side: side.opponent(),
            targets: Vec::new(),
            last_move: None,
            last_enemy_move: None,
            level: default_level(),
            active_effects: Vec::new(),
            luck_stacks: 0,
            direction: None,
            element: None,
            target_skill: None,
            sacrifice: None,
            turn: default_turn(),
            match_seed: 0,
        }
    }

    #[must_use]
    pub fn with_target(mut self, pos: Position) -> Self {
        self.targets.push(pos);
        self
    }

    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Position>) -> Self {
        self.targets.extend(targets);
        self
    }

    #[must_use]
    pub fn with_last_move(mut self, pos: Position) -> Self {
        self.last_move = Some(pos);
        self
    }

    #[must_use]
    pub fn with_last_enemy_move(mut self, pos: Position) -> Self {
        self.last_enemy_move = Some(pos);
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_active_effects(mut self, effects: impl IntoIterator<Item = EffectInstance>) -> Self {
        self.active_effects = effects.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_luck_stacks(mut self, stacks: u32) -> Self {
        self.luck_stacks = stacks;
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    #[must_use]
    pub fn with_target_skill(mut self, skill: SkillId) -> Self {
        self.target_skill = Some(skill);
        self
    }

    #[must_use]
    pub fn with_sacrifice(mut self, skill: SkillId) -> Self {
        self.sacrifice = Some(skill);
        self
    }

    #[must_use]
    pub fn with_turn(mut self, turn: u32) -> Self {
        self.turn = turn;
        self
    }

    #[must_use]
    pub fn with_match_seed(mut self, seed: u64) -> Self {
        self.match_seed = seed;
        self
    }
}
