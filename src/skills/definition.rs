//! Skill definitions - static catalog data.
//!
//! A `Skill` is an immutable catalog entry: which effect it triggers, the
//! parameters for that effect, how rare it is, what it costs and how its
//! numbers grow with the caster's level. The engine never mutates one.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::effect_type::{EffectTag, EffectType};
use super::params::{EffectParams, ParamValue};

/// Unique identifier for a catalog skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub u32);

impl SkillId {
    /// Create a new skill ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for SkillId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skill({})", self.0)
    }
}

/// Skill rarity tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Legendary,
}

/// Static skill definition.
///
/// ## Example
///
/// ```
/// use caro_skills::skills::{EffectType, Rarity, Skill, SkillId};
///
/// let bomb = Skill::new(SkillId::new(7), EffectType::BombArea)
///     .with_name("Bomb")
///     .with_rarity(Rarity::Rare)
///     .with_mana_cost(4)
///     .with_param("radius", 1)
///     .with_level_scaling(3, 2.0);
///
/// assert_eq!(bomb.scaled_params(3).int("radius", 0), 2);
/// assert_eq!(bomb.scaled_params(1).int("radius", 0), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,

    #[serde(default)]
    pub name: String,

    /// Effect tag; unknown tags survive loading and fail at dispatch.
    #[serde(rename = "effect_type")]
    pub effect: EffectTag,

    #[serde(default, rename = "effect_params")]
    pub params: EffectParams,

    #[serde(default)]
    pub rarity: Rarity,

    #[serde(default)]
    pub mana_cost: u32,

    #[serde(default)]
    pub cooldown: u32,

    /// Per-level multiplier applied to numeric parameters.
    #[serde(default)]
    pub level_scaling: FxHashMap<u32, f64>,
}

impl Skill {
    /// Create a skill with default rarity, no cost and no parameters.
    #[must_use]
    pub fn new(id: SkillId, effect: impl Into<EffectTag>) -> Self {
        Self {
            id,
            name: String::new(),
            effect: effect.into(),
            params: EffectParams::default(),
            rarity: Rarity::Common,
            mana_cost: 0,
            cooldown: 0,
            level_scaling: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_mana_cost(mut self, cost: u32) -> Self {
        self.mana_cost = cost;
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Add an effect parameter (builder pattern).
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Set the multiplier used at a given level.
    #[must_use]
    pub fn with_level_scaling(mut self, level: u32, factor: f64) -> Self {
        self.level_scaling.insert(level, factor);
        self
    }

    /// The known effect type, or `None` if the catalog tag is unrecognised.
    #[must_use]
    pub fn effect_type(&self) -> Option<EffectType> {
        self.effect.known()
    }

    /// Multiplier for a level; unknown levels use 1.0.
    #[must_use]
    pub fn scaling_factor(&self, level: u32) -> f64 {
        self.level_scaling.get(&level).copied().unwrap_or(1.0)
    }

    /// Parameters with numeric values multiplied by the level factor.
    #[must_use]
    pub fn scaled_params(&self, level: u32) -> EffectParams {
        self.params.scaled(self.scaling_factor(level))
    }
}
