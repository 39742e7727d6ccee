//! Engine configuration.
//!
//! `EngineConfig` holds every policy constant the engine uses: mana
//! economy, hold costs, hand size, luck weighting and default effect
//! durations. Services build it in code with the `with_*` builders or load
//! it from JSON; every field has a default so partial documents work.
//!
//! The luck and chaos clamp bounds are policy, not derived values. Change
//! them here rather than inferring a different formula elsewhere.

use serde::{Deserialize, Serialize};

use crate::skills::Rarity;

/// Mana retained per held skill, by rarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldCosts {
    pub common: u32,
    pub rare: u32,
    pub legendary: u32,
}

impl Default for HoldCosts {
    fn default() -> Self {
        Self {
            common: 1,
            rare: 2,
            legendary: 3,
        }
    }
}

impl HoldCosts {
    /// Retention cost for one skill of the given rarity.
    #[must_use]
    pub fn for_rarity(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Legendary => self.legendary,
        }
    }
}

/// Rarity weighting applied when luck stacks bias the draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LuckWeights {
    pub rare_per_stack: u32,
    pub legendary_per_stack: u32,
    pub rare_max_weight: u32,
    pub legendary_max_weight: u32,
    pub max_luck_stacks: u32,
}

impl Default for LuckWeights {
    fn default() -> Self {
        Self {
            rare_per_stack: 1,
            legendary_per_stack: 2,
            rare_max_weight: 5,
            legendary_max_weight: 8,
            max_luck_stacks: 5,
        }
    }
}

impl LuckWeights {
    /// Copies of a skill placed in the biased multiset.
    ///
    /// Common skills always weigh 1; rare and legendary grow linearly with
    /// the (clamped) stack count up to their ceilings.
    #[must_use]
    pub fn weight(&self, rarity: Rarity, luck_stacks: u32) -> u32 {
        let stacks = luck_stacks.min(self.max_luck_stacks);
        match rarity {
            Rarity::Common => 1,
            Rarity::Rare => (1 + self.rare_per_stack * stacks).min(self.rare_max_weight),
            Rarity::Legendary => {
                (1 + self.legendary_per_stack * stacks).min(self.legendary_max_weight)
            }
        }
    }
}

/// Probability policy for `chaos_board` rolls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaosOdds {
    pub base_favorable: f64,
    pub per_stack: f64,
    pub min_favorable: f64,
    pub max_favorable: f64,
}

impl Default for ChaosOdds {
    fn default() -> Self {
        Self {
            base_favorable: 0.5,
            per_stack: 0.1,
            min_favorable: 0.5,
            max_favorable: 0.85,
        }
    }
}

impl ChaosOdds {
    /// Chance that one piece's roll favours the roller.
    ///
    /// Swapped bounds are reordered and a NaN bound is ignored; the result
    /// always lies in `[0, 1]`.
    #[must_use]
    pub fn favorable(&self, luck_stacks: u32) -> f64 {
        let low = self.min_favorable.min(self.max_favorable);
        let high = self.min_favorable.max(self.max_favorable);
        let raw = self.base_favorable + self.per_stack * f64::from(luck_stacks);
        let odds = raw.max(low).min(high);
        if odds.is_nan() {
            return Self::default().favorable(luck_stacks);
        }
        odds.clamp(0.0, 1.0)
    }
}

/// Default remaining-duration counters, in ticks.
///
/// One tick runs at the start of every player turn, so a counter of 2
/// covers the opponent's next turn and a counter of 3 reaches the owner's
/// next turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Durations {
    pub protection: u32,
    pub hazard: u32,
    pub status: u32,
    pub trap: u32,
    /// Effects aimed at the opponent's next turn (silence, skip, locks).
    pub control: u32,
    /// Effects that pay off on the owner's next turn.
    pub buff: u32,
    pub banish: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            protection: 2,
            hazard: 3,
            status: 3,
            trap: 3,
            control: 2,
            buff: 3,
            banish: 2,
        }
    }
}

/// Complete engine configuration.
///
/// ## Example
///
/// ```
/// use caro_skills::core::EngineConfig;
///
/// let config = EngineConfig::new().with_mana_cap(20).with_mana_regen(4);
/// assert_eq!(config.mana_cap, 20);
///
/// let loaded = EngineConfig::from_json_str(r#"{"mana_regen": 2}"#).unwrap();
/// assert_eq!(loaded.mana_regen, 2);
/// assert_eq!(loaded.mana_cap, 15);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on any player's mana balance.
    pub mana_cap: u32,

    /// Mana regenerated for the acting player on each tick.
    pub mana_regen: u32,

    /// Balance assumed for a player with no recorded mana.
    pub starting_mana: u32,

    /// Number of skills offered each turn.
    pub hand_size: usize,

    pub hold_costs: HoldCosts,
    pub luck: LuckWeights,
    pub chaos: ChaosOdds,
    pub durations: Durations,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mana_cap: 15,
            mana_regen: 3,
            starting_mana: 5,
            hand_size: 3,
            hold_costs: HoldCosts::default(),
            luck: LuckWeights::default(),
            chaos: ChaosOdds::default(),
            durations: Durations::default(),
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the mana ceiling.
    #[must_use]
    pub fn with_mana_cap(mut self, cap: u32) -> Self {
        self.mana_cap = cap;
        self
    }

    /// Set per-tick regeneration.
    #[must_use]
    pub fn with_mana_regen(mut self, regen: u32) -> Self {
        self.mana_regen = regen;
        self
    }

    /// Set the balance assumed for players with no recorded mana.
    #[must_use]
    pub fn with_starting_mana(mut self, mana: u32) -> Self {
        self.starting_mana = mana;
        self
    }

    /// Set the number of skills offered per turn.
    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    /// Replace the hold-cost table.
    #[must_use]
    pub fn with_hold_costs(mut self, costs: HoldCosts) -> Self {
        self.hold_costs = costs;
        self
    }

    /// Replace the luck weighting policy.
    #[must_use]
    pub fn with_luck_weights(mut self, luck: LuckWeights) -> Self {
        self.luck = luck;
        self
    }

    /// Replace the default duration table.
    #[must_use]
    pub fn with_durations(mut self, durations: Durations) -> Self {
        self.durations = durations;
        self
    }
}
