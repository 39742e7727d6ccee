//! Turn hand generation.
//!
//! ## Algorithm
//!
//! 1. Keep held skills that are still in the deck and playable, up to the
//!    hand size.
//! 2. Build the pool: every other playable deck skill.
//! 3. Remove `lock_count` pool skills chosen by the `"lock"` stream.
//! 4. Draw the missing slots:
//!    - with luck, expand the pool into a rarity-weighted multiset,
//!      shuffle it with the `"luck"` stream, take distinct ids in order and
//!      order the picks with the `"turn"` stream;
//!    - without luck, shuffle the pool with the `"turn"` stream and take a
//!      prefix.
//! 5. Fill any remaining slots from the leftover pool, then by cycling the
//!    unlocked playable skills, then from the deck minus cooldowns.
//!
//! Every stream is derived from `(match_seed, purpose, turn)`, so the hand
//! depends only on the request.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{match_seed, EngineConfig, GameRng};
use crate::skills::{Rarity, SkillCatalog, SkillId};

/// Inputs for one hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDrawRequest {
    /// Unlocked skills in deck order.
    pub deck: Vec<SkillId>,

    #[serde(default)]
    pub cooldown: Vec<SkillId>,

    pub turn: u32,

    pub match_seed: u64,

    /// Skills carried over from the previous hand.
    #[serde(default)]
    pub held: Vec<SkillId>,

    #[serde(default)]
    pub luck_stacks: u32,

    #[serde(default)]
    pub lock_count: u32,

    /// Skills erased by the opponent; treated like cooldowns.
    #[serde(default)]
    pub removed: Vec<SkillId>,
}

impl TurnDrawRequest {
    #[must_use]
    pub fn new(deck: impl IntoIterator<Item = SkillId>, turn: u32, match_seed: u64) -> Self {
        Self {
            deck: deck.into_iter().collect(),
            turn,
            match_seed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cooldown(mut self, ids: impl IntoIterator<Item = SkillId>) -> Self {
        self.cooldown = ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_held(mut self, ids: impl IntoIterator<Item = SkillId>) -> Self {
        self.held = ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_luck_stacks(mut self, stacks: u32) -> Self {
        self.luck_stacks = stacks;
        self
    }

    #[must_use]
    pub fn with_lock_count(mut self, count: u32) -> Self {
        self.lock_count = count;
        self
    }

    #[must_use]
    pub fn with_removed(mut self, ids: impl IntoIterator<Item = SkillId>) -> Self {
        self.removed = ids.into_iter().collect();
        self
    }
}

/// Deterministic hand generator.
///
/// ## Example
///
/// ```
/// use caro_skills::draw::{TurnDrawRequest, TurnSkillRandomizer};
/// use caro_skills::skills::{SkillId, SkillRegistry};
///
/// let randomizer = TurnSkillRandomizer::default();
/// let deck = (1..=8).map(SkillId::new);
/// let request = TurnDrawRequest::new(deck, 4, TurnSkillRandomizer::get_seed("match-1"))
///     .with_held([SkillId::new(2)]);
///
/// let hand = randomizer.generate_turn_skills(&request, &SkillRegistry::new());
/// assert_eq!(hand.len(), 3);
/// assert_eq!(hand[0], SkillId::new(2));
/// assert_eq!(hand, randomizer.generate_turn_skills(&request, &SkillRegistry::new()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TurnSkillRandomizer {
    config: EngineConfig,
}

impl TurnSkillRandomizer {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Stable per-match seed from the match identifier.
    #[must_use]
    pub fn get_seed(match_id: &str) -> u64 {
        match_seed(match_id)
    }

    /// Pick this turn's hand. Held skills come first, in their given order.
    ///
    /// `catalog` supplies rarities for the luck weighting; ids it does not
    /// know weigh as common.
    #[must_use]
    pub fn generate_turn_skills(&self, request: &TurnDrawRequest, catalog: &impl SkillCatalog) -> Vec<SkillId> {
        let size = self.config.hand_size;
        let on_cooldown: FxHashSet<SkillId> = request.cooldown.iter().copied().collect();
        let removed: FxHashSet<SkillId> = request.removed.iter().copied().collect();
        let playable = |id: &SkillId| !on_cooldown.contains(id) && !removed.contains(id);

        let deck = distinct(request.deck.iter().copied());
        let mut hand: Vec<SkillId> = distinct(
            request
                .held
                .iter()
                .copied()
                .filter(|id| deck.contains(id) && playable(id)),
        );
        hand.truncate(size);

        let mut pool: Vec<SkillId> = deck
            .iter()
            .copied()
            .filter(|id| playable(id) && !hand.contains(id))
            .collect();

        let locked = self.locked(&pool, request);
        pool.retain(|id| !locked.contains(id));

        let need = size - hand.len();
        let picks = if request.luck_stacks > 0 {
            self.lucky_picks(&pool, need, request, catalog)
        } else {
            let mut shuffled = pool.clone();
            GameRng::for_purpose(request.match_seed, "turn", request.turn).shuffle(&mut shuffled);
            shuffled.truncate(need);
            shuffled
        };
        hand.extend(picks);

        // Fallbacks for short pools.
        for &id in &pool {
            if hand.len() >= size {
                break;
            }
            if !hand.contains(&id) {
                hand.push(id);
            }
        }
        let available: Vec<SkillId> = deck
            .iter()
            .copied()
            .filter(|id| playable(id) && !locked.contains(id))
            .collect();
        if hand.len() < size && !available.is_empty() {
            let missing = size - hand.len();
            hand.extend(available.iter().copied().cycle().take(missing));
        }
        for &id in &deck {
            if hand.len() >= size {
                break;
            }
            if !on_cooldown.contains(&id) && !hand.contains(&id) {
                hand.push(id);
            }
        }

        debug!(
            turn = request.turn,
            luck = request.luck_stacks,
            locks = locked.len(),
            hand = ?hand,
            "turn skills generated"
        );
        hand
    }

    fn locked(&self, pool: &[SkillId], request: &TurnDrawRequest) -> Vec<SkillId> {
        if request.lock_count == 0 || pool.is_empty() {
            return Vec::new();
        }
        let mut order = pool.to_vec();
        GameRng::for_purpose(request.match_seed, "lock", request.turn).shuffle(&mut order);
        order.truncate(request.lock_count as usize);
        order
    }

    fn lucky_picks(
        &self,
        pool: &[SkillId],
        need: usize,
        request: &TurnDrawRequest,
        catalog: &impl SkillCatalog,
    ) -> Vec<SkillId> {
        let rarities: FxHashMap<SkillId, Rarity> = catalog
            .get_skills_by_ids(pool)
            .into_iter()
            .map(|skill| (skill.id, skill.rarity))
            .collect();

        let mut weighted = Vec::new();
        for &id in pool {
            let rarity = rarities.get(&id).copied().unwrap_or_default();
            let copies = self.config.luck.weight(rarity, request.luck_stacks);
            weighted.extend(std::iter::repeat(id).take(copies as usize));
        }
        GameRng::for_purpose(request.match_seed, "luck", request.turn).shuffle(&mut weighted);

        let mut picks = Vec::with_capacity(need);
        for id in weighted {
            if picks.len() >= need {
                break;
            }
            if !picks.contains(&id) {
                picks.push(id);
            }
        }
        GameRng::for_purpose(request.match_seed, "turn", request.turn).shuffle(&mut picks);
        picks
    }
}

fn distinct(ids: impl IntoIterator<Item = SkillId>) -> Vec<SkillId> {
    let mut seen = FxHashSet::default();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
