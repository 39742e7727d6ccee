//! Effect state manager: ticks, effect registration and mana.
//!
//! Every operation is a pure function from one `MatchSkillState` to the
//! next. Only [`EffectStateManager::load`], [`EffectStateManager::save`] and
//! [`EffectStateManager::tick`] touch the store.
//!
//! ## Tick order
//!
//! 1. Advance the turn counter
//! 2. Regenerate the acting player's mana (plus `mana_boost`), capped
//! 3. Count every timed effect down by one; expire those that reach zero
//! 4. Grow surviving status spreads and report active footprints

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{BoardState, Direction, EngineConfig, EngineError, EngineResult, PlayerId, Position};
use crate::effects::{query, BoardChange, ChangeKind, EffectId, EffectInstance, EffectKind};
use crate::skills::{Skill, SkillId};

use super::snapshot::MatchSkillState;
use super::store::SkillStateStore;

/// Draw modifiers derived from active effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub luck_stacks: u32,
    pub lock_count: u32,
}

/// The state after a tick and the notifications (and banish returns) it
/// produced. `changes` may contain `place` records the caller must commit
/// to the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub state: MatchSkillState,
    pub changes: Vec<BoardChange>,
}

/// Owns a snapshot store and the engine policy.
#[derive(Clone, Debug)]
pub struct EffectStateManager<S> {
    store: S,
    config: EngineConfig,
}

impl<S: SkillStateStore> EffectStateManager<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn load(&self, match_id: &str) -> EngineResult<MatchSkillState> {
        self.store.load(match_id)
    }

    pub fn save(&mut self, match_id: &str, state: &MatchSkillState) -> EngineResult<MatchSkillState> {
        self.store.save(match_id, state)
    }

    /// Load, tick for `player`, save.
    pub fn tick(&mut self, match_id: &str, player: PlayerId, board: &BoardState) -> EngineResult<TickOutcome> {
        let state = self.load(match_id)?;
        let outcome = self.tick_state(&state, player, board);
        let state = self.save(match_id, &outcome.state)?;
        Ok(TickOutcome {
            state,
            changes: outcome.changes,
        })
    }

    /// Advance `state` by one turn for `player`.
    #[must_use]
    pub fn tick_state(&self, state: &MatchSkillState, player: PlayerId, board: &BoardState) -> TickOutcome {
        let mut next = state.clone();
        next.turn = state.turn.saturating_add(1);

        let regen = self.config.mana_regen + query::mana_boost(&state.effects, player);
        let balance = self.mana_of(state, player).saturating_add(regen);
        next.mana.insert(player, balance.min(self.config.mana_cap));

        let mut changes = Vec::new();
        let mut survivors = Vector::new();
        for effect in &state.effects {
            let mut effect = effect.clone();
            if let Some(remaining) = effect.remaining {
                let left = remaining.saturating_sub(1);
                if left == 0 {
                    debug!(kind = ?effect.kind, id = ?effect.id, "effect expired");
                    changes.extend(expire(&effect, board));
                    continue;
                }
                effect.remaining = Some(left);
            }
            if effect.kind == EffectKind::StatusSpread {
                grow_status(&mut effect, board);
            }
            if let Some(notice) = active_notice(&effect) {
                changes.push(notice);
            }
            survivors.push_back(effect);
        }
        next.effects = survivors;

        TickOutcome { state: next, changes }
    }
}

impl<S> EffectStateManager<S> {
    /// Balance of `player`; unrecorded players hold the starting mana.
    #[must_use]
    pub fn mana_of(&self, state: &MatchSkillState, player: PlayerId) -> u32 {
        state
            .mana
            .get(&player)
            .copied()
            .unwrap_or(self.config.starting_mana)
            .min(self.config.mana_cap)
    }

    /// Add mana, capped at the ceiling.
    #[must_use]
    pub fn add_mana(&self, state: &MatchSkillState, player: PlayerId, amount: u32) -> MatchSkillState {
        let mut next = state.clone();
        let balance = self.mana_of(state, player).saturating_add(amount);
        next.mana.insert(player, balance.min(self.config.mana_cap));
        next
    }

    /// Spend mana. Fails without touching `state` if the balance is short.
    pub fn deduct_mana(&self, state: &MatchSkillState, player: PlayerId, cost: u32) -> EngineResult<MatchSkillState> {
        let have = self.mana_of(state, player);
        if have < cost {
            return Err(EngineError::InsufficientMana { have, need: cost });
        }
        let mut next = state.clone();
        next.mana.insert(player, have - cost);
        Ok(next)
    }

    /// Charge the retention cost of carried-over skills.
    pub fn apply_hold_cost(&self, state: &MatchSkillState, player: PlayerId, held: &[Skill]) -> EngineResult<MatchSkillState> {
        let cost: u32 = held
            .iter()
            .map(|skill| self.config.hold_costs.for_rarity(skill.rarity))
            .sum();
        self.deduct_mana(state, player, cost)
    }

    /// Luck and deck-lock levels applying to `player`.
    #[must_use]
    pub fn compute_modifiers(&self, state: &MatchSkillState, player: PlayerId) -> Modifiers {
        Modifiers {
            luck_stacks: query::luck_stacks(&state.effects, player),
            lock_count: query::lock_count(&state.effects, player),
        }
    }

    /// Merge effects produced by `owner`'s skill into the active list.
    ///
    /// Buffs are dropped while `owner` is under `block_future_buffs`.
    /// Instant kinds are processed here and never stored, as are markers
    /// with no remaining duration. Everything else gets a fresh id.
    #[must_use]
    pub fn apply_effects(
        &self,
        state: &MatchSkillState,
        effects: impl IntoIterator<Item = EffectInstance>,
        owner: PlayerId,
    ) -> MatchSkillState {
        let mut next = state.clone();
        for mut effect in effects {
            if effect.kind.is_buff() && query::are_buffs_blocked(&next.effects, owner) {
                debug!(kind = ?effect.kind, %owner, "buff dropped by block_future_buffs");
                continue;
            }
            match effect.kind {
                EffectKind::PurgeBuffs => {
                    let target = effect.beneficiary();
                    next.effects
                        .retain(|e| !(e.kind.is_buff() && e.applies_to(target)));
                }
                EffectKind::CleanseElement => {
                    if let Some(status) = effect.element().map(|element| element.status()) {
                        next.effects.retain(|e| {
                            !(e.kind == EffectKind::StatusSpread && e.status() == Some(status))
                        });
                    }
                }
                EffectKind::ManaGain => {
                    let amount = effect.params.count("amount", 0);
                    next = self.add_mana(&next, effect.beneficiary(), amount);
                }
                EffectKind::ManaDrain => {
                    let target = effect.beneficiary();
                    let have = self.mana_of(&next, target);
                    let drained = effect.params.count("amount", 0).min(have);
                    next.mana.insert(target, have - drained);
                }
                EffectKind::ManaSteal => {
                    let target = effect.beneficiary();
                    let have = self.mana_of(&next, target);
                    let drained = effect.params.count("amount", 0).min(have);
                    next.mana.insert(target, have - drained);
                    next = self.add_mana(&next, effect.owner, drained);
                }
                _ if effect.remaining == Some(0) => {}
                _ => {
                    let id = next.allocate_id();
                    effect.id = Some(id);
                    debug!(kind = ?effect.kind, ?id, remaining = ?effect.remaining, "effect registered");
                    next.effects.push_back(effect);
                }
            }
        }
        next
    }

    /// Drop effects by id, e.g. a trap that has fired.
    #[must_use]
    pub fn remove_effects(&self, state: &MatchSkillState, ids: &[EffectId]) -> MatchSkillState {
        let mut next = state.clone();
        next.effects
            .retain(|e| e.id.map_or(true, |id| !ids.contains(&id)));
        next
    }

    #[must_use]
    pub fn is_cell_protected(&self, state: &MatchSkillState, board: &BoardState, pos: Position) -> bool {
        query::is_cell_protected(&state.effects, board, pos)
    }

    #[must_use]
    pub fn is_cell_immobilized(&self, state: &MatchSkillState, board: &BoardState, pos: Position) -> bool {
        query::is_cell_immobilized(&state.effects, board, pos)
    }

    #[must_use]
    pub fn is_cell_burning(&self, state: &MatchSkillState, pos: Position) -> bool {
        query::is_cell_burning(&state.effects, pos)
    }

    #[must_use]
    pub fn get_removed_skills(&self, state: &MatchSkillState, player: PlayerId) -> Vec<SkillId> {
        query::get_removed_skills(&state.effects, player)
    }

    #[must_use]
    pub fn is_silenced(&self, state: &MatchSkillState, player: PlayerId) -> bool {
        query::is_silenced(&state.effects, player)
    }
}

fn expire_kind(kind: EffectKind) -> ChangeKind {
    match kind {
        EffectKind::StatusSpread | EffectKind::Immobilize => ChangeKind::StatusExpire,
        EffectKind::LuckBuff => ChangeKind::LuckExpire,
        EffectKind::TrapReflect => ChangeKind::TrapExpire,
        EffectKind::BurnArea | EffectKind::ZoneBlock => ChangeKind::HazardExpire,
        EffectKind::RedirectDamage => ChangeKind::ProtectExpire,
        kind if kind.is_protection() => ChangeKind::ProtectExpire,
        _ => ChangeKind::EffectExpire,
    }
}

/// The expiry notice, preceded by the piece's return for a banish.
fn expire(effect: &EffectInstance, board: &BoardState) -> Vec<BoardChange> {
    let mut changes = Vec::with_capacity(2);
    let origin = effect.positions.first().copied();
    if effect.kind == EffectKind::Banished {
        if let (Some(pos), Some(side)) = (origin, effect.target_side) {
            if board.is_empty(pos) {
                changes.push(BoardChange::place(pos, side).with_source(effect.id));
            }
        }
    }
    changes.push(
        BoardChange::notice(expire_kind(effect.kind), origin.or(effect.redirect_to))
            .with_source(effect.id)
            .with_effect(effect.kind)
            .with_footprint(effect.footprint()),
    );
    changes
}

/// Extend a status spread into one more adjacent piece of the afflicted side.
fn grow_status(effect: &mut EffectInstance, board: &BoardState) {
    let max_cells = effect.params.count("max_cells", 6) as usize;
    if effect.positions.len() >= max_cells {
        return;
    }
    let afflicted = |pos: Position| match effect.target_side {
        Some(side) => board.is_side(pos, side),
        None => board.side_at(pos).is_some(),
    };
    let next = effect.positions.iter().find_map(|&pos| {
        Direction::ORTHOGONAL
            .iter()
            .filter_map(|&d| pos.step(d))
            .find(|&p| !effect.positions.contains(&p) && afflicted(p))
    });
    if let Some(pos) = next {
        effect.positions.push(pos);
    }
}

/// Footprint report for a surviving effect. Traps stay hidden.
fn active_notice(effect: &EffectInstance) -> Option<BoardChange> {
    let kind = match effect.kind {
        EffectKind::TrapReflect => return None,
        EffectKind::StatusSpread | EffectKind::Immobilize => ChangeKind::StatusActive,
        EffectKind::BurnArea | EffectKind::ZoneBlock => ChangeKind::HazardActive,
        _ => ChangeKind::EffectActive,
    };
    let footprint = effect.footprint();
    if footprint.is_empty() {
        return None;
    }
    let mut notice = BoardChange::notice(kind, footprint.first().copied())
        .with_source(effect.id)
        .with_effect(effect.kind)
        .with_footprint(footprint);
    if let Some(status) = effect.status() {
        notice = notice.with_note(status.as_str());
    }
    Some(notice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Side;
    use crate::state::MemoryStateStore;

    const ALICE: PlayerId = PlayerId::new(1);
    const BOB: PlayerId = PlayerId::new(2);

    fn manager() -> EffectStateManager<MemoryStateStore> {
        EffectStateManager::new(MemoryStateStore::new())
    }

    #[test]
    fn test_mana_regen_capped() {
        let mgr = manager();
        let state = mgr.add_mana(&MatchSkillState::new(), ALICE, 10);
        assert_eq!(mgr.mana_of(&state, ALICE), 15);

        let outcome = mgr.tick_state(&state, ALICE, &BoardState::new());
        assert_eq!(mgr.mana_of(&outcome.state, ALICE), 15);
        assert_eq!(outcome.state.turn, 2);
    }

    #[test]
    fn test_mana_boost_adds_regen() {
        let mgr = manager();
        let boost = EffectInstance::new(EffectKind::ManaBoost, ALICE)
            .with_param("amount", 2)
            .with_remaining(3);
        let state = mgr.apply_effects(&MatchSkillState::new(), [boost], ALICE);

        let outcome = mgr.tick_state(&state, ALICE, &BoardState::new());
        assert_eq!(mgr.mana_of(&outcome.state, ALICE), 5 + 3 + 2);
    }

    #[test]
    fn test_insufficient_mana_leaves_state() {
        let mgr = manager();
        let state = mgr.deduct_mana(&MatchSkillState::new(), ALICE, 1).unwrap();
        assert_eq!(mgr.mana_of(&state, ALICE), 4);

        let err = mgr.deduct_mana(&state, ALICE, 5).unwrap_err();
        assert_eq!(err.code(), "insufficient_mana");
        assert_eq!(mgr.mana_of(&state, ALICE), 4);
    }

    #[test]
    fn test_hold_cost_by_rarity() {
        use crate::skills::{EffectType, Rarity};

        let mgr = manager();
        let held = [
            Skill::new(SkillId::new(1), EffectType::Silence).with_rarity(Rarity::Rare),
            Skill::new(SkillId::new(2), EffectType::ExtraTurn).with_rarity(Rarity::Legendary),
        ];
        let state = mgr.apply_hold_cost(&MatchSkillState::new(), ALICE, &held).unwrap();
        assert_eq!(mgr.mana_of(&state, ALICE), 0);

        let err = mgr.apply_hold_cost(&state, ALICE, &held[..1]).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientMana { have: 0, need: 2 }));
    }

    #[test]
    fn test_expiry_emits_once() {
        let mgr = manager();
        let shield = EffectInstance::new(EffectKind::ProtectPiece, ALICE)
            .with_positions([Position::new(1, 1)])
            .with_remaining(2);
        let state = mgr.apply_effects(&MatchSkillState::new(), [shield], ALICE);
        let board = BoardState::new();

        let first = mgr.tick_state(&state, BOB, &board);
        assert_eq!(first.state.effects[0].remaining, Some(1));
        assert!(first.changes.iter().all(|c| c.kind != ChangeKind::ProtectExpire));

        let second = mgr.tick_state(&first.state, ALICE, &board);
        assert!(second.state.effects.is_empty());
        assert_eq!(
            second.changes.iter().filter(|c| c.kind == ChangeKind::ProtectExpire).count(),
            1
        );
    }

    #[test]
    fn test_banished_piece_returns() {
        let mgr = manager();
        let pos = Position::new(6, 6);
        let banished = EffectInstance::new(EffectKind::Banished, ALICE)
            .with_positions([pos])
            .with_target_side(Side::O)
            .with_remaining(1);
        let state = mgr.apply_effects(&MatchSkillState::new(), [banished], ALICE);

        let outcome = mgr.tick_state(&state, BOB, &BoardState::new());
        assert_eq!(outcome.changes[0], BoardChange::place(pos, Side::O).with_source(Some(EffectId::new(0))));
        assert_eq!(outcome.changes[1].kind, ChangeKind::EffectExpire);
    }

    #[test]
    fn test_status_grows_one_cell() {
        let mgr = manager();
        let board = BoardState::with_pieces([
            (Position::new(5, 5), Side::O),
            (Position::new(6, 5), Side::O),
            (Position::new(7, 5), Side::O),
        ]);
        let burn = EffectInstance::new(EffectKind::StatusSpread, ALICE)
            .with_positions([Position::new(5, 5)])
            .with_target_side(Side::O)
            .with_param("status", "burn")
            .with_param("max_cells", 2)
            .with_remaining(5);
        let state = mgr.apply_effects(&MatchSkillState::new(), [burn], ALICE);

        let once = mgr.tick_state(&state, BOB, &board);
        assert_eq!(
            once.state.effects[0].positions.to_vec(),
            vec![Position::new(5, 5), Position::new(6, 5)]
        );
        assert!(once.changes.iter().any(|c| c.kind == ChangeKind::StatusActive));

        let twice = mgr.tick_state(&once.state, ALICE, &board);
        assert_eq!(twice.state.effects[0].positions.len(), 2);
    }

    #[test]
    fn test_block_future_buffs_drops_buff() {
        let mgr = manager();
        let block = EffectInstance::new(EffectKind::BlockFutureBuffs, BOB)
            .with_target_player(ALICE)
            .with_remaining(2);
        let state = mgr.apply_effects(&MatchSkillState::new(), [block], BOB);

        let luck = EffectInstance::new(EffectKind::LuckBuff, ALICE).with_remaining(3);
        let state = mgr.apply_effects(&state, [luck], ALICE);
        assert_eq!(state.effects.len(), 1);
        assert_eq!(mgr.compute_modifiers(&state, ALICE).luck_stacks, 0);
    }

    #[test]
    fn test_purge_and_cleanse() {
        let mgr = manager();
        let state = mgr.apply_effects(
            &MatchSkillState::new(),
            [
                EffectInstance::new(EffectKind::LuckBuff, BOB).with_remaining(3),
                EffectInstance::new(EffectKind::StatusSpread, ALICE)
                    .with_param("status", "freeze")
                    .with_remaining(3),
                EffectInstance::new(EffectKind::StatusSpread, ALICE)
                    .with_param("status", "burn")
                    .with_remaining(3),
            ],
            ALICE,
        );

        let purge = EffectInstance::new(EffectKind::PurgeBuffs, ALICE)
            .with_target_player(BOB)
            .with_remaining(0);
        let cleanse = EffectInstance::new(EffectKind::CleanseElement, BOB)
            .with_param("element", "water")
            .with_remaining(0);
        let state = mgr.apply_effects(&state, [purge, cleanse], ALICE);

        assert_eq!(state.effects.len(), 1);
        assert_eq!(state.effects[0].params.text("status"), Some("burn"));
    }

    #[test]
    fn test_steal_takes_only_what_exists() {
        let mgr = manager();
        let state = mgr.deduct_mana(&MatchSkillState::new(), BOB, 4).unwrap();
        let steal = EffectInstance::new(EffectKind::ManaSteal, ALICE)
            .with_target_player(BOB)
            .with_param("amount", 3);

        let state = mgr.apply_effects(&state, [steal], ALICE);
        assert_eq!(mgr.mana_of(&state, BOB), 0);
        assert_eq!(mgr.mana_of(&state, ALICE), 6);
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_tick_persists() {
        let mut mgr = manager();
        let outcome = mgr.tick("m", ALICE, &BoardState::new()).unwrap();
        assert_eq!(outcome.state.version, 1);
        assert_eq!(mgr.load("m").unwrap().turn, 2);
    }
}
