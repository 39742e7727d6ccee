//! Effect handlers, one module per family.
//!
//! A handler reads an [`Invocation`] and either proposes changes and new
//! effect instances or rejects the input. Handlers never touch the board
//! directly and never see the result of conflict resolution; the
//! dispatcher does both afterwards.
//!
//! Validation helpers on `Invocation` return `Result<_, Rejection>` so
//! handlers read as a straight line of `?` checks.

mod area;
mod blocking;
mod chaos;
mod placement;
mod protection;
mod removal;
mod status;
mod utility;

use crate::core::{Area, BoardState, Direction, EngineConfig, GameRng, Position, Side};
use crate::skills::{EffectParams, EffectType, SkillId};

use super::context::ResolutionContext;
use super::instance::{EffectInstance, EffectKind};
use super::query;
use super::result::BoardChange;

/// A handler's accepted output.
#[derive(Clone, Debug, Default)]
pub(crate) struct Proposal {
    pub message: String,
    pub changes: Vec<BoardChange>,
    pub effects: Vec<EffectInstance>,
}

impl Proposal {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_change(mut self, change: BoardChange) -> Self {
        self.changes.push(change);
        self
    }

    pub fn with_changes(mut self, changes: impl IntoIterator<Item = BoardChange>) -> Self {
        self.changes.extend(changes);
        self
    }

    pub fn with_effect(mut self, effect: EffectInstance) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Why a handler refused its input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub(crate) struct Rejection(pub String);

pub(crate) type HandlerResult = Result<Proposal, Rejection>;

pub(crate) fn reject<T>(message: impl Into<String>) -> Result<T, Rejection> {
    Err(Rejection(message.into()))
}

/// Inputs shared by every handler.
pub(crate) struct Invocation<'a> {
    pub effect: EffectType,
    pub skill: SkillId,
    pub board: &'a BoardState,
    pub ctx: &'a ResolutionContext,
    /// Level-scaled parameters.
    pub params: EffectParams,
    pub config: &'a EngineConfig,
}

impl Invocation<'_> {
    pub fn side(&self) -> Side {
        self.ctx.side
    }

    pub fn enemy(&self) -> Side {
        self.ctx.opponent_side
    }

    pub fn effects(&self) -> &[EffectInstance] {
        &self.ctx.active_effects
    }

    /// Target `index`, required and on the board.
    pub fn target(&self, index: usize) -> Result<Position, Rejection> {
        match self.optional_target(index)? {
            Some(pos) => Ok(pos),
            None => reject(format!("{} needs target position #{}", self.effect, index + 1)),
        }
    }

    /// Target `index` if supplied; an off-board target is still rejected.
    pub fn optional_target(&self, index: usize) -> Result<Option<Position>, Rejection> {
        match self.ctx.targets.get(index) {
            None => Ok(None),
            Some(&pos) if pos.in_bounds() => Ok(Some(pos)),
            Some(&pos) => reject(format!("target {} is off the board", pos)),
        }
    }

    /// All targets, each on the board, with at least `min` and at most `max`.
    pub fn targets(&self, min: usize, max: usize) -> Result<Vec<Position>, Rejection> {
        let count = self.ctx.targets.len();
        if count < min || count > max {
            return reject(format!(
                "{} takes {}..={} targets, got {}",
                self.effect, min, max, count
            ));
        }
        let mut targets = Vec::with_capacity(count);
        for index in 0..count {
            let pos = self.target(index)?;
            if targets.contains(&pos) {
                return reject(format!("target {} given twice", pos));
            }
            targets.push(pos);
        }
        Ok(targets)
    }

    pub fn last_move(&self) -> Result<Position, Rejection> {
        match self.ctx.last_move {
            Some(pos) if pos.in_bounds() => Ok(pos),
            _ => reject("no previous move of your own to anchor on"),
        }
    }

    pub fn last_enemy_move(&self) -> Result<Position, Rejection> {
        match self.ctx.last_enemy_move {
            Some(pos) if pos.in_bounds() => Ok(pos),
            _ => reject("the opponent has no previous move"),
        }
    }

    /// Context direction, then the `direction` parameter, then `fallback`.
    pub fn direction(&self, fallback: Option<Direction>) -> Result<Direction, Rejection> {
        match self
            .ctx
            .direction
            .or_else(|| self.params.direction("direction"))
            .or(fallback)
        {
            Some(direction) => Ok(direction),
            None => reject(format!("{} needs a direction", self.effect)),
        }
    }

    pub fn radius(&self, default: i32) -> i32 {
        let radius = self.params.int("radius", i64::from(default)).clamp(0, 14);
        i32::try_from(radius).unwrap_or(default)
    }

    pub fn area(&self, center: Position, default_radius: i32) -> Area {
        Area::new(center, self.radius(default_radius))
    }

    pub fn duration(&self, default: u32) -> u32 {
        self.params.count("duration", default)
    }

    pub fn amount(&self, default: u32) -> u32 {
        self.params.count("amount", default)
    }

    /// Stream for this effect on this turn of the match.
    pub fn rng(&self) -> GameRng {
        GameRng::for_purpose(
            self.ctx.match_seed,
            &format!("skill:{}", self.effect),
            self.ctx.turn,
        )
    }

    /// A new instance owned by the acting player.
    pub fn instance(&self, kind: EffectKind) -> EffectInstance {
        EffectInstance::new(kind, self.ctx.player).with_source_skill(self.skill)
    }

    /// A new instance owned by the acting player and aimed at the opponent.
    pub fn hostile(&self, kind: EffectKind) -> EffectInstance {
        self.instance(kind).with_target_player(self.ctx.opponent)
    }

    /// Empty, not burning and not zone-blocked for the acting side.
    pub fn is_placeable(&self, pos: Position) -> bool {
        self.board.is_empty(pos)
            && !query::is_cell_burning(self.effects(), pos)
            && !query::is_zone_blocked(self.effects(), pos, self.side())
    }

    pub fn require_placeable(&self, pos: Position) -> Result<(), Rejection> {
        if !self.board.is_empty(pos) {
            return reject(format!("{} is not empty", pos));
        }
        if query::is_cell_burning(self.effects(), pos) {
            return reject(format!("{} is burning", pos));
        }
        if query::is_zone_blocked(self.effects(), pos, self.side()) {
            return reject(format!("{} is inside a blocked zone", pos));
        }
        Ok(())
    }

    pub fn require_empty(&self, pos: Position) -> Result<(), Rejection> {
        if self.board.is_empty(pos) {
            Ok(())
        } else {
            reject(format!("{} is not empty", pos))
        }
    }

    pub fn require_enemy(&self, pos: Position) -> Result<(), Rejection> {
        if self.board.is_side(pos, self.enemy()) {
            Ok(())
        } else {
            reject(format!("{} does not hold an opponent piece", pos))
        }
    }

    pub fn require_own(&self, pos: Position) -> Result<(), Rejection> {
        if self.board.is_side(pos, self.side()) {
            Ok(())
        } else {
            reject(format!("{} does not hold your piece", pos))
        }
    }

    pub fn require_mobile(&self, pos: Position) -> Result<(), Rejection> {
        if query::is_cell_immobilized(self.effects(), self.board, pos) {
            reject(format!("the piece at {} cannot move", pos))
        } else {
            Ok(())
        }
    }

    pub fn is_mobile(&self, pos: Position) -> bool {
        !query::is_cell_immobilized(self.effects(), self.board, pos)
    }

    /// Cells from `start` stepping along `direction`, at most `length`,
    /// stopping at the board edge.
    pub fn line(&self, start: Position, direction: Direction, length: u32) -> Vec<Position> {
        let mut cells = Vec::new();
        let mut cursor = Some(start);
        while let Some(pos) = cursor {
            if cells.len() >= length as usize {
                break;
            }
            cells.push(pos);
            cursor = pos.step(direction);
        }
        cells
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Run one handler with default configuration.
    pub fn invoke(
        effect: EffectType,
        board: &BoardState,
        ctx: &ResolutionContext,
        params: EffectParams,
    ) -> HandlerResult {
        let config = EngineConfig::default();
        let inv = Invocation {
            effect,
            skill: SkillId::new(1),
            board,
            ctx,
            params,
            config: &config,
        };
        run(&inv)
    }

    /// Apply a proposal's board changes to a copy of `board`.
    pub fn applied(board: &BoardState, proposal: &Proposal) -> BoardState {
        let mut next = board.clone();
        next.apply_changes(&proposal.changes);
        next
    }
}

/// Run the handler for `inv.effect`.
pub(crate) fn run(inv: &Invocation<'_>) -> HandlerResult {
    match inv.effect {
        EffectType::PlaceAdjacent => placement::place_adjacent(inv),
        EffectType::PlaceDouble => placement::place_double(inv),
        EffectType::PlaceAnywhere => placement::place_anywhere(inv),
        EffectType::PlaceLine => placement::place_line(inv),
        EffectType::PlaceDiagonal => placement::place_diagonal(inv),
        EffectType::PlaceMirror => placement::place_mirror(inv),
        EffectType::PlaceRandom => placement::place_random(inv),
        EffectType::ExtendLine => placement::extend_line(inv),
        EffectType::FillGap => placement::fill_gap(inv),

        EffectType::DestroyPiece => removal::destroy_piece(inv),
        EffectType::RemoveEnemy => removal::remove_enemy(inv),
        EffectType::RemoveRandomEnemy => removal::remove_random_enemy(inv),
        EffectType::RemoveLine => removal::remove_line(inv),
        EffectType::UndoEnemyMove => removal::undo_enemy_move(inv),
        EffectType::PushEnemy => removal::push_enemy(inv),
        EffectType::PushChain => removal::push_chain(inv),
        EffectType::PullPiece => removal::pull_piece(inv),
        EffectType::SwapPieces => removal::swap_pieces(inv),
        EffectType::MoveOwnPiece => removal::move_own_piece(inv),
        EffectType::ConvertPiece => removal::convert_piece(inv),
        EffectType::BanishPiece => removal::banish_piece(inv),

        EffectType::BombArea => area::bomb_area(inv),
        EffectType::BurnArea => area::burn_area(inv),
        EffectType::ZoneBlock => area::zone_block(inv),
        EffectType::ResetArea => area::reset_area(inv),
        EffectType::ShuffleArea => area::shuffle_area(inv),
        EffectType::ClearRow => area::clear_row(inv),
        EffectType::ClearColumn => area::clear_column(inv),
        EffectType::FreezeArea => area::freeze_area(inv),

        EffectType::BlockCell => blocking::block_cell(inv),
        EffectType::UnblockCell => blocking::unblock_cell(inv),
        EffectType::WallLine => blocking::wall_line(inv),

        EffectType::ChaosMove => chaos::chaos_move(inv),
        EffectType::ChaosJump => chaos::chaos_jump(inv),
        EffectType::ChaosBoard => chaos::chaos_board(inv),

        EffectType::FireSpread
        | EffectType::IceSpread
        | EffectType::RootSpread
        | EffectType::StoneSpread
        | EffectType::RustSpread => status::status_spread(inv),
        EffectType::CleanseElement => status::cleanse_element(inv),
        EffectType::ImmobilizePiece => status::immobilize_piece(inv),

        EffectType::ProtectPiece => protection::protect_piece(inv),
        EffectType::ProtectAll => protection::protect_all(inv),
        EffectType::ShieldArea => protection::shield_area(inv),
        EffectType::DualProtect => protection::dual_protect(inv),
        EffectType::DestroyImmunity => protection::destroy_immunity(inv),
        EffectType::TrapReflect => protection::trap_reflect(inv),
        EffectType::RedirectDamage => protection::redirect_damage(inv),

        EffectType::RestoreMana => utility::restore_mana(inv),
        EffectType::DrainMana => utility::drain_mana(inv),
        EffectType::StealMana => utility::steal_mana(inv),
        EffectType::ManaBoost => utility::mana_boost(inv),
        EffectType::SacrificeForMana => utility::sacrifice_for_mana(inv),
        EffectType::FreezeSkills => utility::freeze_skills(inv),
        EffectType::ReduceCooldown => utility::reduce_cooldown(inv),
        EffectType::ResetCooldowns => utility::reset_cooldowns(inv),
        EffectType::IncreaseEnemyCooldown => utility::increase_enemy_cooldown(inv),
        EffectType::TwoSkillsNextTurn => utility::two_skills_next_turn(inv),
        EffectType::ExtraTurn => utility::extra_turn(inv),
        EffectType::SkipEnemyTurn => utility::skip_enemy_turn(inv),
        EffectType::ReuseSkill => utility::reuse_skill(inv),
        EffectType::EraseEnemySkill => utility::erase_enemy_skill(inv),
        EffectType::CopyEnemySkill => utility::copy_enemy_skill(inv),
        EffectType::DeckLock => utility::deck_lock(inv),
        EffectType::LuckBuff => utility::luck_buff(inv),
        EffectType::Silence => utility::silence(inv),
        EffectType::BlockFutureBuffs => utility::block_future_buffs(inv),
        EffectType::PurgeBuffs => utility::purge_buffs(inv),
        EffectType::RevealHand => utility::reveal_hand(inv),
    }
}
