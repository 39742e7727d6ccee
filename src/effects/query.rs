//! Read-only queries over an active effect list.
//!
//! Every function takes any iterator of `&EffectInstance`, so the same
//! helpers serve a stored `im::Vector` snapshot and the plain `Vec` carried
//! by a `ResolutionContext`. None of them have side effects.

use crate::core::{BoardState, PlayerId, Position, Side};
use crate::skills::SkillId;

use super::instance::{EffectInstance, EffectKind, Status};

/// First protection covering a cell and its occupant.
pub fn protection_at<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    pos: Position,
    occupant: Option<Side>,
) -> Option<&'a EffectInstance> {
    effects
        .into_iter()
        .find(|e| e.kind.is_protection() && e.covers(pos, occupant))
}

/// Whether any protection covers the piece at `pos`.
pub fn is_cell_protected<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    board: &BoardState,
    pos: Position,
) -> bool {
    protection_at(effects, pos, board.side_at(pos)).is_some()
}

/// First trap whose position set includes `pos`.
pub fn trap_at<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    pos: Position,
) -> Option<&'a EffectInstance> {
    effects
        .into_iter()
        .find(|e| e.kind == EffectKind::TrapReflect && e.positions.contains(&pos))
}

/// First redirect that admits `occupant` and would move a change aimed at
/// `pos` somewhere else on the board.
pub fn redirect_for<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    pos: Position,
    occupant: Option<Side>,
) -> Option<(&'a EffectInstance, Position)> {
    effects.into_iter().find_map(|e| {
        let target = e.redirect_to.filter(|&t| t != pos && t.in_bounds())?;
        (e.kind == EffectKind::RedirectDamage && e.admits(occupant)).then_some((e, target))
    })
}

/// Whether the piece at `pos` cannot be moved.
///
/// Covers `immobilize` effects and freeze/root/petrify statuses.
pub fn is_cell_immobilized<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    board: &BoardState,
    pos: Position,
) -> bool {
    let occupant = board.side_at(pos);
    effects.into_iter().any(|e| match e.kind {
        EffectKind::Immobilize => e.covers(pos, occupant),
        EffectKind::StatusSpread => {
            e.status().is_some_and(Status::immobilizes) && e.positions.contains(&pos)
        }
        _ => false,
    })
}

/// Whether `pos` lies in a burn hazard or carries the burn status.
pub fn is_cell_burning<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    pos: Position,
) -> bool {
    effects.into_iter().any(|e| match e.kind {
        EffectKind::BurnArea => e.covers_cell(pos),
        EffectKind::StatusSpread => e.status() == Some(Status::Burn) && e.positions.contains(&pos),
        _ => false,
    })
}

/// Whether `side` may not place at `pos` because of a zone block.
pub fn is_zone_blocked<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    pos: Position,
    side: Side,
) -> bool {
    effects.into_iter().any(|e| {
        e.kind == EffectKind::ZoneBlock
            && e.covers_cell(pos)
            && e.target_side.map_or(true, |blocked| blocked == side)
    })
}

/// Skills erased from `player`'s deck, in first-seen order.
pub fn get_removed_skills<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> Vec<SkillId> {
    collect_skills(effects, player, EffectKind::EraseSkill)
}

/// Skills named by freezes on `player`.
///
/// A freeze with no named skill freezes the whole hand; see
/// [`is_skill_frozen`].
pub fn frozen_skills<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> Vec<SkillId> {
    collect_skills(effects, player, EffectKind::FreezeSkills)
}

/// Whether `skill` is frozen for `player`.
pub fn is_skill_frozen<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
    skill: SkillId,
) -> bool {
    effects.into_iter().any(|e| {
        e.kind == EffectKind::FreezeSkills
            && e.applies_to(player)
            && (e.skills.is_empty() || e.skills.contains(&skill))
    })
}

pub fn is_silenced<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> bool {
    any_applying(effects, player, EffectKind::Silence)
}

/// Net cooldown change for `player`, in turns. Reductions are negative.
pub fn cooldown_adjustment<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> i64 {
    effects
        .into_iter()
        .filter(|e| e.applies_to(player))
        .map(|e| match e.kind {
            EffectKind::CooldownIncrease => e.params.int("amount", 1),
            EffectKind::CooldownReduction => -e.params.int("amount", 1),
            _ => 0,
        })
        .sum()
}

pub fn has_cooldown_reset<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> bool {
    any_applying(effects, player, EffectKind::CooldownReset)
}

pub fn has_extra_skill<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> bool {
    any_applying(effects, player, EffectKind::ExtraSkill)
}

pub fn has_extra_turn<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> bool {
    any_applying(effects, player, EffectKind::ExtraTurn)
}

pub fn must_skip_turn<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> bool {
    any_applying(effects, player, EffectKind::SkipTurn)
}

/// Whether `player`'s hand is visible to their opponent.
pub fn is_hand_revealed<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> bool {
    any_applying(effects, player, EffectKind::RevealHand)
}

/// Whether new buffs for `player` are currently dropped.
pub fn are_buffs_blocked<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> bool {
    any_applying(effects, player, EffectKind::BlockFutureBuffs)
}

/// Extra mana `player` regenerates per tick from `mana_boost` effects.
pub fn mana_boost<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> u32 {
    effects
        .into_iter()
        .filter(|e| e.kind == EffectKind::ManaBoost && e.applies_to(player))
        .map(|e| e.params.count("amount", 1))
        .sum()
}

/// Strongest `luck_buff` stack count applying to `player`.
pub fn luck_stacks<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> u32 {
    max_count(effects, player, EffectKind::LuckBuff, "max_stack")
}

/// Strongest `deck_lock` count applying to `player`.
pub fn lock_count<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
) -> u32 {
    max_count(effects, player, EffectKind::DeckLock, "count")
}

fn any_applying<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
    kind: EffectKind,
) -> bool {
    effects
        .into_iter()
        .any(|e| e.kind == kind && e.applies_to(player))
}

fn max_count<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
    kind: EffectKind,
    key: &str,
) -> u32 {
    effects
        .into_iter()
        .filter(|e| e.kind == kind && e.applies_to(player))
        .map(|e| e.params.count(key, 1))
        .max()
        .unwrap_or(0)
}

fn collect_skills<'a>(
    effects: impl IntoIterator<Item = &'a EffectInstance>,
    player: PlayerId,
    kind: EffectKind,
) -> Vec<SkillId> {
    let mut skills = Vec::new();
    for effect in effects {
        if effect.kind == kind && effect.applies_to(player) {
            for &skill in &effect.skills {
                if !skills.contains(&skill) {
                    skills.push(skill);
                }
            }
        }
    }
    skills
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Area;

    const P1: PlayerId = PlayerId::new(1);
    const P2: PlayerId = PlayerId::new(2);

    #[test]
    fn test_protection_respects_side_filter() {
        let pos = Position::new(7, 7);
        let board = BoardState::with_pieces([(pos, Side::O)]);
        let effects = vec![EffectInstance::new(EffectKind::ProtectPiece, P1)
            .with_positions([pos])
            .with_target_side(Side::X)];

        assert!(!is_cell_protected(&effects, &board, pos));

        let board = BoardState::with_pieces([(pos, Side::X)]);
        assert!(is_cell_protected(&effects, &board, pos));
    }

    #[test]
    fn test_overlapping_protections_are_a_union() {
        let pos = Position::new(2, 2);
        let board = BoardState::with_pieces([(pos, Side::X)]);
        let effects = vec![
            EffectInstance::new(EffectKind::ProtectPiece, P1).with_positions([pos]),
            EffectInstance::new(EffectKind::ShieldArea, P1).with_area(Area::new(pos, 1)),
        ];

        assert!(is_cell_protected(&effects, &board, pos));
        assert!(!is_cell_protected(&effects, &board, Position::new(3, 3)));
    }

    #[test]
    fn test_immobilized_by_status() {
        let pos = Position::new(4, 4);
        let board = BoardState::with_pieces([(pos, Side::O)]);
        let frozen = EffectInstance::new(EffectKind::StatusSpread, P1)
            .with_positions([pos])
            .with_param("status", "freeze");
        let burning = EffectInstance::new(EffectKind::StatusSpread, P1)
            .with_positions([pos])
            .with_param("status", "burn");

        assert!(is_cell_immobilized([&frozen], &board, pos));
        assert!(!is_cell_immobilized([&burning], &board, pos));
        assert!(is_cell_burning([&burning], pos));
    }

    #[test]
    fn test_zone_block_side() {
        let zone = EffectInstance::new(EffectKind::ZoneBlock, P1)
            .with_area(Area::new(Position::new(5, 5), 1))
            .with_target_side(Side::O);

        assert!(is_zone_blocked([&zone], Position::new(6, 6), Side::O));
        assert!(!is_zone_blocked([&zone], Position::new(6, 6), Side::X));
        assert!(!is_zone_blocked([&zone], Position::new(8, 8), Side::O));
    }

    #[test]
    fn test_player_queries() {
        let effects = vec![
            EffectInstance::new(EffectKind::Silence, P1).with_target_player(P2),
            EffectInstance::new(EffectKind::EraseSkill, P1)
                .with_target_player(P2)
                .with_skill(SkillId::new(4)),
            EffectInstance::new(EffectKind::EraseSkill, P1)
                .with_target_player(P2)
                .with_skill(SkillId::new(4)),
            EffectInstance::new(EffectKind::CooldownReduction, P1).with_param("amount", 2),
            EffectInstance::new(EffectKind::CooldownIncrease, P2)
                .with_target_player(P1)
                .with_param("amount", 1),
        ];

        assert!(is_silenced(&effects, P2));
        assert!(!is_silenced(&effects, P1));
        assert_eq!(get_removed_skills(&effects, P2), vec![SkillId::new(4)]);
        assert!(get_removed_skills(&effects, P1).is_empty());
        assert_eq!(cooldown_adjustment(&effects, P1), -1);
    }

    #[test]
    fn test_blanket_freeze() {
        let effects = vec![EffectInstance::new(EffectKind::FreezeSkills, P1).with_target_player(P2)];

        assert!(is_skill_frozen(&effects, P2, SkillId::new(9)));
        assert!(frozen_skills(&effects, P2).is_empty());
        assert!(!is_skill_frozen(&effects, P1, SkillId::new(9)));
    }

    #[test]
    fn test_modifier_maxima() {
        let effects = vec![
            EffectInstance::new(EffectKind::LuckBuff, P1).with_param("max_stack", 2),
            EffectInstance::new(EffectKind::LuckBuff, P1).with_param("max_stack", 4),
            EffectInstance::new(EffectKind::DeckLock, P2)
                .with_target_player(P1)
                .with_param("count", 2),
        ];

        assert_eq!(luck_stacks(&effects, P1), 4);
        assert_eq!(lock_count(&effects, P1), 2);
        assert_eq!(lock_count(&effects, P2), 0);
    }
}
