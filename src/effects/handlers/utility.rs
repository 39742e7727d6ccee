//! Utility and meta handlers.
//!
//! None of these touch the board. Each registers one effect instance (or an
//! instant marker with `remaining = 0` that `apply_effects` consumes) plus a
//! `modifier` notice. Sacrifice-aware effects fall back to their plain
//! version when no sacrifice is given.

use crate::effects::instance::{EffectInstance, EffectKind};
use crate::effects::result::{BoardChange, ChangeKind};

use super::{reject, HandlerResult, Invocation, Proposal};

fn meta(message: impl Into<String>, effect: EffectInstance) -> HandlerResult {
    let notice = BoardChange::notice(ChangeKind::Modifier, None).with_effect(effect.kind);
    Ok(Proposal::new(message).with_change(notice).with_effect(effect))
}

fn with_sacrifice(inv: &Invocation<'_>, effect: EffectInstance) -> EffectInstance {
    match inv.ctx.sacrifice {
        Some(skill) => effect.with_skill(skill),
        None => effect,
    }
}

// === Mana ===

pub(super) fn restore_mana(inv: &Invocation<'_>) -> HandlerResult {
    let base = inv.amount(2);
    let amount = if inv.ctx.sacrifice.is_some() { base * 2 } else { base };
    meta(
        format!("restored {} mana", amount),
        with_sacrifice(
            inv,
            inv.instance(EffectKind::ManaGain)
                .with_param("amount", amount)
                .with_remaining(0),
        ),
    )
}

pub(super) fn drain_mana(inv: &Invocation<'_>) -> HandlerResult {
    let amount = inv.amount(2);
    meta(
        format!("drained {} mana from the opponent", amount),
        inv.hostile(EffectKind::ManaDrain)
            .with_param("amount", amount)
            .with_remaining(0),
    )
}

pub(super) fn steal_mana(inv: &Invocation<'_>) -> HandlerResult {
    let amount = inv.amount(2);
    meta(
        format!("stole up to {} mana", amount),
        inv.hostile(EffectKind::ManaSteal)
            .with_param("amount", amount)
            .with_remaining(0),
    )
}

pub(super) fn mana_boost(inv: &Invocation<'_>) -> HandlerResult {
    let amount = inv.amount(1);
    meta(
        format!("mana regeneration +{}", amount),
        inv.instance(EffectKind::ManaBoost)
            .with_param("amount", amount)
            .with_remaining(inv.duration(inv.config.durations.buff)),
    )
}

pub(super) fn sacrifice_for_mana(inv: &Invocation<'_>) -> HandlerResult {
    let amount = if inv.ctx.sacrifice.is_some() { inv.amount(3) } else { 1 };
    meta(
        format!("gained {} mana", amount),
        with_sacrifice(
            inv,
            inv.instance(EffectKind::ManaGain)
                .with_param("amount", amount)
                .with_remaining(0),
        ),
    )
}

// === Cooldowns and turns ===

/// Freeze one named opponent skill, or the whole hand if none is named.
pub(super) fn freeze_skills(inv: &Invocation<'_>) -> HandlerResult {
    let mut effect = inv
        .hostile(EffectKind::FreezeSkills)
        .with_remaining(inv.duration(inv.config.durations.control));
    if let Some(skill) = inv.ctx.target_skill {
        effect = effect.with_skill(skill);
    }
    meta("froze the opponent's skills", effect)
}

pub(super) fn reduce_cooldown(inv: &Invocation<'_>) -> HandlerResult {
    let amount = inv.amount(1);
    meta(
        format!("cooldowns reduced by {}", amount),
        inv.instance(EffectKind::CooldownReduction)
            .with_param("amount", amount)
            .with_remaining(inv.duration(inv.config.durations.buff)),
    )
}

pub(super) fn reset_cooldowns(inv: &Invocation<'_>) -> HandlerResult {
    meta(
        "cooldowns reset",
        inv.instance(EffectKind::CooldownReset)
            .with_remaining(inv.duration(inv.config.durations.buff)),
    )
}

pub(super) fn increase_enemy_cooldown(inv: &Invocation<'_>) -> HandlerResult {
    let amount = inv.amount(1);
    meta(
        format!("opponent cooldowns increased by {}", amount),
        inv.hostile(EffectKind::CooldownIncrease)
            .with_param("amount", amount)
            .with_remaining(inv.duration(inv.config.durations.control)),
    )
}

pub(super) fn two_skills_next_turn(inv: &Invocation<'_>) -> HandlerResult {
    meta(
        "two skills next turn",
        inv.instance(EffectKind::ExtraSkill)
            .with_remaining(inv.duration(inv.config.durations.buff)),
    )
}

pub(super) fn extra_turn(inv: &Invocation<'_>) -> HandlerResult {
    meta(
        "extra turn granted",
        inv.instance(EffectKind::ExtraTurn)
            .with_remaining(inv.duration(inv.config.durations.buff)),
    )
}

pub(super) fn skip_enemy_turn(inv: &Invocation<'_>) -> HandlerResult {
    meta(
        "the opponent skips a turn",
        inv.hostile(EffectKind::SkipTurn)
            .with_remaining(inv.duration(inv.config.durations.control)),
    )
}

// === Skill manipulation ===

/// Replay a skill next turn; free of mana when a skill is sacrificed.
pub(super) fn reuse_skill(inv: &Invocation<'_>) -> HandlerResult {
    let free = inv.ctx.sacrifice.is_some();
    let mut effect = inv
        .instance(EffectKind::ReuseSkill)
        .with_param("free", free)
        .with_remaining(inv.duration(inv.config.durations.buff));
    if let Some(skill) = inv.ctx.target_skill {
        effect = effect.with_skill(skill);
    }
    let message = if free { "skill can be reused for free" } else { "skill can be reused" };
    meta(message, effect)
}

pub(super) fn erase_enemy_skill(inv: &Invocation<'_>) -> HandlerResult {
    let Some(skill) = inv.ctx.target_skill else {
        return reject("erase_enemy_skill needs a target skill");
    };
    let mut duration = inv.duration(inv.config.durations.control);
    if inv.ctx.sacrifice.is_some() {
        duration += inv.params.count("extend", 2);
    }
    meta(
        format!("erased {} for {} turn(s)", skill, duration),
        inv.hostile(EffectKind::EraseSkill)
            .with_skill(skill)
            .with_remaining(duration),
    )
}

pub(super) fn copy_enemy_skill(inv: &Invocation<'_>) -> HandlerResult {
    let Some(skill) = inv.ctx.target_skill else {
        return reject("copy_enemy_skill needs a target skill");
    };
    meta(
        format!("copied {}", skill),
        inv.instance(EffectKind::CopySkill)
            .with_skill(skill)
            .with_remaining(inv.duration(inv.config.durations.buff)),
    )
}

pub(super) fn deck_lock(inv: &Invocation<'_>) -> HandlerResult {
    let mut count = inv.params.count("count", 1).max(1);
    if inv.ctx.sacrifice.is_some() {
        count += 1;
    }
    meta(
        format!("locked {} of the opponent's skills", count),
        inv.hostile(EffectKind::DeckLock)
            .with_param("count", count)
            .with_remaining(inv.duration(inv.config.durations.control)),
    )
}

pub(super) fn luck_buff(inv: &Invocation<'_>) -> HandlerResult {
    let stacks = inv
        .params
        .count("max_stack", 2)
        .min(inv.config.luck.max_luck_stacks);
    meta(
        format!("luck +{}", stacks),
        inv.instance(EffectKind::LuckBuff)
            .with_param("max_stack", stacks)
            .with_remaining(inv.duration(inv.config.durations.buff)),
    )
}

pub(super) fn silence(inv: &Invocation<'_>) -> HandlerResult {
    meta(
        "the opponent is silenced",
        inv.hostile(EffectKind::Silence)
            .with_remaining(inv.duration(inv.config.durations.control)),
    )
}

pub(super) fn block_future_buffs(inv: &Invocation<'_>) -> HandlerResult {
    meta(
        "the opponent cannot gain buffs",
        inv.hostile(EffectKind::BlockFutureBuffs)
            .with_remaining(inv.duration(inv.config.durations.control)),
    )
}

pub(super) fn purge_buffs(inv: &Invocation<'_>) -> HandlerResult {
    meta(
        "purged the opponent's buffs",
        inv.hostile(EffectKind::PurgeBuffs).with_remaining(0),
    )
}

pub(super) fn reveal_hand(inv: &Invocation<'_>) -> HandlerResult {
    meta(
        "the opponent's hand is revealed",
        inv.hostile(EffectKind::RevealHand)
            .with_remaining(inv.duration(inv.config.durations.control)),
    )
}

#[cfg(test)]
mod tests {
    use super::super::testing::invoke;
    use crate::core::{BoardState, PlayerId, Side};
    use crate::effects::{EffectKind, ResolutionContext};
    use crate::skills::{EffectParams, EffectType, SkillId};

    fn ctx() -> ResolutionContext {
        ResolutionContext::new(PlayerId::new(1), Side::X, PlayerId::new(2))
    }

    #[test]
    fn test_restore_mana_sacrifice_doubles() {
        let board = BoardState::new();
        let params = EffectParams::new().with("amount", 3);

        let plain = invoke(EffectType::RestoreMana, &board, &ctx(), params.clone()).unwrap();
        assert_eq!(plain.effects[0].params.int("amount", 0), 3);

        let ctx = ctx().with_sacrifice(SkillId::new(8));
        let doubled = invoke(EffectType::RestoreMana, &board, &ctx, params).unwrap();
        assert_eq!(doubled.effects[0].params.int("amount", 0), 6);
        assert_eq!(doubled.effects[0].skills.to_vec(), vec![SkillId::new(8)]);
    }

    #[test]
    fn test_sacrifice_for_mana_degrades() {
        let board = BoardState::new();
        let proposal =
            invoke(EffectType::SacrificeForMana, &board, &ctx(), EffectParams::new()).unwrap();
        assert_eq!(proposal.effects[0].params.int("amount", 0), 1);
    }

    #[test]
    fn test_hostile_effects_target_opponent() {
        let board = BoardState::new();
        for effect in [EffectType::Silence, EffectType::DeckLock, EffectType::SkipEnemyTurn] {
            let proposal = invoke(effect, &board, &ctx(), EffectParams::new()).unwrap();
            assert_eq!(proposal.effects[0].target_player, Some(PlayerId::new(2)));
            assert!(proposal.changes.iter().all(|c| !c.kind.mutates_board()));
        }
    }

    #[test]
    fn test_erase_needs_target_skill() {
        let board = BoardState::new();
        assert!(invoke(EffectType::EraseEnemySkill, &board, &ctx(), EffectParams::new()).is_err());

        let ctx = ctx()
            .with_target_skill(SkillId::new(3))
            .with_sacrifice(SkillId::new(4));
        let proposal = invoke(EffectType::EraseEnemySkill, &board, &ctx, EffectParams::new()).unwrap();
        let effect = &proposal.effects[0];
        assert_eq!(effect.kind, EffectKind::EraseSkill);
        assert_eq!(effect.remaining, Some(4));
    }

    #[test]
    fn test_deck_lock_sacrifice_adds_lock() {
        let board = BoardState::new();
        let ctx = ctx().with_sacrifice(SkillId::new(4));
        let proposal = invoke(EffectType::DeckLock, &board, &ctx, EffectParams::new()).unwrap();
        assert_eq!(proposal.effects[0].params.count("count", 0), 2);
    }
}
