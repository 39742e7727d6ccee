//! Protection handlers.
//!
//! These only register effect instances. Enforcement happens in the
//! conflict resolver when a later destructive change targets a covered
//! cell.

use crate::core::Position;
use crate::effects::instance::{EffectInstance, EffectKind};
use crate::effects::result::{BoardChange, ChangeKind};

use super::{reject, HandlerResult, Invocation, Proposal};

fn registered(message: String, effect: EffectInstance) -> Proposal {
    let notice = BoardChange::notice(ChangeKind::Modifier, effect.positions.first().copied())
        .with_effect(effect.kind)
        .with_footprint(effect.footprint());
    Proposal::new(message).with_change(notice).with_effect(effect)
}

/// Own pieces named by the targets, between `min` and `max` of them.
fn own_targets(inv: &Invocation<'_>, min: usize, max: usize) -> Result<Vec<Position>, super::Rejection> {
    let cells = inv.targets(min, max)?;
    for &pos in &cells {
        inv.require_own(pos)?;
    }
    Ok(cells)
}

pub(super) fn protect_piece(inv: &Invocation<'_>) -> HandlerResult {
    let cells = own_targets(inv, 1, 1)?;
    let duration = inv.duration(inv.config.durations.protection);
    Ok(registered(
        format!("protected the piece at {}", cells[0]),
        inv.instance(EffectKind::ProtectPiece)
            .with_positions(cells)
            .with_target_side(inv.side())
            .with_remaining(duration),
    ))
}

/// Protect every piece of the acting side.
pub(super) fn protect_all(inv: &Invocation<'_>) -> HandlerResult {
    let duration = inv.duration(inv.config.durations.protection);
    Ok(registered(
        "protected all of your pieces".to_string(),
        inv.instance(EffectKind::ProtectAll)
            .with_target_side(inv.side())
            .with_remaining(duration),
    ))
}

pub(super) fn shield_area(inv: &Invocation<'_>) -> HandlerResult {
    let area = inv.area(inv.target(0)?, 1);
    let duration = inv.duration(inv.config.durations.protection);
    Ok(registered(
        format!("shielded the area around {}", area.center),
        inv.instance(EffectKind::ShieldArea)
            .with_area(area)
            .with_target_side(inv.side())
            .with_remaining(duration),
    ))
}

pub(super) fn dual_protect(inv: &Invocation<'_>) -> HandlerResult {
    let cells = own_targets(inv, 2, 2)?;
    let duration = inv.duration(inv.config.durations.protection);
    Ok(registered(
        format!("protected {} and {}", cells[0], cells[1]),
        inv.instance(EffectKind::DualProtect)
            .with_positions(cells)
            .with_target_side(inv.side())
            .with_remaining(duration),
    ))
}

/// Longer-lived protection for a single piece.
pub(super) fn destroy_immunity(inv: &Invocation<'_>) -> HandlerResult {
    let cells = own_targets(inv, 1, 1)?;
    let duration = inv.duration(inv.config.durations.buff);
    Ok(registered(
        format!("the piece at {} is immune", cells[0]),
        inv.instance(EffectKind::DestroyImmunity)
            .with_positions(cells)
            .with_target_side(inv.side())
            .with_remaining(duration),
    ))
}

pub(super) fn trap_reflect(inv: &Invocation<'_>) -> HandlerResult {
    let cells = inv.targets(1, 3)?;
    let duration = inv.duration(inv.config.durations.trap);
    Ok(registered(
        format!("set {} trap(s)", cells.len()),
        inv.instance(EffectKind::TrapReflect)
            .with_positions(cells)
            .with_remaining(duration),
    ))
}

/// Reroute destructive effects aimed at the acting side to `t0`.
pub(super) fn redirect_damage(inv: &Invocation<'_>) -> HandlerResult {
    let target = inv.target(0)?;
    if inv.board.is_side(target, inv.side()) {
        return reject(format!("cannot redirect onto your own piece at {}", target));
    }
    let duration = inv.duration(inv.config.durations.protection);
    Ok(registered(
        format!("damage to your pieces now lands on {}", target),
        inv.instance(EffectKind::RedirectDamage)
            .with_redirect_to(target)
            .with_target_side(inv.side())
            .with_remaining(duration),
    ))
}
