//! Removal and displacement handlers.
//!
//! Removals emit destructive changes and are therefore subject to the
//! conflict resolver. Displacements emit `move` changes; an immobilized
//! piece can never be displaced.

use crate::core::{Direction, Position};
use crate::effects::instance::EffectKind;
use crate::effects::result::BoardChange;

use super::{reject, HandlerResult, Invocation, Proposal};

pub(super) fn destroy_piece(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.target(0)?;
    inv.require_enemy(pos)?;
    Ok(Proposal::new(format!("destroyed the piece at {}", pos))
        .with_change(BoardChange::remove(pos, inv.enemy())))
}

pub(super) fn remove_enemy(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.target(0)?;
    inv.require_enemy(pos)?;
    if inv.ctx.last_enemy_move == Some(pos) {
        return reject("cannot remove the opponent's latest move");
    }
    Ok(Proposal::new(format!("removed the piece at {}", pos))
        .with_change(BoardChange::remove(pos, inv.enemy())))
}

pub(super) fn remove_random_enemy(inv: &Invocation<'_>) -> HandlerResult {
    let count = inv.params.count("count", 1).max(1) as usize;
    let mut candidates: Vec<Position> = inv
        .board
        .positions_of(inv.enemy())
        .into_iter()
        .filter(|&p| inv.ctx.last_enemy_move != Some(p))
        .collect();
    if candidates.is_empty() {
        return reject("no opponent piece can be removed");
    }

    let mut rng = inv.rng();
    rng.shuffle(&mut candidates);
    candidates.truncate(count);

    Ok(Proposal::new(format!("removed {} random piece(s)", candidates.len()))
        .with_changes(candidates.into_iter().map(|p| BoardChange::remove(p, inv.enemy()))))
}

pub(super) fn remove_line(inv: &Invocation<'_>) -> HandlerResult {
    let start = inv.target(0)?;
    let direction = inv.direction(Some(Direction::Right))?;
    let length = inv.params.count("length", 3).max(1);

    let hits: Vec<Position> = inv
        .line(start, direction, length)
        .into_iter()
        .filter(|&p| inv.board.is_side(p, inv.enemy()))
        .collect();
    if hits.is_empty() {
        return reject(format!("no opponent piece on the line from {}", start));
    }
    Ok(Proposal::new(format!("cleared {} piece(s) along the line", hits.len()))
        .with_changes(hits.into_iter().map(|p| BoardChange::remove(p, inv.enemy()))))
}

pub(super) fn undo_enemy_move(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.last_enemy_move()?;
    inv.require_enemy(pos)?;
    Ok(Proposal::new(format!("undid the opponent's move at {}", pos))
        .with_change(BoardChange::remove(pos, inv.enemy())))
}

/// Direction pushing away from the acting player's last move.
fn push_direction(inv: &Invocation<'_>, target: Position) -> Result<Direction, super::Rejection> {
    let away = inv
        .ctx
        .last_move
        .filter(|anchor| anchor.in_bounds())
        .and_then(|anchor| Direction::toward(anchor, target));
    inv.direction(away)
}

pub(super) fn push_enemy(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.target(0)?;
    inv.require_enemy(pos)?;
    inv.require_mobile(pos)?;
    let direction = push_direction(inv, pos)?;

    let Some(dest) = pos.step(direction) else {
        return reject(format!("cannot push {} off the board", pos));
    };
    inv.require_empty(dest)?;
    Ok(Proposal::new(format!("pushed {} to {}", pos, dest))
        .with_change(BoardChange::moved(pos, dest, inv.enemy())))
}

/// Shift the run of pieces ending at the target one cell along the push
/// direction.
///
/// The target is the leading piece. The run is collected by walking
/// backward from it over contiguous occupied cells, so a push can carry
/// pieces of either side behind the target.
pub(super) fn push_chain(inv: &Invocation<'_>) -> HandlerResult {
    let front = inv.target(0)?;
    inv.require_enemy(front)?;
    let direction = push_direction(inv, front)?;

    let Some(dest) = front.step(direction) else {
        return reject(format!("cannot push {} off the board", front));
    };
    if !inv.board.is_empty(dest) {
        return reject(format!("{} is occupied, the chain cannot move", dest));
    }

    let mut run = Vec::new();
    let mut cursor = Some(front);
    while let Some(pos) = cursor {
        let Some(side) = inv.board.side_at(pos) else {
            break;
        };
        inv.require_mobile(pos)?;
        run.push((pos, side));
        cursor = pos.step(direction.opposite());
    }

    let changes: Vec<BoardChange> = run
        .iter()
        .filter_map(|&(pos, side)| pos.step(direction).map(|to| BoardChange::moved(pos, to, side)))
        .collect();
    Ok(Proposal::new(format!("pushed a chain of {} piece(s)", changes.len())).with_changes(changes))
}

pub(super) fn pull_piece(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.target(0)?;
    inv.require_enemy(pos)?;
    inv.require_mobile(pos)?;
    let anchor = inv.last_move()?;

    let Some(dest) = Direction::toward(pos, anchor).and_then(|d| pos.step(d)) else {
        return reject(format!("cannot pull {} toward {}", pos, anchor));
    };
    inv.require_empty(dest)?;
    Ok(Proposal::new(format!("pulled {} to {}", pos, dest))
        .with_change(BoardChange::moved(pos, dest, inv.enemy())))
}

pub(super) fn swap_pieces(inv: &Invocation<'_>) -> HandlerResult {
    let own = inv.target(0)?;
    let enemy = inv.target(1)?;
    inv.require_own(own)?;
    inv.require_enemy(enemy)?;
    inv.require_mobile(own)?;
    inv.require_mobile(enemy)?;

    Ok(Proposal::new(format!("swapped {} and {}", own, enemy))
        .with_change(BoardChange::moved(own, enemy, inv.side()))
        .with_change(BoardChange::moved(enemy, own, inv.enemy())))
}

pub(super) fn move_own_piece(inv: &Invocation<'_>) -> HandlerResult {
    let from = inv.target(0)?;
    let to = inv.target(1)?;
    inv.require_own(from)?;
    inv.require_mobile(from)?;
    inv.require_placeable(to)?;

    let distance = inv.params.int("distance", 2);
    if i64::from(from.chebyshev(to)) > distance {
        return reject(format!("{} is more than {} away from {}", to, distance, from));
    }
    Ok(Proposal::new(format!("moved {} to {}", from, to))
        .with_change(BoardChange::moved(from, to, inv.side())))
}

pub(super) fn convert_piece(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.target(0)?;
    inv.require_enemy(pos)?;
    Ok(Proposal::new(format!("converted the piece at {}", pos))
        .with_change(BoardChange::convert(pos, inv.side())))
}

/// Remove a piece for a while; it returns when the `banished` effect expires.
pub(super) fn banish_piece(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.target(0)?;
    inv.require_enemy(pos)?;
    let duration = inv.duration(inv.config.durations.banish);

    Ok(Proposal::new(format!("banished the piece at {} for {} turn(s)", pos, duration))
        .with_change(BoardChange::banish(pos, inv.enemy()))
        .with_effect(
            inv.instance(EffectKind::Banished)
                .with_positions([pos])
                .with_target_side(inv.enemy())
                .with_remaining(duration),
        ))
}
