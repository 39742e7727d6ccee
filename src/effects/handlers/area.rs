//! Area handlers: effects on a radius-bounded neighbourhood, a row or a
//! column, clipped to the board.
//!
//! `burn_area`, `zone_block` and `freeze_area` register a standing effect
//! instead of touching the board.

use crate::core::{Area, Cell, Position, Side};
use crate::effects::instance::EffectKind;
use crate::effects::result::{BoardChange, ChangeKind};

use super::{HandlerResult, Invocation, Proposal};

/// Removal changes for every hit piece among `cells`.
fn sweep(inv: &Invocation<'_>, cells: impl IntoIterator<Item = Position>) -> Vec<BoardChange> {
    let include_own = inv.params.flag("include_own", false);
    cells
        .into_iter()
        .filter_map(|pos| {
            let side = inv.board.side_at(pos)?;
            (side == inv.enemy() || include_own).then(|| BoardChange::remove(pos, side))
        })
        .collect()
}

fn hazard_notice(area: Area, kind: EffectKind) -> BoardChange {
    BoardChange::notice(ChangeKind::Modifier, Some(area.center))
        .with_effect(kind)
        .with_footprint(area.cells().to_vec())
}

pub(super) fn bomb_area(inv: &Invocation<'_>) -> HandlerResult {
    let area = inv.area(inv.target(0)?, 1);
    let changes = sweep(inv, area.cells());
    Ok(Proposal::new(format!("bomb at {} hit {} piece(s)", area.center, changes.len()))
        .with_changes(changes))
}

pub(super) fn burn_area(inv: &Invocation<'_>) -> HandlerResult {
    let area = inv.area(inv.target(0)?, 1);
    let duration = inv.duration(inv.config.durations.hazard);
    Ok(Proposal::new(format!("the area around {} is burning", area.center))
        .with_change(hazard_notice(area, EffectKind::BurnArea))
        .with_effect(
            inv.instance(EffectKind::BurnArea)
                .with_area(area)
                .with_remaining(duration),
        ))
}

pub(super) fn zone_block(inv: &Invocation<'_>) -> HandlerResult {
    let area = inv.area(inv.target(0)?, 1);
    let duration = inv.duration(inv.config.durations.hazard);
    Ok(Proposal::new(format!("the opponent cannot place around {}", area.center))
        .with_change(hazard_notice(area, EffectKind::ZoneBlock))
        .with_effect(
            inv.instance(EffectKind::ZoneBlock)
                .with_area(area)
                .with_target_side(inv.enemy())
                .with_remaining(duration),
        ))
}

pub(super) fn reset_area(inv: &Invocation<'_>) -> HandlerResult {
    let area = inv.area(inv.target(0)?, 1);
    let changes: Vec<BoardChange> = area
        .cells()
        .into_iter()
        .filter_map(|pos| match inv.board.get(pos)? {
            Cell::Piece(side) => Some(BoardChange::remove(pos, side)),
            Cell::Blocked => Some(BoardChange::unblock(pos)),
            Cell::Empty => None,
        })
        .collect();
    Ok(Proposal::new(format!("reset the area around {}", area.center)).with_changes(changes))
}

/// Permute the mobile pieces of an area over its open cells.
pub(super) fn shuffle_area(inv: &Invocation<'_>) -> HandlerResult {
    let area = inv.area(inv.target(0)?, 1);

    let mut pieces: Vec<(Position, Side)> = Vec::new();
    let mut slots: Vec<Position> = Vec::new();
    for pos in area.cells() {
        match inv.board.get(pos) {
            Some(Cell::Empty) => slots.push(pos),
            Some(Cell::Piece(side)) if inv.is_mobile(pos) => {
                pieces.push((pos, side));
                slots.push(pos);
            }
            _ => {}
        }
    }

    let mut rng = inv.rng();
    rng.shuffle(&mut slots);

    let changes: Vec<BoardChange> = pieces
        .iter()
        .zip(&slots)
        .filter(|((from, _), to)| from != *to)
        .map(|(&(from, side), &to)| BoardChange::moved(from, to, side))
        .collect();
    Ok(Proposal::new(format!("shuffled {} piece(s) around {}", pieces.len(), area.center))
        .with_changes(changes))
}

pub(super) fn clear_row(inv: &Invocation<'_>) -> HandlerResult {
    let row = inv.target(0)?.y;
    let changes = sweep(inv, (0..crate::core::BOARD_SIZE).map(|x| Position::new(x, row)));
    Ok(Proposal::new(format!("cleared row {}", row)).with_changes(changes))
}

pub(super) fn clear_column(inv: &Invocation<'_>) -> HandlerResult {
    let column = inv.target(0)?.x;
    let changes = sweep(inv, (0..crate::core::BOARD_SIZE).map(|y| Position::new(column, y)));
    Ok(Proposal::new(format!("cleared column {}", column)).with_changes(changes))
}

pub(super) fn freeze_area(inv: &Invocation<'_>) -> HandlerResult {
    let area = inv.area(inv.target(0)?, 1);
    let duration = inv.duration(inv.config.durations.status);
    Ok(Proposal::new(format!("froze the opponent's pieces around {}", area.center))
        .with_change(hazard_notice(area, EffectKind::Immobilize))
        .with_effect(
            inv.instance(EffectKind::Immobilize)
                .with_area(area)
                .with_target_side(inv.enemy())
                .with_remaining(duration),
        ))
}
