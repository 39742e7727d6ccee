//! Blocking handlers: turn empty cells into impassable sentinels and back.

use crate::core::{Cell, Direction};
use crate::effects::result::BoardChange;

use super::{reject, HandlerResult, Invocation, Proposal};

pub(super) fn block_cell(inv: &Invocation<'_>) -> HandlerResult {
    let max = inv.params.count("count", 1).max(1) as usize;
    let cells = inv.targets(1, max)?;
    for &pos in &cells {
        inv.require_empty(pos)?;
    }
    Ok(Proposal::new(format!("blocked {} cell(s)", cells.len()))
        .with_changes(cells.into_iter().map(BoardChange::block)))
}

pub(super) fn unblock_cell(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.target(0)?;
    if inv.board.get(pos) != Some(Cell::Blocked) {
        return reject(format!("{} is not blocked", pos));
    }
    Ok(Proposal::new(format!("unblocked {}", pos)).with_change(BoardChange::unblock(pos)))
}

/// Block every empty cell of a line; occupied cells are skipped.
pub(super) fn wall_line(inv: &Invocation<'_>) -> HandlerResult {
    let start = inv.target(0)?;
    let direction = inv.direction(Some(Direction::Right))?;
    let length = inv.params.count("length", 3).max(1);

    let cells: Vec<_> = inv
        .line(start, direction, length)
        .into_iter()
        .filter(|&p| inv.board.is_empty(p))
        .collect();
    if cells.is_empty() {
        return reject(format!("no empty cell for a wall from {}", start));
    }
    Ok(Proposal::new(format!("raised a wall of {} cell(s)", cells.len()))
        .with_changes(cells.into_iter().map(BoardChange::block)))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{applied, invoke};
    use crate::core::{BoardState, Cell, Direction, PlayerId, Position, Side};
    use crate::effects::ResolutionContext;
    use crate::skills::{EffectParams, EffectType};

    fn ctx() -> ResolutionContext {
        ResolutionContext::new(PlayerId::new(1), Side::X, PlayerId::new(2))
    }

    #[test]
    fn test_block_requires_empty() {
        let pos = Position::new(3, 3);
        let board = BoardState::with_pieces([(pos, Side::O)]);
        let ctx = ctx().with_target(pos);

        assert!(invoke(EffectType::BlockCell, &board, &ctx, EffectParams::new()).is_err());
    }

    #[test]
    fn test_block_then_unblock() {
        let pos = Position::new(3, 3);
        let board = BoardState::new();
        let ctx = ctx().with_target(pos);

        let blocked = applied(
            &board,
            &invoke(EffectType::BlockCell, &board, &ctx, EffectParams::new()).unwrap(),
        );
        assert_eq!(blocked.get(pos), Some(Cell::Blocked));

        let cleared = applied(
            &blocked,
            &invoke(EffectType::UnblockCell, &blocked, &ctx, EffectParams::new()).unwrap(),
        );
        assert_eq!(cleared.get(pos), Some(Cell::Empty));
    }

    #[test]
    fn test_wall_skips_occupied_and_edge() {
        let board = BoardState::with_pieces([(Position::new(13, 0), Side::O)]);
        let ctx = ctx()
            .with_target(Position::new(12, 0))
            .with_direction(Direction::Right);

        let proposal = invoke(EffectType::WallLine, &board, &ctx, EffectParams::new()).unwrap();
        let cells: Vec<_> = proposal.changes.iter().filter_map(|c| c.pos).collect();
        assert_eq!(cells, vec![Position::new(12, 0), Position::new(14, 0)]);
    }
}
