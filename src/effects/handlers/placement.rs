//! Placement handlers: put new pieces of the acting side on the board.
//!
//! Every destination must be placeable: empty, not burning and not inside
//! a zone blocked for the acting side.

use crate::core::{Direction, Position};
use crate::effects::result::BoardChange;

use super::{reject, HandlerResult, Invocation, Proposal};

fn placed(inv: &Invocation<'_>, cells: &[Position]) -> Proposal {
    let names: Vec<String> = cells.iter().map(ToString::to_string).collect();
    Proposal::new(format!("placed at {}", names.join(", ")))
        .with_changes(cells.iter().map(|&pos| BoardChange::place(pos, inv.side())))
}

pub(super) fn place_adjacent(inv: &Invocation<'_>) -> HandlerResult {
    let anchor = inv.last_move()?;
    let pos = match inv.optional_target(0)? {
        Some(pos) => {
            if !pos.is_adjacent(anchor) {
                return reject(format!("{} is not adjacent to {}", pos, anchor));
            }
            inv.require_placeable(pos)?;
            pos
        }
        None => match anchor.neighbors().find(|&p| inv.is_placeable(p)) {
            Some(pos) => pos,
            None => return reject(format!("no empty cell next to {}", anchor)),
        },
    };
    Ok(placed(inv, &[pos]))
}

pub(super) fn place_double(inv: &Invocation<'_>) -> HandlerResult {
    let cells = inv.targets(2, 2)?;
    let distance = inv.params.int("distance", 1);
    for &pos in &cells {
        inv.require_placeable(pos)?;
    }
    if i64::from(cells[0].chebyshev(cells[1])) > distance {
        return reject(format!(
            "{} and {} are more than {} apart",
            cells[0], cells[1], distance
        ));
    }
    Ok(placed(inv, &cells))
}

pub(super) fn place_anywhere(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.target(0)?;
    inv.require_placeable(pos)?;
    Ok(placed(inv, &[pos]))
}

pub(super) fn place_line(inv: &Invocation<'_>) -> HandlerResult {
    let start = inv.target(0)?;
    let direction = inv.direction(Some(Direction::Right))?;
    let length = inv.params.count("length", 2).max(1);

    let cells = inv.line(start, direction, length);
    if cells.len() < length as usize {
        return reject(format!("a line of {} from {} leaves the board", length, start));
    }
    for &pos in &cells {
        inv.require_placeable(pos)?;
    }
    Ok(placed(inv, &cells))
}

pub(super) fn place_diagonal(inv: &Invocation<'_>) -> HandlerResult {
    let anchor = inv.last_move()?;
    let pos = match inv.optional_target(0)? {
        Some(pos) => {
            let diagonal = pos.is_adjacent(anchor) && pos.x != anchor.x && pos.y != anchor.y;
            if !diagonal {
                return reject(format!("{} is not diagonal to {}", pos, anchor));
            }
            inv.require_placeable(pos)?;
            pos
        }
        None => {
            let found = Direction::ALL
                .into_iter()
                .filter(|d| d.is_diagonal())
                .filter_map(|d| anchor.step(d))
                .find(|&p| inv.is_placeable(p));
            match found {
                Some(pos) => pos,
                None => return reject(format!("no empty diagonal next to {}", anchor)),
            }
        }
    };
    Ok(placed(inv, &[pos]))
}

pub(super) fn place_mirror(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.last_enemy_move()?.mirrored();
    inv.require_placeable(pos)?;
    Ok(placed(inv, &[pos]))
}

pub(super) fn place_random(inv: &Invocation<'_>) -> HandlerResult {
    let anchor = inv.last_move()?;
    let candidates: Vec<Position> = inv
        .area(anchor, 2)
        .cells()
        .into_iter()
        .filter(|&p| inv.is_placeable(p))
        .collect();

    let mut rng = inv.rng();
    match rng.choose(&candidates) {
        Some(&pos) => Ok(placed(inv, &[pos])),
        None => reject(format!("no empty cell near {}", anchor)),
    }
}

pub(super) fn extend_line(inv: &Invocation<'_>) -> HandlerResult {
    let anchor = inv.last_move()?;
    inv.require_own(anchor)?;

    let explicit = inv.direction(None).ok();
    let directions: Vec<Direction> = match explicit {
        Some(direction) => vec![direction],
        None => Direction::ALL
            .into_iter()
            .filter(|&d| anchor.step(d).is_some_and(|p| inv.board.is_side(p, inv.side())))
            .collect(),
    };

    for direction in directions {
        let mut cursor = anchor.step(direction);
        while let Some(pos) = cursor {
            if !inv.board.is_side(pos, inv.side()) {
                break;
            }
            cursor = pos.step(direction);
        }
        if let Some(end) = cursor.filter(|&p| inv.is_placeable(p)) {
            return Ok(placed(inv, &[end]));
        }
    }
    reject(format!("no open end to extend from {}", anchor))
}

pub(super) fn fill_gap(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.target(0)?;
    inv.require_placeable(pos)?;

    let own = |p: Option<Position>| p.is_some_and(|p| inv.board.is_side(p, inv.side()));
    let bridged = Direction::AXES
        .into_iter()
        .any(|d| own(pos.step(d)) && own(pos.step(d.opposite())));
    if !bridged {
        return reject(format!("{} is not between two of your pieces", pos));
    }
    Ok(placed(inv, &[pos]))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{applied, invoke};
    use crate::core::{BoardState, Cell, PlayerId, Position, Side};
    use crate::effects::{EffectInstance, EffectKind, ResolutionContext};
    use crate::skills::{EffectParams, EffectType};

    fn ctx() -> ResolutionContext {
        ResolutionContext::new(PlayerId::new(1), Side::X, PlayerId::new(2))
    }

    #[test]
    fn test_place_adjacent_picks_first_free_neighbor() {
        let anchor = Position::new(7, 7);
        let board = BoardState::with_pieces([(anchor, Side::X), (Position::new(7, 6), Side::O)]);
        let ctx = ctx().with_last_move(anchor);

        let proposal = invoke(EffectType::PlaceAdjacent, &board, &ctx, EffectParams::new()).unwrap();
        let next = applied(&board, &proposal);

        // Up is taken, so the clockwise scan lands on up-right.
        assert!(next.is_side(Position::new(8, 6), Side::X));
    }

    #[test]
    fn test_place_adjacent_fails_when_surrounded() {
        let anchor = Position::new(0, 0);
        let board = BoardState::with_pieces([
            (anchor, Side::X),
            (Position::new(1, 0), Side::O),
            (Position::new(0, 1), Side::O),
            (Position::new(1, 1), Side::O),
        ]);
        let ctx = ctx().with_last_move(anchor);

        let err = invoke(EffectType::PlaceAdjacent, &board, &ctx, EffectParams::new()).unwrap_err();
        assert!(err.0.contains("no empty cell"));
    }

    #[test]
    fn test_place_double_distance() {
        let board = BoardState::new();
        let far = ctx().with_targets([Position::new(1, 1), Position::new(4, 1)]);
        assert!(invoke(EffectType::PlaceDouble, &board, &far, EffectParams::new()).is_err());

        let near = ctx().with_targets([Position::new(1, 1), Position::new(2, 2)]);
        let proposal = invoke(EffectType::PlaceDouble, &board, &near, EffectParams::new()).unwrap();
        assert_eq!(proposal.changes.len(), 2);
    }

    #[test]
    fn test_place_refuses_burning_cell() {
        let pos = Position::new(5, 5);
        let burn = EffectInstance::new(EffectKind::BurnArea, PlayerId::new(2))
            .with_area(crate::core::Area::new(pos, 1));
        let ctx = ctx().with_target(pos).with_active_effects([burn]);

        let err =
            invoke(EffectType::PlaceAnywhere, &BoardState::new(), &ctx, EffectParams::new()).unwrap_err();
        assert!(err.0.contains("burning"));
    }

    #[test]
    fn test_place_line_off_board() {
        let ctx = ctx().with_target(Position::new(14, 3));
        let params = EffectParams::new().with("direction", "right");

        assert!(invoke(EffectType::PlaceLine, &BoardState::new(), &ctx, params).is_err());
    }

    #[test]
    fn test_place_mirror() {
        let mut board = BoardState::new();
        board.set(Position::new(2, 3), Cell::Piece(Side::O));
        let ctx = ctx().with_last_enemy_move(Position::new(2, 3));

        let proposal = invoke(EffectType::PlaceMirror, &board, &ctx, EffectParams::new()).unwrap();
        assert!(applied(&board, &proposal).is_side(Position::new(12, 11), Side::X));
    }

    #[test]
    fn test_place_random_is_deterministic() {
        let anchor = Position::new(7, 7);
        let board = BoardState::with_pieces([(anchor, Side::X)]);
        let ctx = ctx().with_last_move(anchor).with_match_seed(99).with_turn(4);

        let a = invoke(EffectType::PlaceRandom, &board, &ctx, EffectParams::new()).unwrap();
        let b = invoke(EffectType::PlaceRandom, &board, &ctx, EffectParams::new()).unwrap();
        assert_eq!(a.changes, b.changes);

        let pos = a.changes[0].pos.unwrap();
        assert!(pos.chebyshev(anchor) <= 2);
        assert!(board.is_empty(pos));
    }

    #[test]
    fn test_extend_line_and_fill_gap() {
        let board = BoardState::with_pieces([
            (Position::new(3, 3), Side::X),
            (Position::new(4, 3), Side::X),
            (Position::new(6, 3), Side::X),
        ]);

        let ctx = ctx().with_last_move(Position::new(3, 3));
        let params = EffectParams::new().with("direction", "right");
        let proposal = invoke(EffectType::ExtendLine, &board, &ctx, params).unwrap();
        assert_eq!(proposal.changes[0].pos, Some(Position::new(5, 3)));

        let ctx = self::ctx().with_target(Position::new(5, 3));
        assert!(invoke(EffectType::FillGap, &board, &ctx, EffectParams::new()).is_ok());

        let ctx = self::ctx().with_target(Position::new(5, 5));
        assert!(invoke(EffectType::FillGap, &board, &ctx, EffectParams::new()).is_err());
    }
}
