//! Randomized board disruption.
//!
//! Each handler collects the eligible pieces in scope, shuffles a slot list
//! with the effect's seeded stream and reassigns positions. Immobilized
//! pieces are never eligible.

use crate::core::{Position, Side};
use crate::effects::result::BoardChange;

use super::{reject, HandlerResult, Invocation, Proposal};

/// Move changes sending `pieces[i]` to `slots[i]`, skipping no-ops.
fn relocate(pieces: &[(Position, Side)], slots: &[Position]) -> Vec<BoardChange> {
    pieces
        .iter()
        .zip(slots)
        .filter(|((from, _), to)| from != *to)
        .map(|(&(from, side), &to)| BoardChange::moved(from, to, side))
        .collect()
}

/// Permute the mobile pieces near a target among their own cells.
pub(super) fn chaos_move(inv: &Invocation<'_>) -> HandlerResult {
    let center = match inv.optional_target(0)? {
        Some(pos) => pos,
        None => inv.last_move()?,
    };
    let area = inv.area(center, 2);
    let pieces: Vec<(Position, Side)> = area
        .cells()
        .into_iter()
        .filter(|&p| inv.is_mobile(p))
        .filter_map(|p| inv.board.side_at(p).map(|side| (p, side)))
        .collect();
    if pieces.len() < 2 {
        return reject(format!("not enough pieces around {} to scramble", center));
    }

    let mut slots: Vec<Position> = pieces.iter().map(|&(p, _)| p).collect();
    let mut rng = inv.rng();
    rng.shuffle(&mut slots);

    Ok(Proposal::new(format!("scrambled {} piece(s) around {}", pieces.len(), center))
        .with_changes(relocate(&pieces, &slots)))
}

/// Send random opponent pieces to random empty cells.
pub(super) fn chaos_jump(inv: &Invocation<'_>) -> HandlerResult {
    let count = inv.params.count("count", 1).max(1) as usize;
    let mut pieces: Vec<(Position, Side)> = inv
        .board
        .positions_of(inv.enemy())
        .into_iter()
        .filter(|&p| inv.is_mobile(p))
        .map(|p| (p, inv.enemy()))
        .collect();
    let mut slots = inv.board.empty_positions();
    if pieces.is_empty() || slots.is_empty() {
        return reject("nothing can jump");
    }

    let mut rng = inv.rng();
    rng.shuffle(&mut pieces);
    rng.shuffle(&mut slots);
    pieces.truncate(count);

    Ok(Proposal::new(format!("{} opponent piece(s) jumped", pieces.len()))
        .with_changes(relocate(&pieces, &slots)))
}

/// Roll every mobile piece; losers of the roll are relocated.
///
/// A favorable roll leaves the roller's own piece in place and relocates an
/// opponent piece. The favorable chance grows with luck stacks inside the
/// configured clamp.
pub(super) fn chaos_board(inv: &Invocation<'_>) -> HandlerResult {
    let favorable = inv.config.chaos.favorable(inv.ctx.luck_stacks);
    let mut rng = inv.rng();

    let mut movers: Vec<(Position, Side)> = Vec::new();
    for (pos, side) in inv.board.pieces() {
        if !inv.is_mobile(pos) {
            continue;
        }
        let roll = rng.gen_bool(favorable);
        let relocates = if side == inv.side() { !roll } else { roll };
        if relocates {
            movers.push((pos, side));
        }
    }

    let mut slots = inv.board.empty_positions();
    slots.extend(movers.iter().map(|&(p, _)| p));
    rng.shuffle(&mut slots);

    let changes = relocate(&movers, &slots);
    Ok(Proposal::new(format!(
        "chaos relocated {} of {} rolled piece(s)",
        changes.len(),
        movers.len()
    ))
    .with_changes(changes))
}
