//! Conflict resolution between proposed changes and active effects.
//!
//! Every destructive change (`remove`, `block`, `convert`, `banish`) with a
//! target cell is screened against three layers, in strict order:
//!
//! 1. **Protection**: a covering `protect_*`/`shield_area`/`dual_protect`/
//!    `destroy_immunity` replaces the change with `shield_blocked`.
//! 2. **Trap**: a `trap_reflect` on the cell replaces it with `trap_trigger`.
//! 3. **Redirect**: a `redirect_damage` whose side filter admits the
//!    occupant rewrites the target cell and emits a `redirect` notice.
//!
//! The first layer that matches wins; later layers are not consulted.
//! Non-destructive changes pass through untouched.

use tracing::trace;

use crate::core::BoardState;

use super::instance::{EffectInstance, EffectKind};
use super::query;
use super::result::{BoardChange, ChangeKind};

/// Screens proposed changes against a list of active effects.
#[derive(Clone, Copy, Debug)]
pub struct ConflictResolver<'a> {
    effects: &'a [EffectInstance],
}

impl<'a> ConflictResolver<'a> {
    #[must_use]
    pub fn new(effects: &'a [EffectInstance]) -> Self {
        Self { effects }
    }

    /// Filter and rewrite `changes` in order.
    ///
    /// `board` is the snapshot the changes were proposed against; occupants
    /// are read from it for side filters.
    #[must_use]
    pub fn resolve(&self, changes: Vec<BoardChange>, board: &BoardState) -> Vec<BoardChange> {
        let mut resolved = Vec::with_capacity(changes.len());
        for change in changes {
            self.resolve_one(change, board, &mut resolved);
        }
        resolved
    }

    fn resolve_one(&self, change: BoardChange, board: &BoardState, out: &mut Vec<BoardChange>) {
        let Some(pos) = change.pos.filter(|_| change.is_destructive()) else {
            out.push(change);
            return;
        };
        let occupant = board.side_at(pos);

        if let Some(shield) = query::protection_at(self.effects, pos, occupant) {
            trace!(?pos, kind = ?change.kind, protection = ?shield.kind, "destructive change blocked");
            out.push(
                BoardChange::notice(ChangeKind::ShieldBlocked, Some(pos))
                    .with_source(shield.id)
                    .with_effect(shield.kind)
                    .with_note(format!("{:?} at {} was blocked", change.kind, pos)),
            );
            return;
        }

        if let Some(trap) = query::trap_at(self.effects, pos) {
            trace!(?pos, kind = ?change.kind, "trap triggered");
            out.push(
                BoardChange::notice(ChangeKind::TrapTrigger, Some(pos))
                    .with_source(trap.id)
                    .with_effect(EffectKind::TrapReflect)
                    .with_note(format!("{:?} at {} sprang a trap", change.kind, pos)),
            );
            return;
        }

        if let Some((redirect, target)) = query::redirect_for(self.effects, pos, occupant) {
            trace!(from = ?pos, to = ?target, kind = ?change.kind, "destructive change redirected");
            let mut rewritten = change;
            rewritten.pos = Some(target);
            rewritten.redirected_from = Some(pos);
            if matches!(rewritten.kind, ChangeKind::Remove | ChangeKind::Banish) {
                rewritten.side = board.side_at(target);
            }

            let mut notice = BoardChange::notice(ChangeKind::Redirect, Some(target))
                .with_source(redirect.id)
                .with_effect(EffectKind::RedirectDamage);
            notice.redirected_from = Some(pos);

            out.push(notice);
            out.push(rewritten);
            return;
        }

        out.push(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayerId, Position, Side};
    use crate::effects::EffectId;

    const OWNER: PlayerId = PlayerId::new(1);

    #[test]
    fn test_non_destructive_pass_through() {
        let board = BoardState::new();
        let effects = vec![EffectInstance::new(EffectKind::ProtectAll, OWNER)];
        let changes = vec![BoardChange::place(Position::new(1, 1), Side::X)];

        let resolved = ConflictResolver::new(&effects).resolve(changes.clone(), &board);
        assert_eq!(resolved, changes);
    }

    #[test]
    fn test_trap_replaces_change() {
        let pos = Position::new(3, 3);
        let board = BoardState::with_pieces([(pos, Side::X)]);
        let mut trap = EffectInstance::new(EffectKind::TrapReflect, OWNER).with_positions([pos]);
        trap.id = Some(EffectId::new(9));

        let resolved =
            ConflictResolver::new(&[trap]).resolve(vec![BoardChange::remove(pos, Side::X)], &board);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].kind, ChangeKind::TrapTrigger);
        assert_eq!(resolved[0].source_effect, Some(EffectId::new(9)));
    }

    #[test]
    fn test_redirect_ignores_other_side() {
        let pos = Position::new(3, 3);
        let board = BoardState::with_pieces([(pos, Side::O)]);
        let redirect = EffectInstance::new(EffectKind::RedirectDamage, OWNER)
            .with_redirect_to(Position::new(10, 10))
            .with_target_side(Side::X);

        let changes = vec![BoardChange::remove(pos, Side::O)];
        let resolved = ConflictResolver::new(&[redirect]).resolve(changes.clone(), &board);
        assert_eq!(resolved, changes);
    }

    #[test]
    fn test_redirect_records_original_cell() {
        let pos = Position::new(3, 3);
        let target = Position::new(10, 10);
        let board = BoardState::with_pieces([(pos, Side::X), (target, Side::O)]);
        let redirect = EffectInstance::new(EffectKind::RedirectDamage, OWNER)
            .with_redirect_to(target)
            .with_target_side(Side::X);

        let resolved =
            ConflictResolver::new(&[redirect]).resolve(vec![BoardChange::remove(pos, Side::X)], &board);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].kind, ChangeKind::Redirect);
        assert_eq!(resolved[1].kind, ChangeKind::Remove);
        assert_eq!(resolved[1].pos, Some(target));
        assert_eq!(resolved[1].redirected_from, Some(pos));
        assert_eq!(resolved[1].side, Some(Side::O));
    }
}
