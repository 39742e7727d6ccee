//! Status and element handlers.
//!
//! The five element spreads share one primitive: seed a status on the
//! target opponent piece and up to `spread` occupied orthogonal neighbours.
//! The state manager's tick grows the footprint one cell at a time up to
//! `max_cells`.

use crate::effects::instance::{Element, EffectKind, Status, ELEMENT_PARAM, STATUS_PARAM};
use crate::effects::result::{BoardChange, ChangeKind};
use crate::skills::EffectType;

use super::{reject, HandlerResult, Invocation, Proposal};

fn status_for(effect: EffectType) -> Option<Status> {
    match effect {
        EffectType::FireSpread => Some(Status::Burn),
        EffectType::IceSpread => Some(Status::Freeze),
        EffectType::RootSpread => Some(Status::Root),
        EffectType::StoneSpread => Some(Status::Petrify),
        EffectType::RustSpread => Some(Status::Rust),
        _ => None,
    }
}

pub(super) fn status_spread(inv: &Invocation<'_>) -> HandlerResult {
    let Some(status) = status_for(inv.effect) else {
        return reject(format!("{} carries no status", inv.effect));
    };
    let origin = inv.target(0)?;
    inv.require_enemy(origin)?;

    let spread = inv.params.count("spread", 2) as usize;
    let max_cells = inv.params.count("max_cells", 6).max(1);

    let mut cells = vec![origin];
    cells.extend(
        origin
            .orthogonal_neighbors()
            .filter(|&p| inv.board.is_side(p, inv.enemy()))
            .take(spread),
    );
    cells.truncate(max_cells as usize);

    let duration = inv.duration(inv.config.durations.status);
    Ok(Proposal::new(format!("{} spreads from {}", status.as_str(), origin))
        .with_change(
            BoardChange::notice(ChangeKind::Status, Some(origin))
                .with_effect(EffectKind::StatusSpread)
                .with_footprint(cells.clone())
                .with_note(status.as_str()),
        )
        .with_effect(
            inv.instance(EffectKind::StatusSpread)
                .with_positions(cells)
                .with_target_side(inv.enemy())
                .with_param(STATUS_PARAM, status.as_str())
                .with_param("max_cells", max_cells)
                .with_remaining(duration),
        ))
}

/// Clear `status_spread` effects of one element; processed by `apply_effects`.
pub(super) fn cleanse_element(inv: &Invocation<'_>) -> HandlerResult {
    let element = inv
        .ctx
        .element
        .or_else(|| inv.params.text(ELEMENT_PARAM).and_then(Element::parse));
    let Some(element) = element else {
        return reject("cleanse_element needs an element");
    };

    Ok(Proposal::new(format!("cleansed {}", element.status().as_str()))
        .with_change(
            BoardChange::notice(ChangeKind::Modifier, None)
                .with_effect(EffectKind::CleanseElement)
                .with_note(element.as_str()),
        )
        .with_effect(
            inv.instance(EffectKind::CleanseElement)
                .with_param(ELEMENT_PARAM, element.as_str())
                .with_remaining(0),
        ))
}

pub(super) fn immobilize_piece(inv: &Invocation<'_>) -> HandlerResult {
    let pos = inv.target(0)?;
    inv.require_enemy(pos)?;
    let duration = inv.duration(inv.config.durations.status);

    Ok(Proposal::new(format!("the piece at {} cannot move", pos))
        .with_change(
            BoardChange::notice(ChangeKind::Status, Some(pos)).with_effect(EffectKind::Immobilize),
        )
        .with_effect(
            inv.instance(EffectKind::Immobilize)
                .with_positions([pos])
                .with_remaining(duration),
        ))
}
