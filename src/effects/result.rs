//! Board change records and dispatcher results.

use serde::{Deserialize, Serialize};

use crate::core::{BoardState, FailureKind, Position, Side};

use super::instance::{EffectId, EffectInstance, EffectKind};

/// Tag of a board change record.
///
/// The first group mutates the board; the rest are notifications the
/// caller forwards to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Place,
    Remove,
    Move,
    Block,
    Unblock,
    Convert,
    Banish,

    Modifier,
    Status,
    ShieldBlocked,
    TrapTrigger,
    Redirect,
    StatusExpire,
    ProtectExpire,
    LuckExpire,
    TrapExpire,
    HazardExpire,
    EffectExpire,
    StatusActive,
    HazardActive,
    EffectActive,
}

impl ChangeKind {
    /// Kinds the conflict resolver screens.
    #[must_use]
    pub const fn is_destructive(self) -> bool {
        matches!(
            self,
            ChangeKind::Remove | ChangeKind::Block | ChangeKind::Convert | ChangeKind::Banish
        )
    }

    /// Kinds that write to the board.
    #[must_use]
    pub const fn mutates_board(self) -> bool {
        matches!(
            self,
            ChangeKind::Place
                | ChangeKind::Remove
                | ChangeKind::Move
                | ChangeKind::Block
                | ChangeKind::Unblock
                | ChangeKind::Convert
                | ChangeKind::Banish
        )
    }
}

/// One proposed or committed board change, or a notification.
///
/// `pos` is the target cell (the source cell for `move`); `to` is only set
/// for moves. `side` is the side written by `place`/`move`/`convert` and
/// the occupant affected by `remove`/`banish`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardChange {
    pub kind: ChangeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Position>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Position>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<Position>,

    /// Stored effect that produced this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_effect: Option<EffectId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<EffectKind>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footprint: Vec<Position>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl BoardChange {
    fn bare(kind: ChangeKind, pos: Option<Position>) -> Self {
        Self {
            kind,
            pos,
            to: None,
            side: None,
            redirected_from: None,
            source_effect: None,
            effect: None,
            footprint: Vec::new(),
            note: None,
        }
    }

    #[must_use]
    pub fn place(pos: Position, side: Side) -> Self {
        Self {
            side: Some(side),
            ..Self::bare(ChangeKind::Place, Some(pos))
        }
    }

    #[must_use]
    pub fn remove(pos: Position, occupant: Side) -> Self {
        Self {
            side: Some(occupant),
            ..Self::bare(ChangeKind::Remove, Some(pos))
        }
    }

    #[must_use]
    pub fn moved(from: Position, to: Position, side: Side) -> Self {
        Self {
            to: Some(to),
            side: Some(side),
            ..Self::bare(ChangeKind::Move, Some(from))
        }
    }

    #[must_use]
    pub fn block(pos: Position) -> Self {
        Self::bare(ChangeKind::Block, Some(pos))
    }

    #[must_use]
    pub fn unblock(pos: Position) -> Self {
        Self::bare(ChangeKind::Unblock, Some(pos))
    }

    /// Turn the piece at `pos` into a piece of `side`.
    #[must_use]
    pub fn convert(pos: Position, side: Side) -> Self {
        Self {
            side: Some(side),
            ..Self::bare(ChangeKind::Convert, Some(pos))
        }
    }

    #[must_use]
    pub fn banish(pos: Position, occupant: Side) -> Self {
        Self {
            side: Some(occupant),
            ..Self::bare(ChangeKind::Banish, Some(pos))
        }
    }

    /// A notification record.
    #[must_use]
    pub fn notice(kind: ChangeKind, pos: Option<Position>) -> Self {
        Self::bare(kind, pos)
    }

    #[must_use]
    pub fn with_source(mut self, id: Option<EffectId>) -> Self {
        self.source_effect = id;
        self
    }

    #[must_use]
    pub fn with_effect(mut self, kind: EffectKind) -> Self {
        self.effect = Some(kind);
        self
    }

    #[must_use]
    pub fn with_footprint(mut self, cells: Vec<Position>) -> Self {
        self.footprint = cells;
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn is_destructive(&self) -> bool {
        self.kind.is_destructive()
    }
}

/// Outcome of executing one skill.
///
/// On failure `board` is the unmodified input and `changes`/`effects` are
/// empty. On success `board` already reflects the conflict-resolved
/// changes; `effects` still need `apply_effects` to be stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillEffectResult {
    pub success: bool,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,

    #[serde(default)]
    pub changes: Vec<BoardChange>,

    pub board: BoardState,

    #[serde(default)]
    pub effects: Vec<EffectInstance>,
}

impl SkillEffectResult {
    #[must_use]
    pub fn failed(kind: FailureKind, message: impl Into<String>, board: &BoardState) -> Self {
        Self {
            success: false,
            message: message.into(),
            failure: Some(kind),
            changes: Vec::new(),
            board: board.clone(),
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn succeeded(
        message: impl Into<String>,
        changes: Vec<BoardChange>,
        board: BoardState,
        effects: Vec<EffectInstance>,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            failure: None,
            changes,
            board,
            effects,
        }
    }

    /// Stable failure code, if the skill failed.
    #[must_use]
    pub fn failure_code(&self) -> Option<&'static str> {
        self.failure.map(FailureKind::code)
    }

    /// Records of one kind.
    pub fn changes_of(&self, kind: ChangeKind) -> impl Iterator<Item = &BoardChange> {
        self.changes.iter().filter(move |c| c.kind == kind)
    }
}
