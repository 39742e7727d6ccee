//! Active effect instances.
//!
//! An `EffectInstance` is a temporal or persistent modifier produced by a
//! skill. The dispatcher creates them, the state manager stores them with an
//! id and counts their duration down, and the conflict resolver and queries
//! read them.
//!
//! ## Scope
//!
//! An instance can be scoped by:
//! - `target_side`: only cells occupied by this side are covered
//! - `positions`: an explicit cell set
//! - `area`: a radius-bounded neighbourhood
//! - `target_player`: the player a meta effect applies to (defaults to owner)

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Area, PlayerId, Position, Side};
use crate::skills::{EffectParams, SkillId};

/// Match-unique identifier assigned when an effect is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(pub u64);

impl EffectId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}

/// What an effect instance does.
///
/// Snapshots written by a newer engine may carry kinds this build does not
/// know; they load as `Unknown`, count down and expire normally, and are
/// otherwise inert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    // Protection
    ProtectPiece,
    ProtectAll,
    ShieldArea,
    DualProtect,
    DestroyImmunity,
    TrapReflect,
    RedirectDamage,

    // Hazards and statuses
    BurnArea,
    ZoneBlock,
    StatusSpread,
    Immobilize,
    Banished,

    // Draw and skill control
    LuckBuff,
    DeckLock,
    FreezeSkills,
    Silence,
    EraseSkill,
    RevealHand,

    // Buff control
    BlockFutureBuffs,
    PurgeBuffs,
    CleanseElement,

    // Mana
    ManaGain,
    ManaDrain,
    ManaSteal,
    ManaBoost,

    // Turn and cooldown
    CooldownReduction,
    CooldownIncrease,
    CooldownReset,
    ExtraSkill,
    ExtraTurn,
    SkipTurn,
    ReuseSkill,
    CopySkill,

    #[serde(other)]
    Unknown,
}

impl EffectKind {
    /// Beneficial kinds: dropped under `block_future_buffs`, removed by
    /// `purge_buffs`.
    #[must_use]
    pub const fn is_buff(self) -> bool {
        matches!(
            self,
            EffectKind::ProtectPiece
                | EffectKind::ProtectAll
                | EffectKind::ShieldArea
                | EffectKind::DualProtect
                | EffectKind::DestroyImmunity
                | EffectKind::TrapReflect
                | EffectKind::RedirectDamage
                | EffectKind::LuckBuff
                | EffectKind::ManaGain
                | EffectKind::ManaBoost
                | EffectKind::CooldownReduction
                | EffectKind::CooldownReset
                | EffectKind::ExtraSkill
                | EffectKind::ExtraTurn
                | EffectKind::ReuseSkill
                | EffectKind::CopySkill
        )
    }

    /// Kinds that keep a destructive change from happening at all.
    #[must_use]
    pub const fn is_protection(self) -> bool {
        matches!(
            self,
            EffectKind::ProtectPiece
                | EffectKind::ProtectAll
                | EffectKind::ShieldArea
                | EffectKind::DualProtect
                | EffectKind::DestroyImmunity
        )
    }

    /// Kinds processed once by `apply_effects` and never stored.
    #[must_use]
    pub const fn is_instant(self) -> bool {
        matches!(
            self,
            EffectKind::PurgeBuffs
                | EffectKind::CleanseElement
                | EffectKind::ManaGain
                | EffectKind::ManaDrain
                | EffectKind::ManaSteal
        )
    }
}

/// Element named by element skills and cleanses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Wood,
    Earth,
    Metal,
}

impl Element {
    /// The status this element inflicts (and that its cleanse removes).
    #[must_use]
    pub const fn status(self) -> Status {
        match self {
            Element::Fire => Status::Burn,
            Element::Water => Status::Freeze,
            Element::Wood => Status::Root,
            Element::Earth => Status::Petrify,
            Element::Metal => Status::Rust,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Wood => "wood",
            Element::Earth => "earth",
            Element::Metal => "metal",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "fire" => Some(Element::Fire),
            "water" | "ice" => Some(Element::Water),
            "wood" => Some(Element::Wood),
            "earth" | "stone" => Some(Element::Earth),
            "metal" => Some(Element::Metal),
            _ => None,
        }
    }
}

/// Piece status carried by a `status_spread` effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Burn,
    Freeze,
    Root,
    Petrify,
    Rust,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Burn => "burn",
            Status::Freeze => "freeze",
            Status::Root => "root",
            Status::Petrify => "petrify",
            Status::Rust => "rust",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "burn" => Some(Status::Burn),
            "freeze" => Some(Status::Freeze),
            "root" => Some(Status::Root),
            "petrify" => Some(Status::Petrify),
            "rust" => Some(Status::Rust),
            _ => None,
        }
    }

    /// Statuses that pin a piece in place.
    #[must_use]
    pub const fn immobilizes(self) -> bool {
        matches!(self, Status::Freeze | Status::Root | Status::Petrify)
    }
}

/// Parameter key holding a status name.
pub const STATUS_PARAM: &str = "status";

/// Parameter key holding an element name.
pub const ELEMENT_PARAM: &str = "element";

/// A stored or proposed effect.
///
/// ## Example
///
/// ```
/// use caro_skills::core::{PlayerId, Position, Side};
/// use caro_skills::effects::{EffectInstance, EffectKind};
///
/// let shield = EffectInstance::new(EffectKind::ProtectPiece, PlayerId::new(1))
///     .with_positions([Position::new(7, 7)])
///     .with_target_side(Side::X)
///     .with_remaining(2);
///
/// assert!(shield.covers(Position::new(7, 7), Some(Side::X)));
/// assert!(!shield.covers(Position::new(7, 7), Some(Side::O)));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    /// Assigned by `apply_effects`; `None` until stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EffectId>,

    pub kind: EffectKind,

    pub owner: PlayerId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_player: Option<PlayerId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_side: Option<Side>,

    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub positions: SmallVec<[Position; 4]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<Position>,

    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub skills: SmallVec<[SkillId; 2]>,

    /// Ticks left; `None` lasts until explicitly removed.
    #[serde(default)]
    pub remaining: Option<u32>,

    #[serde(default, skip_serializing_if = "EffectParams::is_empty")]
    pub params: EffectParams,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_skill: Option<SkillId>,
}

impl EffectInstance {
    /// Create an unscoped, permanent instance.
    #[must_use]
    pub fn new(kind: EffectKind, owner: PlayerId) -> Self {
        Self {
            id: None,
            kind,
            owner,
            target_player: None,
            target_side: None,
            positions: SmallVec::new(),
            area: None,
            redirect_to: None,
            skills: SmallVec::new(),
            remaining: None,
            params: EffectParams::default(),
            source_skill: None,
        }
    }

    #[must_use]
    pub fn with_target_player(mut self, player: PlayerId) -> Self {
        self.target_player = Some(player);
        self
    }

    #[must_use]
    pub fn with_target_side(mut self, side: Side) -> Self {
        self.target_side = Some(side);
        self
    }

    #[must_use]
    pub fn with_positions(mut self, positions: impl IntoIterator<Item = Position>) -> Self {
        self.positions.extend(positions);
        self
    }

    #[must_use]
    pub fn with_area(mut self, area: Area) -> Self {
        self.area = Some(area);
        self
    }

    #[must_use]
    pub fn with_redirect_to(mut self, pos: Position) -> Self {
        self.redirect_to = Some(pos);
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: SkillId) -> Self {
        self.skills.push(skill);
        self
    }

    #[must_use]
    pub fn with_remaining(mut self, ticks: u32) -> Self {
        self.remaining = Some(ticks);
        self
    }

    #[must_use]
    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<crate::skills::ParamValue>,
    ) -> Self {
        self.params.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_source_skill(mut self, skill: SkillId) -> Self {
        self.source_skill = Some(skill);
        self
    }

    /// The player this effect applies to: the target if set, else the owner.
    #[must_use]
    pub fn beneficiary(&self) -> PlayerId {
        self.target_player.unwrap_or(self.owner)
    }

    #[must_use]
    pub fn applies_to(&self, player: PlayerId) -> bool {
        self.beneficiary() == player
    }

    /// Whether the effect's cell scope includes `pos`.
    ///
    /// `protect_all` covers the whole board, as does any protection with
    /// neither positions nor an area (its side filter then does the
    /// scoping). Otherwise the area and the explicit position set are both
    /// consulted.
    #[must_use]
    pub fn covers_cell(&self, pos: Position) -> bool {
        let unscoped = self.positions.is_empty() && self.area.is_none();
        if self.kind == EffectKind::ProtectAll || (self.kind.is_protection() && unscoped) {
            return true;
        }
        self.positions.contains(&pos) || self.area.is_some_and(|area| area.contains(pos))
    }

    /// Whether the side filter admits a cell's occupant.
    #[must_use]
    pub fn admits(&self, occupant: Option<Side>) -> bool {
        match self.target_side {
            None => true,
            Some(side) => occupant == Some(side),
        }
    }

    /// Cell scope and side filter together.
    #[must_use]
    pub fn covers(&self, pos: Position, occupant: Option<Side>) -> bool {
        self.covers_cell(pos) && self.admits(occupant)
    }

    /// The status carried by a `status_spread` instance.
    #[must_use]
    pub fn status(&self) -> Option<Status> {
        self.params.text(STATUS_PARAM).and_then(Status::parse)
    }

    /// The element named by a `cleanse_element` instance.
    #[must_use]
    pub fn element(&self) -> Option<Element> {
        self.params.text(ELEMENT_PARAM).and_then(Element::parse)
    }

    /// Every cell this effect currently touches, for notifications.
    #[must_use]
    pub fn footprint(&self) -> Vec<Position> {
        let mut cells: Vec<Position> = self.positions.to_vec();
        if let Some(area) = self.area {
            for pos in area.cells() {
                if !cells.contains(&pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buff_classification() {
        assert!(EffectKind::LuckBuff.is_buff());
        assert!(EffectKind::ProtectAll.is_buff());
        assert!(!EffectKind::Silence.is_buff());
        assert!(!EffectKind::StatusSpread.is_buff());
        assert!(EffectKind::ManaSteal.is_instant());
        assert!(!EffectKind::ManaBoost.is_instant());
    }

    #[test]
    fn test_element_status_mapping() {
        assert_eq!(Element::Fire.status(), Status::Burn);
        assert_eq!(Element::Water.status(), Status::Freeze);
        assert_eq!(Element::Wood.status(), Status::Root);
        assert_eq!(Element::Earth.status(), Status::Petrify);
        assert_eq!(Element::Metal.status(), Status::Rust);
        assert!(Status::Root.immobilizes());
        assert!(!Status::Burn.immobilizes());
    }

    #[test]
    fn test_protect_all_covers_board() {
        let effect =
            EffectInstance::new(EffectKind::ProtectAll, PlayerId::new(1)).with_target_side(Side::O);

        assert!(effect.covers(Position::new(0, 14), Some(Side::O)));
        assert!(!effect.covers(Position::new(0, 14), Some(Side::X)));
        assert!(!effect.covers(Position::new(0, 14), None));
    }

    #[test]
    fn test_side_only_protection_covers_board() {
        let effect =
            EffectInstance::new(EffectKind::ProtectPiece, PlayerId::new(2)).with_target_side(Side::O);

        assert!(effect.covers(Position::new(7, 7), Some(Side::O)));
        assert!(!effect.covers(Position::new(7, 7), Some(Side::X)));

        let burn = EffectInstance::new(EffectKind::BurnArea, PlayerId::new(2));
        assert!(!burn.covers_cell(Position::new(7, 7)));
    }

    #[test]
    fn test_area_scope() {
        let effect = EffectInstance::new(EffectKind::ShieldArea, PlayerId::new(1))
            .with_area(Area::new(Position::new(3, 3), 1));

        assert!(effect.covers(Position::new(4, 4), None));
        assert!(!effect.covers(Position::new(5, 3), None));
        assert_eq!(effect.footprint().len(), 9);
    }

    #[test]
    fn test_beneficiary() {
        let own = EffectInstance::new(EffectKind::LuckBuff, PlayerId::new(1));
        let lock = EffectInstance::new(EffectKind::DeckLock, PlayerId::new(1))
            .with_target_player(PlayerId::new(2));

        assert!(own.applies_to(PlayerId::new(1)));
        assert!(!lock.applies_to(PlayerId::new(1)));
        assert!(lock.applies_to(PlayerId::new(2)));
    }

    #[test]
    fn test_unknown_kind_loads() {
        let effect: EffectInstance =
            serde_json::from_str(r#"{"kind": "time_bubble", "owner": 4, "remaining": 1}"#).unwrap();
        assert_eq!(effect.kind, EffectKind::Unknown);
        assert_eq!(effect.remaining, Some(1));
    }

    #[test]
    fn test_compact_json() {
        let effect = EffectInstance::new(EffectKind::Silence, PlayerId::new(1))
            .with_target_player(PlayerId::new(2))
            .with_remaining(2);
        let json = serde_json::to_value(&effect).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"kind": "silence", "owner": 1, "target_player": 2, "remaining": 2})
        );
    }
}
