//! Closed set of skill effect types.
//!
//! Every executable catalog entry names one of these tags. The dispatcher
//! matches on [`EffectType`] exhaustively, so adding a variant is a
//! compile error until a handler exists for it.
//!
//! Catalog data is read into an [`EffectTag`], which keeps unrecognised
//! tags as text. That lets the dispatcher report catalog/engine drift as a
//! typed failure instead of refusing the whole catalog.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Broad handler family of an effect type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectFamily {
    Placement,
    Removal,
    Area,
    Blocking,
    Chaos,
    Status,
    Protection,
    Utility,
}

/// Error for a tag that names no known effect type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown effect type `{0}`")]
pub struct UnknownEffectType(pub String);

macro_rules! effect_types {
    ($( $variant:ident => $tag:literal, $family:ident; )*) => {
        /// A known effect type.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum EffectType {
            $( $variant, )*
        }

        impl EffectType {
            /// Every effect type, in declaration order.
            pub const ALL: &'static [EffectType] = &[$( EffectType::$variant, )*];

            /// The catalog tag for this type.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( EffectType::$variant => $tag, )*
                }
            }

            /// The handler family this type belongs to.
            #[must_use]
            pub const fn family(self) -> EffectFamily {
                match self {
                    $( EffectType::$variant => EffectFamily::$family, )*
                }
            }
        }

        impl FromStr for EffectType {
            type Err = UnknownEffectType;

            fn from_str(tag: &str) -> Result<Self, Self::Err> {
                match tag {
                    $( $tag => Ok(EffectType::$variant), )*
                    other => Err(UnknownEffectType(other.to_string())),
                }
            }
        }
    };
}

effect_types! {
    // === Placement ===
    PlaceAdjacent => "place_adjacent", Placement;
    PlaceDouble => "place_double", Placement;
    PlaceAnywhere => "place_anywhere", Placement;
    PlaceLine => "place_line", Placement;
    PlaceDiagonal => "place_diagonal", Placement;
    PlaceMirror => "place_mirror", Placement;
    PlaceRandom => "place_random", Placement;
    ExtendLine => "extend_line", Placement;
    FillGap => "fill_gap", Placement;

    // === Removal / displacement ===
    DestroyPiece => "destroy_piece", Removal;
    RemoveEnemy => "remove_enemy", Removal;
    RemoveRandomEnemy => "remove_random_enemy", Removal;
    RemoveLine => "remove_line", Removal;
    UndoEnemyMove => "undo_enemy_move", Removal;
    PushEnemy => "push_enemy", Removal;
    PushChain => "push_chain", Removal;
    PullPiece => "pull_piece", Removal;
    SwapPieces => "swap_pieces", Removal;
    MoveOwnPiece => "move_own_piece", Removal;
    ConvertPiece => "convert_piece", Removal;
    BanishPiece => "banish_piece", Removal;

    // === Area ===
    BombArea => "bomb_area", Area;
    BurnArea => "burn_area", Area;
    ZoneBlock => "zone_block", Area;
    ResetArea => "reset_area", Area;
    ShuffleArea => "shuffle_area", Area;
    ClearRow => "clear_row", Area;
    ClearColumn => "clear_column", Area;
    FreezeArea => "freeze_area", Area;

    // === Blocking ===
    BlockCell => "block_cell", Blocking;
    UnblockCell => "unblock_cell", Blocking;
    WallLine => "wall_line", Blocking;

    // === Chaos ===
    ChaosMove => "chaos_move", Chaos;
    ChaosJump => "chaos_jump", Chaos;
    ChaosBoard => "chaos_board", Chaos;

    // === Status / element ===
    FireSpread => "fire_spread", Status;
    IceSpread => "ice_spread", Status;
    RootSpread => "root_spread", Status;
    StoneSpread => "stone_spread", Status;
    RustSpread => "rust_spread", Status;
    CleanseElement => "cleanse_element", Status;
    ImmobilizePiece => "immobilize_piece", Status;

    // === Protection ===
    ProtectPiece => "protect_piece", Protection;
    ProtectAll => "protect_all", Protection;
    ShieldArea => "shield_area", Protection;
    DualProtect => "dual_protect", Protection;
    DestroyImmunity => "destroy_immunity", Protection;
    TrapReflect => "trap_reflect", Protection;
    RedirectDamage => "redirect_damage", Protection;

    // === Utility / meta ===
    RestoreMana => "restore_mana", Utility;
    DrainMana => "drain_mana", Utility;
    StealMana => "steal_mana", Utility;
    ManaBoost => "mana_boost", Utility;
    SacrificeForMana => "sacrifice_for_mana", Utility;
    FreezeSkills => "freeze_skills", Utility;
    ReduceCooldown => "reduce_cooldown", Utility;
    ResetCooldowns => "reset_cooldowns", Utility;
    IncreaseEnemyCooldown => "increase_enemy_cooldown", Utility;
    TwoSkillsNextTurn => "two_skills_next_turn", Utility;
    ExtraTurn => "extra_turn", Utility;
    SkipEnemyTurn => "skip_enemy_turn", Utility;
    ReuseSkill => "reuse_skill", Utility;
    EraseEnemySkill => "erase_enemy_skill", Utility;
    CopyEnemySkill => "copy_enemy_skill", Utility;
    DeckLock => "deck_lock", Utility;
    LuckBuff => "luck_buff", Utility;
    Silence => "silence", Utility;
    BlockFutureBuffs => "block_future_buffs", Utility;
    PurgeBuffs => "purge_buffs", Utility;
    RevealHand => "reveal_hand", Utility;
}

impl TryFrom<String> for EffectType {
    type Error = UnknownEffectType;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<EffectType> for &'static str {
    fn from(effect: EffectType) -> Self {
        effect.as_str()
    }
}

impl std::fmt::Display for EffectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effect tag as read from catalog data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EffectTag {
    Known(EffectType),
    Unknown(String),
}

impl EffectTag {
    /// The known effect type, if any.
    #[must_use]
    pub fn known(&self) -> Option<EffectType> {
        match self {
            EffectTag::Known(effect) => Some(*effect),
            EffectTag::Unknown(_) => None,
        }
    }

    /// The raw tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            EffectTag::Known(effect) => effect.as_str(),
            EffectTag::Unknown(tag) => tag,
        }
    }
}

impl From<EffectType> for EffectTag {
    fn from(effect: EffectType) -> Self {
        EffectTag::Known(effect)
    }
}

impl From<String> for EffectTag {
    fn from(tag: String) -> Self {
        match tag.parse() {
            Ok(effect) => EffectTag::Known(effect),
            Err(_) => EffectTag::Unknown(tag),
        }
    }
}

impl From<&str> for EffectTag {
    fn from(tag: &str) -> Self {
        EffectTag::from(tag.to_string())
    }
}

impl From<EffectTag> for String {
    fn from(tag: EffectTag) -> Self {
        match tag {
            EffectTag::Known(effect) => effect.as_str().to_string(),
            EffectTag::Unknown(tag) => tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_unique_and_parse_back() {
        let mut seen = std::collections::HashSet::new();
        for &effect in EffectType::ALL {
            assert!(seen.insert(effect.as_str()), "duplicate tag {}", effect);
            assert_eq!(effect.as_str().parse::<EffectType>(), Ok(effect));
        }
        assert_eq!(EffectType::ALL.len(), 70);
    }

    #[test]
    fn test_unknown_tag() {
        let err = "time_warp".parse::<EffectType>().unwrap_err();
        assert_eq!(err, UnknownEffectType("time_warp".to_string()));
        assert_eq!(err.to_string(), "unknown effect type `time_warp`");
    }

    #[test]
    fn test_family() {
        assert_eq!(EffectType::PushChain.family(), EffectFamily::Removal);
        assert_eq!(EffectType::ShieldArea.family(), EffectFamily::Protection);
        assert_eq!(EffectType::DeckLock.family(), EffectFamily::Utility);
    }

    #[test]
    fn test_effect_tag_serde() {
        let known: EffectTag = serde_json::from_str(r#""bomb_area""#).unwrap();
        assert_eq!(known, EffectTag::Known(EffectType::BombArea));

        let unknown: EffectTag = serde_json::from_str(r#""time_warp""#).unwrap();
        assert_eq!(unknown.known(), None);
        assert_eq!(unknown.as_str(), "time_warp");
        assert_eq!(serde_json::to_string(&unknown).unwrap(), r#""time_warp""#);
    }

    #[test]
    fn test_effect_type_serde() {
        let json = serde_json::to_string(&EffectType::PushChain).unwrap();
        assert_eq!(json, r#""push_chain""#);
        let back: EffectType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EffectType::PushChain);
        assert!(serde_json::from_str::<EffectType>(r#""nope""#).is_err());
    }
}
