//! Skill catalog types.
//!
//! ## Key Types
//!
//! - `Skill`: Immutable catalog entry (effect, params, rarity, cost, scaling)
//! - `EffectType`: Closed set of executable effect tags
//! - `EffectParams`: Typed parameter bag with level scaling
//! - `SkillCatalog`: Lookup trait implemented by the owning service

pub mod catalog;
pub mod definition;
pub mod effect_type;
pub mod params;

pub use catalog::{SkillCatalog, SkillRegistry};
pub use definition::{Rarity, Skill, SkillId};
pub use effect_type::{EffectFamily, EffectTag, EffectType, UnknownEffectType};
pub use params::{EffectParams, ParamValue};
