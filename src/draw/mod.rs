//! Turn skill draws.
//!
//! `TurnSkillRandomizer` picks the skills offered to a player each turn
//! from their deck, honoring cooldowns, held cards, deck locks and luck.

mod randomizer;

pub use randomizer::{TurnDrawRequest, TurnSkillRandomizer};
