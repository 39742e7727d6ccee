//! Skill catalog access.
//!
//! The catalog itself belongs to the surrounding service. The engine only
//! needs lookup by id, expressed by the [`SkillCatalog`] trait.
//! [`SkillRegistry`] is the in-memory implementation used by tests and by
//! services that load the whole catalog at startup.

use rustc_hash::FxHashMap;

use super::definition::{Rarity, Skill, SkillId};

/// Read access to skill definitions.
pub trait SkillCatalog {
    /// Look up one skill. Unknown or malformed entries return `None`.
    fn get_skill_by_id(&self, id: SkillId) -> Option<Skill>;

    /// Look up several skills, skipping ids that are absent.
    fn get_skills_by_ids(&self, ids: &[SkillId]) -> Vec<Skill> {
        ids.iter().filter_map(|&id| self.get_skill_by_id(id)).collect()
    }
}

/// In-memory skill catalog.
///
/// ## Example
///
/// ```
/// use caro_skills::skills::{EffectType, Skill, SkillCatalog, SkillId, SkillRegistry};
///
/// let mut registry = SkillRegistry::new();
/// registry.register(Skill::new(SkillId::new(1), EffectType::DestroyPiece).with_name("Destroy"));
///
/// let found = registry.get_skill_by_id(SkillId::new(1)).unwrap();
/// assert_eq!(found.name, "Destroy");
/// assert!(registry.get_skill_by_id(SkillId::new(2)).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SkillRegistry {
    skills: FxHashMap<SkillId, Skill>,
}

impl SkillRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a JSON array of skill definitions.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let skills: Vec<Skill> = serde_json::from_str(json)?;
        Ok(skills.into_iter().collect())
    }

    /// Register a skill, returning the definition it replaced, if any.
    pub fn register(&mut self, skill: Skill) -> Option<Skill> {
        self.skills.insert(skill.id, skill)
    }

    /// Get a skill definition by ID.
    #[must_use]
    pub fn get(&self, id: SkillId) -> Option<&Skill> {
        self.skills.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: SkillId) -> bool {
        self.skills.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Iterate over all definitions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    /// Find skills of one rarity.
    pub fn find_by_rarity(&self, rarity: Rarity) -> impl Iterator<Item = &Skill> {
        self.skills.values().filter(move |s| s.rarity == rarity)
    }
}

impl FromIterator<Skill> for SkillRegistry {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        let mut registry = Self::new();
        for skill in iter {
            registry.register(skill);
        }
        registry
    }
}

impl SkillCatalog for SkillRegistry {
    fn get_skill_by_id(&self, id: SkillId) -> Option<Skill> {
        self.get(id).cloned()
    }
}

impl<C: SkillCatalog + ?Sized> SkillCatalog for &C {
    fn get_skill_by_id(&self, id: SkillId) -> Option<Skill> {
        (**self).get_skill_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::EffectType;

    #[test]
    fn test_register_replaces() {
        let mut registry = SkillRegistry::new();

        assert!(registry
            .register(Skill::new(SkillId::new(1), EffectType::BlockCell).with_name("A"))
            .is_none());
        let old = registry
            .register(Skill::new(SkillId::new(1), EffectType::BlockCell).with_name("B"))
            .unwrap();

        assert_eq!(old.name, "A");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(SkillId::new(1)).unwrap().name, "B");
    }

    #[test]
    fn test_get_many_skips_missing() {
        let registry: SkillRegistry = [
            Skill::new(SkillId::new(1), EffectType::BlockCell),
            Skill::new(SkillId::new(2), EffectType::WallLine),
        ]
        .into_iter()
        .collect();

        let found = registry.get_skills_by_ids(&[SkillId::new(2), SkillId::new(9), SkillId::new(1)]);
        let ids: Vec<_> = found.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![SkillId::new(2), SkillId::new(1)]);
    }

    #[test]
    fn test_find_by_rarity() {
        let registry: SkillRegistry = [
            Skill::new(SkillId::new(1), EffectType::BlockCell).with_rarity(Rarity::Rare),
            Skill::new(SkillId::new(2), EffectType::WallLine),
            Skill::new(SkillId::new(3), EffectType::ExtraTurn).with_rarity(Rarity::Rare),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.find_by_rarity(Rarity::Rare).count(), 2);
        assert_eq!(registry.find_by_rarity(Rarity::Legendary).count(), 0);
    }

    #[test]
    fn test_from_json() {
        let registry = SkillRegistry::from_json_str(
            r#"[{"id": 1, "effect_type": "silence"}, {"id": 2, "effect_type": "extra_turn", "rarity": "legendary"}]"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(SkillId::new(2)));
        assert_eq!(registry.get(SkillId::new(2)).unwrap().rarity, Rarity::Legendary);
    }
}
