//! The skill engine: catalog lookup, handler dispatch and conflict
//! resolution.
//!
//! `execute` never panics and never returns `Err`. Every outcome is a
//! [`SkillEffectResult`]; failures carry a [`FailureKind`] and the input
//! board unchanged.
//!
//! ## Pipeline
//!
//! 1. Look the skill up in the catalog (`NotFound` if absent)
//! 2. Resolve its effect tag (`UnknownEffect` if this build lacks it)
//! 3. Refuse silenced players
//! 4. Scale parameters by the caller's level and run the handler
//! 5. Screen destructive changes through the [`ConflictResolver`]
//! 6. Apply the surviving changes to a copy of the board

use tracing::{debug, warn};

use crate::core::{BoardState, EngineConfig, FailureKind};
use crate::skills::{EffectTag, SkillCatalog, SkillId};

use super::conflict::ConflictResolver;
use super::context::ResolutionContext;
use super::handlers::{self, Invocation};
use super::instance::{EffectInstance, EffectKind};
use super::query;
use super::result::{BoardChange, ChangeKind, SkillEffectResult};

/// Executes skills from a catalog.
///
/// ## Example
///
/// ```
/// use caro_skills::core::{BoardState, PlayerId, Position, Side};
/// use caro_skills::effects::{ResolutionContext, SkillEngine};
/// use caro_skills::skills::{EffectType, Skill, SkillId, SkillRegistry};
///
/// let mut catalog = SkillRegistry::new();
/// catalog.register(Skill::new(SkillId::new(1), EffectType::DestroyPiece));
/// let engine = SkillEngine::new(catalog);
///
/// let board = BoardState::with_pieces([(Position::new(7, 7), Side::O)]);
/// let ctx = ResolutionContext::new(PlayerId::new(1), Side::X, PlayerId::new(2))
///     .with_target(Position::new(7, 7));
///
/// let result = engine.execute(SkillId::new(1), &board, &ctx);
/// assert!(result.success);
/// assert!(result.board.is_empty(Position::new(7, 7)));
/// ```
#[derive(Clone, Debug)]
pub struct SkillEngine<C> {
    catalog: C,
    config: EngineConfig,
}

impl<C: SkillCatalog> SkillEngine<C> {
    /// Create an engine with default policy.
    pub fn new(catalog: C) -> Self {
        Self::with_config(catalog, EngineConfig::default())
    }

    pub fn with_config(catalog: C, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute one skill against a board snapshot.
    #[must_use]
    pub fn execute(
        &self,
        skill_id: SkillId,
        board: &BoardState,
        ctx: &ResolutionContext,
    ) -> SkillEffectResult {
        let Some(skill) = self.catalog.get_skill_by_id(skill_id) else {
            return SkillEffectResult::failed(
                FailureKind::NotFound,
                format!("{} not found", skill_id),
                board,
            );
        };

        let effect = match &skill.effect {
            EffectTag::Known(effect) => *effect,
            EffectTag::Unknown(tag) => {
                warn!(%skill_id, tag = %tag, "catalog names an unknown effect type");
                return SkillEffectResult::failed(
                    FailureKind::UnknownEffect,
                    format!("unknown effect type '{}' on {}", tag, skill_id),
                    board,
                );
            }
        };

        if query::is_silenced(&ctx.active_effects, ctx.player) {
            return SkillEffectResult::failed(
                FailureKind::Silenced,
                format!("{} is silenced", ctx.player),
                board,
            );
        }

        let inv = Invocation {
            effect,
            skill: skill_id,
            board,
            ctx,
            params: skill.scaled_params(ctx.level),
            config: &self.config,
        };

        let proposal = match handlers::run(&inv) {
            Ok(proposal) => proposal,
            Err(rejection) => {
                debug!(%skill_id, %effect, reason = %rejection, "skill rejected");
                return SkillEffectResult::failed(FailureKind::InvalidInput, rejection.0, board);
            }
        };

        let changes = ConflictResolver::new(&ctx.active_effects).resolve(proposal.changes, board);
        let effects = reconcile_banished(proposal.effects, &changes);

        let mut next = board.clone();
        next.apply_changes(&changes);

        debug!(
            %skill_id,
            %effect,
            player = %ctx.player,
            changes = changes.len(),
            effects = effects.len(),
            "skill executed"
        );
        SkillEffectResult::succeeded(proposal.message, changes, next, effects)
    }
}

/// Keep `banished` effects in step with the banish changes that survived.
///
/// A blocked banish drops its effect. A redirected banish moves the effect
/// to the cell that was actually emptied, or drops it if that cell was
/// already empty.
fn reconcile_banished(effects: Vec<EffectInstance>, changes: &[BoardChange]) -> Vec<EffectInstance> {
    effects
        .into_iter()
        .filter_map(|mut effect| {
            if effect.kind != EffectKind::Banished {
                return Some(effect);
            }
            let origin = effect.positions.first().copied()?;
            let banish = changes.iter().find(|c| {
                c.kind == ChangeKind::Banish
                    && (c.redirected_from == Some(origin)
                        || (c.redirected_from.is_none() && c.pos == Some(origin)))
            })?;
            if banish.redirected_from.is_some() {
                let (pos, side) = (banish.pos?, banish.side?);
                effect.positions.clear();
                effect.positions.push(pos);
                effect.target_side = Some(side);
            }
            Some(effect)
        })
        .collect()
}
