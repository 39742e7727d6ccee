//! Engine bindings. Every structured value crosses the boundary as JSON.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::{BoardState, EngineConfig, EngineError, PlayerId};
use crate::draw::{TurnDrawRequest, TurnSkillRandomizer};
use crate::effects::{EffectInstance, ResolutionContext, SkillEngine};
use crate::skills::{SkillId, SkillRegistry};
use crate::state::{EffectStateManager, JsonFileStore, MatchSkillState, MemoryStateStore, SkillStateStore};

fn from_json<T: DeserializeOwned>(what: &str, json: &str) -> PyResult<T> {
    serde_json::from_str(json)
        .map_err(|e| PyErr::new::<PyValueError, _>(format!("invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyErr::new::<PyValueError, _>(format!("{}", e)))
}

fn engine_err(e: EngineError) -> PyErr {
    PyErr::new::<PyValueError, _>(format!("{}: {}", e.code(), e))
}

fn config_from(json: Option<&str>) -> PyResult<EngineConfig> {
    match json {
        Some(json) => EngineConfig::from_json_str(json)
            .map_err(|e| PyErr::new::<PyValueError, _>(format!("invalid config JSON: {}", e))),
        None => Ok(EngineConfig::default()),
    }
}

fn catalog_from(json: Option<&str>) -> PyResult<SkillRegistry> {
    match json {
        Some(json) => SkillRegistry::from_json_str(json)
            .map_err(|e| PyErr::new::<PyValueError, _>(format!("invalid catalog JSON: {}", e))),
        None => Ok(SkillRegistry::new()),
    }
}

/// Skill dispatcher over a JSON catalog.
#[pyclass(name = "SkillEngine")]
pub struct PySkillEngine {
    inner: SkillEngine<SkillRegistry>,
}

#[pymethods]
impl PySkillEngine {
    #[new]
    #[pyo3(signature = (catalog_json, config_json = None))]
    fn new(catalog_json: &str, config_json: Option<&str>) -> PyResult<Self> {
        Ok(Self {
            inner: SkillEngine::with_config(catalog_from(Some(catalog_json))?, config_from(config_json)?),
        })
    }

    /// Execute a skill; returns the `SkillEffectResult` as JSON.
    fn execute(&self, skill_id: u32, board_json: &str, context_json: &str) -> PyResult<String> {
        let board: BoardState = from_json("board", board_json)?;
        let ctx: ResolutionContext = from_json("context", context_json)?;
        to_json(&self.inner.execute(SkillId::new(skill_id), &board, &ctx))
    }

    fn __len__(&self) -> usize {
        self.inner.catalog().len()
    }
}

/// Effect state manager over a snapshot directory, or memory if none.
#[pyclass(name = "EffectStateManager")]
pub struct PyEffectStateManager {
    inner: EffectStateManager<Box<dyn SkillStateStore + Send>>,
}

#[pymethods]
impl PyEffectStateManager {
    #[new]
    #[pyo3(signature = (directory = None, config_json = None))]
    fn new(directory: Option<String>, config_json: Option<&str>) -> PyResult<Self> {
        let store: Box<dyn SkillStateStore + Send> = match directory {
            Some(dir) => Box::new(JsonFileStore::new(dir)),
            None => Box::new(MemoryStateStore::new()),
        };
        Ok(Self {
            inner: EffectStateManager::with_config(store, config_from(config_json)?),
        })
    }

    fn load(&self, match_id: &str) -> PyResult<String> {
        to_json(&self.inner.load(match_id).map_err(engine_err)?)
    }

    fn save(&mut self, match_id: &str, state_json: &str) -> PyResult<String> {
        let state: MatchSkillState = from_json("state", state_json)?;
        to_json(&self.inner.save(match_id, &state).map_err(engine_err)?)
    }

    /// Returns `{"state": ..., "changes": [...]}` as JSON.
    fn tick(&mut self, match_id: &str, player: u64, board_json: &str) -> PyResult<String> {
        let board: BoardState = from_json("board", board_json)?;
        let outcome = self
            .inner
            .tick(match_id, PlayerId::new(player), &board)
            .map_err(engine_err)?;
        to_json(&outcome)
    }

    fn apply_effects(&self, state_json: &str, effects_json: &str, owner: u64) -> PyResult<String> {
        let state: MatchSkillState = from_json("state", state_json)?;
        let effects: Vec<EffectInstance> = from_json("effects", effects_json)?;
        to_json(&self.inner.apply_effects(&state, effects, PlayerId::new(owner)))
    }

    /// Raises `ValueError("insufficient_mana: ...")` when the balance is short.
    fn deduct_mana(&self, state_json: &str, player: u64, cost: u32) -> PyResult<String> {
        let state: MatchSkillState = from_json("state", state_json)?;
        let next = self
            .inner
            .deduct_mana(&state, PlayerId::new(player), cost)
            .map_err(engine_err)?;
        to_json(&next)
    }

    /// `(luck_stacks, lock_count)` for a player.
    fn compute_modifiers(&self, state_json: &str, player: u64) -> PyResult<(u32, u32)> {
        let state: MatchSkillState = from_json("state", state_json)?;
        let modifiers = self.inner.compute_modifiers(&state, PlayerId::new(player));
        Ok((modifiers.luck_stacks, modifiers.lock_count))
    }
}

/// Turn hand generator.
#[pyclass(name = "TurnSkillRandomizer")]
pub struct PyTurnSkillRandomizer {
    inner: TurnSkillRandomizer,
    catalog: SkillRegistry,
}

#[pymethods]
impl PyTurnSkillRandomizer {
    #[new]
    #[pyo3(signature = (catalog_json = None, config_json = None))]
    fn new(catalog_json: Option<&str>, config_json: Option<&str>) -> PyResult<Self> {
        Ok(Self {
            inner: TurnSkillRandomizer::new(config_from(config_json)?),
            catalog: catalog_from(catalog_json)?,
        })
    }

    fn generate_turn_skills(&self, request_json: &str) -> PyResult<Vec<u32>> {
        let request: TurnDrawRequest = from_json("draw request", request_json)?;
        Ok(self
            .inner
            .generate_turn_skills(&request, &self.catalog)
            .into_iter()
            .map(SkillId::raw)
            .collect())
    }

    #[staticmethod]
    fn get_seed(match_id: &str) -> u64 {
        TurnSkillRandomizer::get_seed(match_id)
    }
}
