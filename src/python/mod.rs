//! Python bindings for the caro-skills engine.
//!
//! The match service is written in Python; these bindings let it call the
//! engine in-process. Boards, contexts, snapshots and results cross the
//! boundary as JSON strings in the same shape the serde types produce.
//!
//! # Quick Start
//!
//! ```python
//! import caro_skills as cs
//!
//! engine = cs.SkillEngine(open("skills.json").read())
//! result = json.loads(engine.execute(12, board_json, context_json))
//!
//! states = cs.EffectStateManager(directory="/var/lib/caro/skills")
//! outcome = json.loads(states.tick("match-1", 7, board_json))
//!
//! draw = cs.TurnSkillRandomizer(open("skills.json").read())
//! hand = draw.generate_turn_skills(request_json)
//! ```

use pyo3::prelude::*;

mod py_engine;

pub use py_engine::*;

/// caro_skills: skill and effect engine for Caro matches.
#[pymodule]
fn caro_skills(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySkillEngine>()?;
    m.add_class::<PyEffectStateManager>()?;
    m.add_class::<PyTurnSkillRandomizer>()?;
    Ok(())
}
