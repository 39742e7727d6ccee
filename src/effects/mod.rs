//! Skill effects: dispatch, conflict resolution and active-effect queries.
//!
//! - `SkillEngine`: executes a catalog skill against a board snapshot
//! - `ConflictResolver`: screens destructive changes against active effects
//! - `EffectInstance`: a stored temporal modifier
//! - `BoardChange`: one proposed or committed mutation, or a notification
//! - [`query`]: read-only scans over an effect list
//!
//! Handlers never mutate their inputs. The caller commits the returned
//! board and passes the returned effects to the state manager.

mod conflict;
mod context;
mod dispatcher;
mod handlers;
mod instance;
pub mod query;
mod result;

pub use conflict::ConflictResolver;
pub use context::ResolutionContext;
pub use dispatcher::SkillEngine;
pub use instance::{EffectId, EffectInstance, EffectKind, Element, Status, ELEMENT_PARAM, STATUS_PARAM};
pub use result::{BoardChange, ChangeKind, SkillEffectResult};
