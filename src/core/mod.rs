//! Core engine types: board, players, RNG, configuration, errors.
//!
//! Everything here is independent of the skill catalog. Handlers and the
//! state manager build on these types.

pub mod board;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use board::{Area, BoardState, Cell, Direction, Position, Side, BOARD_SIZE};
pub use config::{ChaosOdds, Durations, EngineConfig, HoldCosts, LuckWeights};
pub use error::{EngineError, EngineResult, FailureKind};
pub use player::PlayerId;
pub use rng::{derive_seed, match_seed, GameRng};
