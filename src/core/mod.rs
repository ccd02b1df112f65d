//! Core engine types: positions, directions, RNG, configuration, errors.
//!
//! This module holds the value types every other module builds on. None of
//! them know about board contents.

pub mod config;
pub mod error;
pub mod position;
pub mod rng;

pub use config::{EngineConfig, DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_STARTING_TILES};
pub use error::{EngineError, EngineResult};
pub use position::{Direction, Position};
pub use rng::{GameRng, GameRngState};
