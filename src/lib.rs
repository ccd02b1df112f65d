//! # tile-merge
//!
//! A deterministic grid engine for sliding-tile merge puzzles (2048-style).
//!
//! ## Design Principles
//!
//! 1. **Pure state transitions**: the engine takes a direction and returns
//!    what happened. Rendering, animation timing and input throttling belong
//!    to the caller.
//!
//! 2. **Symmetric moves**: all four directions run the same line algorithm,
//!    reading each line from the edge the board slides toward.
//!
//! 3. **Seeded randomness**: tile values and spawn positions come from a
//!    ChaCha8 stream, so a seed reproduces a whole game.
//!
//! ## Modules
//!
//! - `core`: Positions, directions, RNG, configuration, errors
//! - `grid`: Cell arena and the slide/merge algorithm
//! - `engine`: Game lifecycle, outcomes, history, snapshots

pub mod core;
pub mod engine;
pub mod grid;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Direction, EngineConfig, EngineError, EngineResult, GameRng, GameRngState, Position,
};

pub use crate::grid::{Grid, MergeEvent, TileMove};

pub use crate::engine::{
    EngineSnapshot, EngineState, GridEngine, MoveOutcome, MoveRecord, Phase, TileSpawn,
};
