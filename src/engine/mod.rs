//! Game engine for the sliding-tile merge puzzle.
//!
//! `GridEngine` owns the board and drives a game through
//! `NotStarted -> InProgress -> GameOver`:
//! - `start_game` resets the board and places the starting tiles
//! - `apply_move` slides, merges, scores and spawns
//! - queries (`query_cell`, `score`, `high_score`, `is_over`) read state
//!
//! Each call returns a structured outcome for the presentation layer to
//! animate; the engine holds no display state.

pub mod game;
pub mod outcome;
pub mod snapshot;

pub use game::GridEngine;
pub use outcome::{EngineState, MoveOutcome, MoveRecord, Phase, TileSpawn};
pub use snapshot::EngineSnapshot;
