//! Values handed back to the presentation driver.
//!
//! The engine never animates anything itself. Each call returns a plain
//! record of what happened (tiles moved, merged, spawned) and the driver
//! turns that into visuals and score text.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, Position};
use crate::grid::{Grid, MergeEvent, TileMove};

/// Lifecycle of a game.
///
/// `NotStarted -> InProgress -> GameOver`. `start_game` returns to
/// `InProgress` from any phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    NotStarted,
    InProgress,
    GameOver,
}

/// A tile that appeared on an empty cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpawn {
    pub position: Position,
    pub value: u32,
}

/// Everything a single `apply_move` call did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub direction: Direction,
    /// False when no line could move; nothing else happened in that case.
    pub changed: bool,
    /// Sum of the values produced by merges this move.
    pub score_delta: u64,
    /// Tiles that changed cell, in line order.
    pub moves: Vec<TileMove>,
    pub merges: Vec<MergeEvent>,
    /// The tile added after a changing move.
    pub spawned: Option<TileSpawn>,
    /// The board locked up as a result of this move.
    pub game_over: bool,
}

impl MoveOutcome {
    /// Outcome of a move that did nothing.
    #[must_use]
    pub fn unchanged(direction: Direction) -> Self {
        Self {
            direction,
            changed: false,
            score_delta: 0,
            moves: Vec::new(),
            merges: Vec::new(),
            spawned: None,
            game_over: false,
        }
    }
}

/// Full engine view returned by `start_game` and `GridEngine::state`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub grid: Grid,
    pub score: u64,
    pub high_score: u64,
    pub phase: Phase,
    /// Tiles placed by the call that produced this state (the starting
    /// tiles for `start_game`, empty otherwise).
    pub spawned: Vec<TileSpawn>,
}

impl EngineState {
    /// Is the game over?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

/// History entry for one successful move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based count of successful moves in the game.
    pub turn: u32,
    pub direction: Direction,
    pub score_delta: u64,
    pub spawned: TileSpawn,
}
