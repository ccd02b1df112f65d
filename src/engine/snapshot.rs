//! In-memory checkpoints of a running game.
//!
//! A snapshot captures the board, score, phase, move history and RNG
//! stream position, so restoring one replays identically from that point.
//! The high score stays with the engine and is not part of a snapshot.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::outcome::{MoveRecord, Phase};
use crate::core::{EngineError, EngineResult, GameRngState};
use crate::grid::Grid;

/// Serializable engine checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub grid: Grid,
    pub score: u64,
    pub phase: Phase,
    pub turn: u32,
    pub rng: GameRngState,
    pub history: Vector<MoveRecord>,
}

impl EngineSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> EngineResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    /// Decode bytes produced by `to_bytes` and check the board.
    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        let snapshot: Self =
            bincode::deserialize(bytes).map_err(|e| EngineError::Snapshot(e.to_string()))?;
        snapshot.grid.validate()?;
        Ok(snapshot)
    }
}
