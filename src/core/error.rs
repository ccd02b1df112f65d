//! Engine error type.
//!
//! Every fallible engine operation returns `EngineResult<T>`. Errors are
//! reported before any state is touched, so a rejected call leaves the
//! engine exactly as it was.

/// Errors reported by the grid engine.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// A grid needs at least one row and one column.
    #[error("invalid grid dimensions: {columns} columns x {rows} rows")]
    InvalidDimensions { columns: usize, rows: usize },

    /// `move` was called before the first `start_game`.
    #[error("no game in progress; call start_game first")]
    GameNotStarted,

    /// `move` was called after the board locked up.
    #[error("game is over; call start_game to play again")]
    GameAlreadyOver,

    /// Internal bookkeeping diverged. Always a bug in the engine.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A loaded board holds something that cannot be a tile.
    #[error("invalid tile {value} at ({row}, {col})")]
    InvalidTile { row: usize, col: usize, value: u32 },

    /// Direction text that does not name a direction.
    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),

    /// Snapshot bytes or contents could not be used.
    #[error("bad snapshot: {0}")]
    Snapshot(String),
}

/// Result alias used throughout the crate.
pub type EngineResult<T> = Result<T, EngineError>;
