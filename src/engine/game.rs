//! The grid engine: game lifecycle, moves, spawning and scoring.

use im::Vector;
use log::{debug, trace, warn};

use super::outcome::{EngineState, MoveOutcome, MoveRecord, Phase, TileSpawn};
use super::snapshot::EngineSnapshot;
use crate::core::config::check_dimensions;
use crate::core::{Direction, EngineConfig, EngineError, EngineResult, GameRng, Position};
use crate::grid::Grid;

/// Authoritative state of one game.
///
/// The engine is a plain value: construct one per game, hand a `&mut` to
/// whatever drives input, and read the returned outcomes to animate.
/// Separate engines share nothing; use `fork` to give a second game its own
/// deterministic RNG stream.
///
/// ## Example
///
/// ```
/// use tile_merge::{Direction, EngineConfig, GridEngine};
///
/// let mut engine = GridEngine::new(EngineConfig::new(42)).unwrap();
/// let state = engine.start_game(4, 4).unwrap();
/// assert_eq!(state.grid.occupied_count(), 2);
///
/// for dir in Direction::ALL {
///     let outcome = engine.apply_move(dir).unwrap();
///     if outcome.changed {
///         assert!(outcome.spawned.is_some());
///     }
/// }
/// assert!(engine.high_score() >= engine.score());
/// ```
#[derive(Clone, Debug)]
pub struct GridEngine {
    config: EngineConfig,
    grid: Grid,
    rng: GameRng,
    score: u64,
    high_score: u64,
    phase: Phase,
    turn: u32,
    history: Vector<MoveRecord>,
}

impl GridEngine {
    /// Create an engine with no game in progress.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let rng = GameRng::new(config.seed);
        Self::with_rng(config, rng)
    }

    /// Create an engine that draws from an existing RNG stream.
    pub fn with_rng(config: EngineConfig, rng: GameRng) -> EngineResult<Self> {
        config.validate()?;
        let grid = Grid::new(config.columns, config.rows)?;
        Ok(Self {
            config,
            grid,
            rng,
            score: 0,
            high_score: 0,
            phase: Phase::NotStarted,
            turn: 0,
            history: Vector::new(),
        })
    }

    /// A fresh engine with the same config and a forked RNG stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        let mut grid = self.grid.clone();
        grid.clear();
        Self {
            config: self.config.clone(),
            grid,
            rng: self.rng.fork(),
            score: 0,
            high_score: 0,
            phase: Phase::NotStarted,
            turn: 0,
            history: Vector::new(),
        }
    }

    // === Lifecycle ===

    /// Reset to an empty `columns` x `rows` board and place the starting tiles.
    ///
    /// The score resets; the high score does not. Fails with
    /// `InvalidDimensions` without touching the current game.
    pub fn start_game(&mut self, columns: usize, rows: usize) -> EngineResult<EngineState> {
        let cell_count = check_dimensions(columns, rows)?;
        let mut grid = Grid::new(columns, rows)?;

        let mut spawned = Vec::new();
        for _ in 0..self.config.starting_tiles.min(cell_count) {
            spawned.push(spawn_tile(&mut grid, &mut self.rng)?);
        }

        self.grid = grid;
        self.score = 0;
        self.turn = 0;
        self.history = Vector::new();
        self.phase = if self.grid.is_locked() {
            Phase::GameOver
        } else {
            Phase::InProgress
        };
        self.debug_check();

        debug!(
            "started {}x{} game with {} tiles (phase {:?})",
            columns,
            rows,
            spawned.len(),
            self.phase
        );

        Ok(EngineState {
            spawned,
            ..self.state()
        })
    }

    /// Start a game with the configured default dimensions.
    pub fn start_default(&mut self) -> EngineResult<EngineState> {
        self.start_game(self.config.columns, self.config.rows)
    }

    /// Slide the board toward `direction`.
    ///
    /// If anything moved or merged, one new tile spawns on a random empty
    /// cell, the merge total is added to the score, and the board is checked
    /// for game over. A move that changes nothing spawns nothing.
    pub fn apply_move(&mut self, direction: Direction) -> EngineResult<MoveOutcome> {
        match self.phase {
            Phase::InProgress => {}
            Phase::NotStarted => return Err(EngineError::GameNotStarted),
            Phase::GameOver => {
                warn!("rejected {direction} move: game is over");
                return Err(EngineError::GameAlreadyOver);
            }
        }

        let mut next = self.grid.clone();
        let slide = next.slide(direction)?;
        if !slide.changed {
            trace!("{direction} move changed nothing");
            return Ok(MoveOutcome::unchanged(direction));
        }

        let mut rng = self.rng.clone();
        let spawned = spawn_tile(&mut next, &mut rng)?;

        self.grid = next;
        self.rng = rng;
        self.score += slide.score_delta;
        self.high_score = self.high_score.max(self.score);
        self.turn += 1;
        if self.config.record_history {
            self.history.push_back(MoveRecord {
                turn: self.turn,
                direction,
                score_delta: slide.score_delta,
                spawned,
            });
        }

        let game_over = self.grid.is_locked();
        if game_over {
            self.phase = Phase::GameOver;
            debug!("game over after {} moves with score {}", self.turn, self.score);
        }
        self.debug_check();

        trace!(
            "{direction} move: {} merges, +{} points, spawned {} at {}",
            slide.merges.len(),
            slide.score_delta,
            spawned.value,
            spawned.position
        );

        Ok(MoveOutcome {
            direction,
            changed: true,
            score_delta: slide.score_delta,
            moves: slide.moves,
            merges: slide.merges,
            spawned: Some(spawned),
            game_over,
        })
    }

    // === Queries ===

    /// Tile value at `(row, col)`, or `None` if empty or off the board.
    #[must_use]
    pub fn query_cell(&self, row: usize, col: usize) -> Option<u32> {
        self.grid.get(Position::new(row, col))
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Highest score seen by this engine. Never reset by `start_game`.
    #[must_use]
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Has the board locked up?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of successful moves in the current game.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Successful moves of the current game, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    /// Would `direction` change the board? Always false outside a game.
    #[must_use]
    pub fn can_move(&self, direction: Direction) -> bool {
        self.phase == Phase::InProgress && self.grid.can_slide(direction)
    }

    /// Directions that would change the board.
    #[must_use]
    pub fn legal_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.can_move(dir))
            .collect()
    }

    /// Snapshot of the board and scores.
    #[must_use]
    pub fn state(&self) -> EngineState {
        EngineState {
            grid: self.grid.clone(),
            score: self.score,
            high_score: self.high_score,
            phase: self.phase,
            spawned: Vec::new(),
        }
    }

    // === Loading and checkpoints ===

    /// Replace the board with a prepared one and start playing on it.
    ///
    /// Score and history reset; the phase is `GameOver` if the board is
    /// already locked.
    pub fn load_grid(&mut self, grid: Grid) -> EngineResult<()> {
        grid.validate()?;

        self.grid = grid;
        self.score = 0;
        self.turn = 0;
        self.history = Vector::new();
        self.phase = if self.grid.is_locked() {
            Phase::GameOver
        } else {
            Phase::InProgress
        };

        debug!(
            "loaded {}x{} board with {} tiles (phase {:?})",
            self.grid.columns(),
            self.grid.rows(),
            self.grid.occupied_count(),
            self.phase
        );
        Ok(())
    }

    /// Capture the current game.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            grid: self.grid.clone(),
            score: self.score,
            phase: self.phase,
            turn: self.turn,
            rng: self.rng.state(),
            history: self.history.clone(),
        }
    }

    /// Return to a captured game.
    ///
    /// The board is validated first and the phase re-derived from it. The
    /// high score becomes the larger of the current one and the snapshot's
    /// score.
    pub fn restore(&mut self, snapshot: EngineSnapshot) -> EngineResult<()> {
        snapshot.grid.validate()?;

        let phase = match snapshot.phase {
            Phase::NotStarted => Phase::NotStarted,
            _ if snapshot.grid.is_locked() => Phase::GameOver,
            _ => Phase::InProgress,
        };

        self.grid = snapshot.grid;
        self.score = snapshot.score;
        self.high_score = self.high_score.max(snapshot.score);
        self.phase = phase;
        self.turn = snapshot.turn;
        self.rng = GameRng::from_state(&snapshot.rng);
        self.history = snapshot.history;
        Ok(())
    }

    fn debug_check(&self) {
        debug_assert!(
            self.grid.check_occupancy().is_ok(),
            "occupancy counter diverged from board"
        );
    }
}

/// Place a 2 or 4 on a uniformly random empty cell.
fn spawn_tile(grid: &mut Grid, rng: &mut GameRng) -> EngineResult<TileSpawn> {
    let empty = grid.empty_positions();
    let position = *rng.choose(&empty).ok_or_else(|| {
        EngineError::InvariantViolation("spawn requested on a full board".to_string())
    })?;
    let value = rng.tile_value();

    grid.place(position, value);
    Ok(TileSpawn { position, value })
}
