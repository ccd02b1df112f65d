//! Core type bindings for Python.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::core::{Direction, EngineError};
use crate::engine::{MoveOutcome, TileSpawn};

/// Map an engine error onto the closest Python exception.
pub(crate) fn to_py_err(err: EngineError) -> PyErr {
    match err {
        EngineError::InvalidDimensions { .. }
        | EngineError::InvalidTile { .. }
        | EngineError::UnknownDirection(_)
        | EngineError::Snapshot(_) => PyValueError::new_err(err.to_string()),
        EngineError::GameNotStarted
        | EngineError::GameAlreadyOver
        | EngineError::InvariantViolation(_) => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Python wrapper for Direction.
#[pyclass(name = "Direction")]
#[derive(Clone, Debug)]
pub struct PyDirection(pub Direction);

#[pymethods]
impl PyDirection {
    /// Parse "left", "right", "up", "down" (or l/r/u/d).
    #[new]
    fn new(name: &str) -> PyResult<Self> {
        name.parse().map(Self).map_err(to_py_err)
    }

    #[getter]
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn opposite(&self) -> Self {
        Self(self.0.opposite())
    }

    fn __repr__(&self) -> String {
        format!("Direction('{}')", self.0)
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        self.0 as u64
    }
}

/// Python wrapper for MoveOutcome.
#[pyclass(name = "MoveOutcome")]
#[derive(Clone, Debug)]
pub struct PyMoveOutcome(pub MoveOutcome);

#[pymethods]
impl PyMoveOutcome {
    #[getter]
    fn changed(&self) -> bool {
        self.0.changed
    }

    #[getter]
    fn score_delta(&self) -> u64 {
        self.0.score_delta
    }

    #[getter]
    fn game_over(&self) -> bool {
        self.0.game_over
    }

    /// `(row, col, value)` of the spawned tile, if any.
    #[getter]
    fn spawned(&self) -> Option<(usize, usize, u32)> {
        self.0.spawned.map(spawn_tuple)
    }

    /// Merges as `((survivor_row, survivor_col), (consumed_row, consumed_col), value)`.
    #[getter]
    fn merges(&self) -> Vec<((usize, usize), (usize, usize), u32)> {
        self.0
            .merges
            .iter()
            .map(|m| ((m.survivor.row, m.survivor.col), (m.consumed.row, m.consumed.col), m.value))
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "MoveOutcome(direction='{}', changed={}, score_delta={}, game_over={})",
            self.0.direction, self.0.changed, self.0.score_delta, self.0.game_over
        )
    }
}

pub(crate) fn spawn_tuple(spawn: TileSpawn) -> (usize, usize, u32) {
    (spawn.position.row, spawn.position.col, spawn.value)
}
