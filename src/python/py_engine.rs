//! Engine bindings for Python.

use numpy::{PyArray1, PyArray2, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::EngineConfig;
use crate::engine::GridEngine;

use super::py_core::{spawn_tuple, to_py_err, PyDirection, PyMoveOutcome};

/// Python wrapper for GridEngine.
#[pyclass(name = "GridEngine")]
pub struct PyGridEngine {
    inner: GridEngine,
}

#[pymethods]
impl PyGridEngine {
    /// Create an engine.
    ///
    /// # Arguments
    /// - seed: RNG seed for deterministic games
    /// - columns, rows: default board size for `start_default`
    /// - starting_tiles: tiles placed when a game starts
    #[new]
    #[pyo3(signature = (seed = 0, columns = 4, rows = 4, starting_tiles = 2))]
    fn new(seed: u64, columns: usize, rows: usize, starting_tiles: usize) -> PyResult<Self> {
        let config = EngineConfig::new(seed)
            .with_dimensions(columns, rows)
            .with_starting_tiles(starting_tiles);
        let inner = GridEngine::new(config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Start a new game; returns the starting tiles as `(row, col, value)`.
    #[pyo3(signature = (columns = None, rows = None))]
    fn start_game(
        &mut self,
        columns: Option<usize>,
        rows: Option<usize>,
    ) -> PyResult<Vec<(usize, usize, u32)>> {
        let columns = columns.unwrap_or(self.inner.config().columns);
        let rows = rows.unwrap_or(self.inner.config().rows);
        let state = self.inner.start_game(columns, rows).map_err(to_py_err)?;
        Ok(state.spawned.into_iter().map(spawn_tuple).collect())
    }

    /// Slide the board. Accepts a Direction or its name.
    #[pyo3(name = "move")]
    fn move_(&mut self, direction: &Bound<'_, PyAny>) -> PyResult<PyMoveOutcome> {
        let direction = if let Ok(dir) = direction.extract::<PyDirection>() {
            dir.0
        } else {
            let name: String = direction.extract()?;
            name.parse().map_err(to_py_err)?
        };
        self.inner
            .apply_move(direction)
            .map(PyMoveOutcome)
            .map_err(to_py_err)
    }

    fn query_cell(&self, row: usize, col: usize) -> Option<u32> {
        self.inner.query_cell(row, col)
    }

    #[getter]
    fn score(&self) -> u64 {
        self.inner.score()
    }

    #[getter]
    fn high_score(&self) -> u64 {
        self.inner.high_score()
    }

    fn is_over(&self) -> bool {
        self.inner.is_over()
    }

    /// Names of the directions that would change the board.
    fn legal_directions(&self) -> Vec<&'static str> {
        self.inner
            .legal_directions()
            .into_iter()
            .map(|d| d.name())
            .collect()
    }

    /// Board as a `[rows, columns]` uint32 array, 0 for empty cells.
    fn board<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<u32>>> {
        let grid = self.inner.grid();
        let flat: Vec<u32> = grid
            .rows_iter()
            .flat_map(|row| row.iter().map(|cell| cell.unwrap_or(0)))
            .collect();
        PyArray1::from_vec_bound(py, flat)
            .reshape([grid.rows(), grid.columns()])
            .map_err(|e| PyValueError::new_err(format!("{}", e)))
    }

    fn __repr__(&self) -> String {
        format!(
            "GridEngine(score={}, high_score={}, phase={:?})",
            self.inner.score(),
            self.inner.high_score(),
            self.inner.phase()
        )
    }

    fn __str__(&self) -> String {
        self.inner.grid().to_string()
    }
}
