//! Python bindings for the tile-merge grid engine.
//!
//! # Quick Start
//!
//! ```python
//! import tile_merge
//!
//! engine = tile_merge.GridEngine(seed=42)
//! engine.start_game(4, 4)
//!
//! outcome = engine.move("left")
//! print(outcome.score_delta, engine.score, engine.board())
//! ```

use pyo3::prelude::*;

mod py_core;
mod py_engine;

pub use py_core::*;
pub use py_engine::*;

/// tile_merge: a deterministic sliding-tile merge engine.
#[pymodule]
fn tile_merge(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDirection>()?;
    m.add_class::<PyMoveOutcome>()?;
    m.add_class::<PyGridEngine>()?;

    Ok(())
}
