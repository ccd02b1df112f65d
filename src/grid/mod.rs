//! Board storage and the slide/merge algorithm.
//!
//! - `Grid`: fixed-size arena of optional tile values with an occupancy counter
//! - `slide_line`: compaction and merging of one line
//! - `Grid::slide`: applies `slide_line` to every line for a direction and
//!   reports tile moves and merges for animation

pub mod board;
pub mod slide;

pub use board::{is_tile_value, Grid, LinePositions};
pub use slide::{slide_line, LineSlide, LineTile, MergeEvent, SlidTile, Slide, TileMove};
