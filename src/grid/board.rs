//! Fixed-size cell arena.
//!
//! `Grid` stores one `Option<u32>` per cell in row-major order and keeps a
//! running occupancy counter. Tiles have no identity beyond the cell they
//! sit in; a move rewrites cells and reports where values travelled.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::config::check_dimensions;
use crate::core::{Direction, EngineError, EngineResult, Position};

/// Positions of one line, in travel order. Sized for boards up to 8 wide.
pub type LinePositions = SmallVec<[Position; 8]>;

/// Is `value` something a tile can hold (a power of two, at least 2)?
#[must_use]
pub fn is_tile_value(value: u32) -> bool {
    value >= 2 && value.is_power_of_two()
}

/// Rectangular board of optional tile values.
///
/// ## Invariant
///
/// `occupied_count()` always equals the number of `Some` cells. All
/// mutation goes through `place`/`take`/`clear`, which maintain it.
///
/// ## Example
///
/// ```
/// use tile_merge::grid::Grid;
/// use tile_merge::core::Position;
///
/// let grid = Grid::from_rows(&[
///     vec![Some(2), None],
///     vec![None, Some(4)],
/// ]).unwrap();
///
/// assert_eq!(grid.occupied_count(), 2);
/// assert_eq!(grid.get(Position::new(1, 1)), Some(4));
/// assert_eq!(grid.total_value(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Option<u32>>,
    occupied: usize,
}

impl Grid {
    /// Create an empty grid.
    pub fn new(columns: usize, rows: usize) -> EngineResult<Self> {
        let cell_count = check_dimensions(columns, rows)?;
        Ok(Self {
            columns,
            rows,
            cells: vec![None; cell_count],
            occupied: 0,
        })
    }

    /// Build a grid from row vectors. Every row must have the same length
    /// and every value must be a valid tile.
    pub fn from_rows(rows: &[Vec<Option<u32>>]) -> EngineResult<Self> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut grid = Self::new(columns, rows.len())?;

        for (r, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(EngineError::InvalidDimensions {
                    columns: row.len(),
                    rows: rows.len(),
                });
            }
            for (c, cell) in row.iter().enumerate() {
                if let Some(value) = *cell {
                    if !is_tile_value(value) {
                        return Err(EngineError::InvalidTile { row: r, col: c, value });
                    }
                    grid.place(Position::new(r, c), value);
                }
            }
        }

        Ok(grid)
    }

    /// Number of columns.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Is the position on the board?
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.columns
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.columns + pos.col
    }

    /// Value at a position. `None` for empty cells and off-board positions.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<u32> {
        if self.contains(pos) {
            self.cells[self.index(pos)]
        } else {
            None
        }
    }

    /// Put a tile into an empty cell.
    pub(crate) fn place(&mut self, pos: Position, value: u32) {
        let idx = self.index(pos);
        debug_assert!(self.cells[idx].is_none(), "cell {pos} already occupied");
        debug_assert!(is_tile_value(value), "{value} is not a tile value");
        if self.cells[idx].replace(value).is_none() {
            self.occupied += 1;
        }
    }

    /// Remove and return the tile at a position.
    pub(crate) fn take(&mut self, pos: Position) -> Option<u32> {
        let idx = self.index(pos);
        let value = self.cells[idx].take();
        if value.is_some() {
            self.occupied -= 1;
        }
        value
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
        self.occupied = 0;
    }

    /// Number of tiles on the board (the occupancy counter).
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Is every cell occupied?
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupied == self.cells.len()
    }

    /// All empty positions in row-major order.
    #[must_use]
    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions().filter(|&pos| self.get(pos).is_none()).collect()
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let columns = self.columns;
        (0..self.cells.len()).map(move |i| Position::new(i / columns, i % columns))
    }

    /// Iterate over rows as slices.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Option<u32>]> {
        self.cells.chunks(self.columns)
    }

    /// Sum of all tile values.
    #[must_use]
    pub fn total_value(&self) -> u64 {
        self.cells.iter().flatten().map(|&v| u64::from(v)).sum()
    }

    /// Largest tile on the board.
    #[must_use]
    pub fn max_tile(&self) -> Option<u32> {
        self.cells.iter().flatten().copied().max()
    }

    /// Does any cell share its value with its right or down neighbour?
    ///
    /// Each pair is checked once, from its top/left member.
    #[must_use]
    pub fn has_adjacent_equal(&self) -> bool {
        self.positions().any(|pos| {
            let Some(value) = self.get(pos) else {
                return false;
            };
            let right = Position::new(pos.row, pos.col + 1);
            let down = Position::new(pos.row + 1, pos.col);
            self.get(right) == Some(value) || self.get(down) == Some(value)
        })
    }

    /// Full with no merge available in any direction.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.is_full() && !self.has_adjacent_equal()
    }

    /// Number of lines a move in `direction` processes.
    #[must_use]
    pub fn line_count(&self, direction: Direction) -> usize {
        if direction.is_horizontal() {
            self.rows
        } else {
            self.columns
        }
    }

    /// Positions of line `index`, starting at the edge `direction` moves toward.
    #[must_use]
    pub fn line_positions(&self, direction: Direction, index: usize) -> LinePositions {
        let len = if direction.is_horizontal() { self.columns } else { self.rows };
        let at = |step: usize| {
            let offset = if direction.toward_far_edge() { len - 1 - step } else { step };
            if direction.is_horizontal() {
                Position::new(index, offset)
            } else {
                Position::new(offset, index)
            }
        };
        (0..len).map(at).collect()
    }

    /// Recount occupied cells and compare with the counter.
    pub fn check_occupancy(&self) -> EngineResult<()> {
        let actual = self.cells.iter().filter(|c| c.is_some()).count();
        if actual == self.occupied {
            Ok(())
        } else {
            Err(EngineError::InvariantViolation(format!(
                "occupancy counter is {} but {} cells are occupied",
                self.occupied, actual
            )))
        }
    }

    /// Check shape, tile values and occupancy, e.g. after deserializing.
    pub fn validate(&self) -> EngineResult<()> {
        let cell_count = check_dimensions(self.columns, self.rows)?;
        if cell_count != self.cells.len() {
            return Err(EngineError::InvariantViolation(format!(
                "{}x{} grid holds {} cells",
                self.columns,
                self.rows,
                self.cells.len()
            )));
        }
        for pos in self.positions() {
            if let Some(value) = self.get(pos) {
                if !is_tile_value(value) {
                    return Err(EngineError::InvalidTile { row: pos.row, col: pos.col, value });
                }
            }
        }
        self.check_occupancy()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self
            .max_tile()
            .map_or(1, |v| v.to_string().len());

        for (r, row) in self.rows_iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                match cell {
                    Some(value) => write!(f, "{value:>width$}")?,
                    None => write!(f, "{:>width$}", ".")?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(4, 3).unwrap();

        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cell_count(), 12);
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.empty_positions().len(), 12);
        assert!(!grid.is_full());
    }

    #[test]
    fn test_zero_dimensions() {
        assert_eq!(
            Grid::new(0, 4),
            Err(EngineError::InvalidDimensions { columns: 0, rows: 4 })
        );
        assert!(Grid::from_rows(&[]).is_err());
        assert!(Grid::from_rows(&[vec![]]).is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged_and_bad_values() {
        assert!(Grid::from_rows(&[vec![None, None], vec![None]]).is_err());
        assert_eq!(
            Grid::from_rows(&[vec![Some(2), Some(3)]]),
            Err(EngineError::InvalidTile { row: 0, col: 1, value: 3 })
        );
        assert!(Grid::from_rows(&[vec![Some(1)]]).is_err());
        assert!(Grid::from_rows(&[vec![Some(0)]]).is_err());
    }

    #[test]
    fn test_place_take_tracks_occupancy() {
        let mut grid = Grid::new(2, 2).unwrap();

        grid.place(pos(0, 1), 2);
        grid.place(pos(1, 0), 4);
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(grid.get(pos(0, 1)), Some(2));

        assert_eq!(grid.take(pos(0, 1)), Some(2));
        assert_eq!(grid.take(pos(0, 1)), None);
        assert_eq!(grid.occupied_count(), 1);
        assert!(grid.check_occupancy().is_ok());

        grid.clear();
        assert_eq!(grid.occupied_count(), 0);
        assert!(grid.check_occupancy().is_ok());
    }

    #[test]
    fn test_get_off_board() {
        let grid = Grid::from_rows(&[vec![Some(2)]]).unwrap();
        assert_eq!(grid.get(pos(0, 0)), Some(2));
        assert_eq!(grid.get(pos(0, 1)), None);
        assert_eq!(grid.get(pos(5, 5)), None);
    }

    #[test]
    fn test_line_positions_travel_order() {
        let grid = Grid::new(3, 2).unwrap();

        assert_eq!(
            grid.line_positions(Direction::Left, 1).as_slice(),
            &[pos(1, 0), pos(1, 1), pos(1, 2)]
        );
        assert_eq!(
            grid.line_positions(Direction::Right, 1).as_slice(),
            &[pos(1, 2), pos(1, 1), pos(1, 0)]
        );
        assert_eq!(grid.line_positions(Direction::Up, 2).as_slice(), &[pos(0, 2), pos(1, 2)]);
        assert_eq!(grid.line_positions(Direction::Down, 2).as_slice(), &[pos(1, 2), pos(0, 2)]);

        assert_eq!(grid.line_count(Direction::Left), 2);
        assert_eq!(grid.line_count(Direction::Down), 3);
    }

    #[test]
    fn test_adjacent_equal_and_locked() {
        let locked = Grid::from_rows(&[
            vec![Some(2), Some(4)],
            vec![Some(4), Some(2)],
        ])
        .unwrap();
        assert!(locked.is_full());
        assert!(!locked.has_adjacent_equal());
        assert!(locked.is_locked());

        let vertical = Grid::from_rows(&[
            vec![Some(2), Some(4)],
            vec![Some(2), Some(8)],
        ])
        .unwrap();
        assert!(vertical.has_adjacent_equal());
        assert!(!vertical.is_locked());

        let with_gap = Grid::from_rows(&[
            vec![Some(2), Some(4)],
            vec![Some(8), None],
        ])
        .unwrap();
        assert!(!with_gap.is_locked());
    }

    #[test]
    fn test_totals() {
        let grid = Grid::from_rows(&[
            vec![Some(2), None, Some(8)],
            vec![None, Some(16), None],
        ])
        .unwrap();

        assert_eq!(grid.total_value(), 26);
        assert_eq!(grid.max_tile(), Some(16));
        assert_eq!(Grid::new(2, 2).unwrap().max_tile(), None);
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_rows(&[
            vec![Some(2), None],
            vec![Some(128), Some(4)],
        ])
        .unwrap();

        assert_eq!(grid.to_string(), "  2   .\n128   4");
    }

    #[test]
    fn test_validate_catches_tampered_counter() {
        let mut grid = Grid::from_rows(&[vec![Some(2), None]]).unwrap();
        assert!(grid.validate().is_ok());

        grid.occupied = 2;
        assert!(matches!(grid.validate(), Err(EngineError::InvariantViolation(_))));
    }

    #[test]
    fn test_grid_serde() {
        let grid = Grid::from_rows(&[vec![Some(2), None], vec![None, Some(4)]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();

        assert_eq!(grid, back);
        assert!(back.validate().is_ok());
    }
}
