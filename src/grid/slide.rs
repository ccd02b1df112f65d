//! Line compaction and merging.
//!
//! A move is processed one line at a time. Each line's tiles are read in
//! travel order (starting at the edge the board slides toward), merged
//! pairwise, and written back flush against that edge.
//!
//! ## Merge rule
//!
//! Walking the gap-free sequence, two neighbours with equal values merge
//! into the leading one. The trailing tile is consumed and the pair is
//! skipped, so a tile merges at most once per move: `[2, 2, 2]` becomes
//! `[4, 2]`, and `[2, 2, 4]` becomes `[4, 4]`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::board::Grid;
use crate::core::{Direction, EngineError, EngineResult, Position};

/// A tile read out of a line before the move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineTile {
    /// Where the tile sat before the move.
    pub from: Position,
    pub value: u32,
}

/// A tile after compaction, before it is written back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlidTile {
    /// Value after any merge.
    pub value: u32,
    /// Original position of the surviving (leading) tile.
    pub from: Position,
    /// Original position of the tile consumed into this one, if it merged.
    pub consumed: Option<Position>,
}

/// Result of compacting a single line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineSlide {
    /// Post-move tiles, nearest the destination edge first.
    pub tiles: SmallVec<[SlidTile; 8]>,
    /// Sum of the values produced by merges.
    pub score_delta: u64,
    /// Did this line's arrangement change?
    pub changed: bool,
}

/// Compact and merge one line.
///
/// `tiles` must be in travel order. `had_gap` records whether an empty cell
/// preceded any tile during extraction; such a line changes even without
/// merges.
///
/// Fails with `InvariantViolation` if a merge would overflow `u32`; only two
/// `2^31` tiles can do that.
pub fn slide_line(tiles: &[LineTile], had_gap: bool) -> EngineResult<LineSlide> {
    let mut out: SmallVec<[SlidTile; 8]> = SmallVec::new();
    let mut score_delta = 0u64;
    let mut i = 0;

    while i < tiles.len() {
        let lead = tiles[i];
        match tiles.get(i + 1) {
            Some(next) if next.value == lead.value => {
                let value = lead.value.checked_mul(2).ok_or_else(|| {
                    EngineError::InvariantViolation(format!(
                        "merging {} at {} overflows the tile range",
                        lead.value, lead.from
                    ))
                })?;
                score_delta += u64::from(value);
                out.push(SlidTile {
                    value,
                    from: lead.from,
                    consumed: Some(next.from),
                });
                i += 2;
            }
            _ => {
                out.push(SlidTile {
                    value: lead.value,
                    from: lead.from,
                    consumed: None,
                });
                i += 1;
            }
        }
    }

    let changed = had_gap
        || out.len() != tiles.len()
        || out.iter().zip(tiles).any(|(after, before)| after.value != before.value);

    Ok(LineSlide {
        tiles: out,
        score_delta,
        changed,
    })
}

/// A tile travelling from one cell to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMove {
    pub from: Position,
    pub to: Position,
    /// Value the tile carried before any merge.
    pub value: u32,
}

/// Two tiles combining into one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeEvent {
    /// Original position of the surviving tile.
    pub survivor: Position,
    /// Original position of the consumed tile.
    pub consumed: Position,
    /// Cell the merged tile ends up in.
    pub destination: Position,
    /// Value after the merge.
    pub value: u32,
}

/// Everything a whole-board slide did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Slide {
    pub changed: bool,
    pub score_delta: u64,
    /// Every tile that ended up in a different cell, consumed tiles included.
    pub moves: Vec<TileMove>,
    pub merges: Vec<MergeEvent>,
}

impl Grid {
    /// Slide every line toward `direction`, rewriting lines that change.
    ///
    /// Lines that do not change are left untouched. The grid's occupancy
    /// counter is rechecked before returning. On error the grid may be
    /// partly slid; callers work on a copy.
    pub fn slide(&mut self, direction: Direction) -> EngineResult<Slide> {
        let mut slide = Slide::default();

        for index in 0..self.line_count(direction) {
            let positions = self.line_positions(direction, index);

            let mut tiles: SmallVec<[LineTile; 8]> = SmallVec::new();
            let mut seen_space = false;
            let mut had_gap = false;
            for &pos in &positions {
                match self.get(pos) {
                    Some(value) => {
                        had_gap |= seen_space;
                        tiles.push(LineTile { from: pos, value });
                    }
                    None => seen_space = true,
                }
            }

            if tiles.is_empty() {
                continue;
            }

            let line = slide_line(&tiles, had_gap)?;
            if !line.changed {
                continue;
            }

            for tile in &tiles {
                self.take(tile.from);
            }

            for (slot, tile) in line.tiles.iter().enumerate() {
                let to = positions[slot];
                self.place(to, tile.value);

                let before = tile.consumed.map_or(tile.value, |_| tile.value / 2);
                if tile.from != to {
                    slide.moves.push(TileMove { from: tile.from, to, value: before });
                }
                if let Some(consumed) = tile.consumed {
                    slide.moves.push(TileMove { from: consumed, to, value: before });
                    slide.merges.push(MergeEvent {
                        survivor: tile.from,
                        consumed,
                        destination: to,
                        value: tile.value,
                    });
                }
            }

            slide.changed = true;
            slide.score_delta += line.score_delta;
        }

        self.check_occupancy()?;
        Ok(slide)
    }

    /// Would sliding toward `direction` change anything?
    #[must_use]
    pub fn can_slide(&self, direction: Direction) -> bool {
        (0..self.line_count(direction)).any(|index| {
            let mut seen_space = false;
            let mut previous = None;
            for pos in self.line_positions(direction, index) {
                match self.get(pos) {
                    Some(value) => {
                        if seen_space || previous == Some(value) {
                            return true;
                        }
                        previous = Some(value);
                    }
                    None => seen_space = true,
                }
            }
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(values: &[u32]) -> SmallVec<[LineTile; 8]> {
        values
            .iter()
            .enumerate()
            .map(|(col, &value)| LineTile { from: Position::new(0, col), value })
            .collect()
    }

    fn values(slide: &LineSlide) -> Vec<u32> {
        slide.tiles.iter().map(|t| t.value).collect()
    }

    fn row(grid: &Grid, r: usize) -> Vec<Option<u32>> {
        grid.rows_iter().nth(r).unwrap().to_vec()
    }

    #[test]
    fn test_pair_merges() {
        let out = slide_line(&line(&[2, 2, 4]), false).unwrap();
        assert_eq!(values(&out), vec![4, 4]);
        assert_eq!(out.score_delta, 4);
        assert!(out.changed);
    }

    #[test]
    fn test_three_equal_merge_once() {
        let out = slide_line(&line(&[2, 2, 2]), false).unwrap();
        assert_eq!(values(&out), vec![4, 2]);
        assert_eq!(out.score_delta, 4);
    }

    #[test]
    fn test_four_equal_make_two_pairs() {
        let out = slide_line(&line(&[4, 4, 4, 4]), false).unwrap();
        assert_eq!(values(&out), vec![8, 8]);
        assert_eq!(out.score_delta, 16);
    }

    #[test]
    fn test_merged_tile_does_not_remerge() {
        // 2+2 makes 4, which must not then absorb the following 4
        let out = slide_line(&line(&[2, 2, 4, 8]), false).unwrap();
        assert_eq!(values(&out), vec![4, 4, 8]);
        assert_eq!(out.score_delta, 4);
    }

    #[test]
    fn test_no_merge_no_gap_is_unchanged() {
        let out = slide_line(&line(&[2, 4, 8]), false).unwrap();
        assert_eq!(values(&out), vec![2, 4, 8]);
        assert_eq!(out.score_delta, 0);
        assert!(!out.changed);

        let out = slide_line(&line(&[2, 4, 8]), true).unwrap();
        assert!(out.changed);
    }

    #[test]
    fn test_merge_records_sources() {
        let out = slide_line(&line(&[8, 8]), false).unwrap();
        assert_eq!(
            out.tiles[0],
            SlidTile {
                value: 16,
                from: Position::new(0, 0),
                consumed: Some(Position::new(0, 1)),
            }
        );
    }

    #[test]
    fn test_empty_line() {
        let out = slide_line(&[], false).unwrap();
        assert!(out.tiles.is_empty());
        assert!(!out.changed);
    }

    #[test]
    fn test_largest_tiles_do_not_overflow() {
        let top = 1u32 << 31;
        let err = slide_line(&line(&[top, top]), false).unwrap_err();
        assert!(matches!(err, EngineError::InvariantViolation(_)));

        // One step below the top still merges
        let out = slide_line(&line(&[top / 2, top / 2]), false).unwrap();
        assert_eq!(values(&out), vec![top]);
        assert_eq!(out.score_delta, u64::from(top));
    }

    #[test]
    fn test_grid_slide_overflowing_merge_is_an_error() {
        let top = 1u32 << 31;
        let mut grid = Grid::from_rows(&[vec![Some(top), Some(top), None]]).unwrap();

        let err = grid.slide(Direction::Left).unwrap_err();
        assert!(matches!(err, EngineError::InvariantViolation(_)));
        // The pair meets in either direction
        let mut right = Grid::from_rows(&[vec![Some(top), Some(top), None]]).unwrap();
        assert!(matches!(
            right.slide(Direction::Right),
            Err(EngineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_grid_slide_left_scenario() {
        let mut grid = Grid::from_rows(&[
            vec![Some(2), Some(2), Some(4), None],
            vec![Some(2), None, Some(2), Some(2)],
        ])
        .unwrap();

        let slide = grid.slide(Direction::Left).unwrap();

        assert!(slide.changed);
        assert_eq!(slide.score_delta, 8);
        assert_eq!(row(&grid, 0), vec![Some(4), Some(4), None, None]);
        assert_eq!(row(&grid, 1), vec![Some(4), Some(2), None, None]);
        assert_eq!(grid.occupied_count(), 4);
    }

    #[test]
    fn test_grid_slide_right_mirrors_left() {
        let mut grid = Grid::from_rows(&[vec![None, Some(4), Some(2), Some(2)]]).unwrap();

        let slide = grid.slide(Direction::Right).unwrap();

        assert_eq!(slide.score_delta, 4);
        assert_eq!(row(&grid, 0), vec![None, None, Some(4), Some(4)]);
        assert_eq!(
            slide.merges,
            vec![MergeEvent {
                survivor: Position::new(0, 3),
                consumed: Position::new(0, 2),
                destination: Position::new(0, 3),
                value: 4,
            }]
        );
        // The 4 slides one cell right; the consumed 2 slides into the survivor
        assert_eq!(
            slide.moves,
            vec![
                TileMove { from: Position::new(0, 2), to: Position::new(0, 3), value: 2 },
                TileMove { from: Position::new(0, 1), to: Position::new(0, 2), value: 4 },
            ]
        );
    }

    #[test]
    fn test_grid_slide_columns() {
        let mut grid = Grid::from_rows(&[
            vec![Some(2)],
            vec![None],
            vec![Some(2)],
            vec![Some(8)],
        ])
        .unwrap();

        let mut down = grid.clone();
        down.slide(Direction::Down).unwrap();
        let column: Vec<_> = down.rows_iter().map(|r| r[0]).collect();
        assert_eq!(column, vec![None, None, Some(4), Some(8)]);

        grid.slide(Direction::Up).unwrap();
        let column: Vec<_> = grid.rows_iter().map(|r| r[0]).collect();
        assert_eq!(column, vec![Some(4), Some(8), None, None]);
    }

    #[test]
    fn test_unchanged_slide_leaves_grid_alone() {
        let mut grid = Grid::from_rows(&[
            vec![Some(2), Some(4), None],
            vec![Some(8), None, None],
        ])
        .unwrap();
        let before = grid.clone();

        let slide = grid.slide(Direction::Left).unwrap();

        assert!(!slide.changed);
        assert!(slide.moves.is_empty());
        assert_eq!(grid, before);
        assert!(!grid.can_slide(Direction::Left));
        assert!(grid.can_slide(Direction::Right));
    }

    #[test]
    fn test_can_slide_agrees_with_slide() {
        let grid = Grid::from_rows(&[
            vec![Some(2), Some(4)],
            vec![Some(2), Some(8)],
        ])
        .unwrap();

        for dir in Direction::ALL {
            let mut copy = grid.clone();
            assert_eq!(copy.slide(dir).unwrap().changed, grid.can_slide(dir), "{dir}");
        }
        assert!(!grid.can_slide(Direction::Left));
        assert!(grid.can_slide(Direction::Up));
    }
}
