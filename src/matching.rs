//! Swap-based match-3 clearing
//!
//! Two consecutive selections of 4-directionally adjacent filled cells swap
//! their colors. The swap is kept only if it lines up 3 or more cells of one
//! color along a row or column through either swapped cell; those runs are
//! emptied. Nothing falls into the holes afterwards.

use crate::board::{Cell, Grid, Point};
use crate::tetromino::Color;
use tracing::{info, trace};

/// Shortest run that clears
pub const MIN_RUN: usize = 3;

/// Pending selections, never more than 2
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionBuffer {
    pending: Vec<Point>,
}

impl SelectionBuffer {
    /// Queue a selection; returns the pair once a second one arrives and
    /// leaves the buffer empty again
    pub fn push(&mut self, p: Point) -> Option<(Point, Point)> {
        self.pending.push(p);
        if self.pending.len() == 2 {
            let b = self.pending.remove(1);
            let a = self.pending.remove(0);
            Some((a, b))
        } else {
            None
        }
    }

    pub fn pending(&self) -> &[Point] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// What a selection did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Target was empty, a wall, or out of range
    Rejected,
    /// First of a pair, waiting for the second
    Pending,
    /// A pair was evaluated; `committed` is false for non-adjacent or
    /// non-matching pairs
    Swapped { committed: bool },
}

/// Match-3 rule state
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    selection: SelectionBuffer,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &SelectionBuffer {
        &self.selection
    }

    /// Select a cell. Only filled cells are accepted; the second accepted
    /// selection triggers a swap attempt.
    pub fn select(&mut self, grid: &mut Grid, p: Point) -> SelectOutcome {
        if !grid.in_bounds(p.x, p.y) || !grid.get(p.x, p.y).is_filled() {
            trace!(x = p.x, y = p.y, "selection rejected");
            return SelectOutcome::Rejected;
        }

        match self.selection.push(p) {
            None => SelectOutcome::Pending,
            Some((a, b)) => SelectOutcome::Swapped {
                committed: attempt_swap(grid, a, b),
            },
        }
    }
}

/// Swap two adjacent filled cells if that produces at least one run.
/// Non-adjacent pairs are ignored; a swap that matches nothing is undone.
pub fn attempt_swap(grid: &mut Grid, a: Point, b: Point) -> bool {
    if a.distance(b) != 1 {
        trace!(?a, ?b, "swap rejected: cells not adjacent");
        return false;
    }

    let (Some(a_color), Some(b_color)) = (grid.get(a.x, a.y).color(), grid.get(b.x, b.y).color())
    else {
        return false;
    };

    grid.set(a.x, a.y, Cell::Filled(b_color));
    grid.set(b.x, b.y, Cell::Filled(a_color));

    // Each side is checked against the color the other cell brought over;
    // both sides always run
    let cleared = clear_matches_from(grid, a, b_color) | clear_matches_from(grid, b, a_color);

    if cleared {
        info!(?a, ?b, "swap matched");
    } else {
        grid.set(a.x, a.y, Cell::Filled(a_color));
        grid.set(b.x, b.y, Cell::Filled(b_color));
        trace!(?a, ?b, "swap reverted");
    }
    cleared
}

/// Clear the row run and the column run of `color` through `p` when either
/// reaches [`MIN_RUN`]. `p` itself always counts toward both runs.
pub fn clear_matches_from(grid: &mut Grid, p: Point, color: Color) -> bool {
    let row_run = run(grid, p, color, (1, 0));
    let column_run = run(grid, p, color, (0, 1));

    let mut cleared = false;
    for stretch in [row_run, column_run] {
        if stretch.len() >= MIN_RUN {
            for q in &stretch {
                grid.set(q.x, q.y, Cell::Empty);
            }
            cleared = true;
        }
    }
    cleared
}

/// Maximal stretch of `color` through `p` along one axis
fn run(grid: &Grid, p: Point, color: Color, (dx, dy): (i32, i32)) -> Vec<Point> {
    let mut stretch = vec![p];
    for sign in [1, -1] {
        let mut q = p.offset(dx * sign, dy * sign);
        while grid.in_bounds(q.x, q.y) && grid.get(q.x, q.y) == Cell::Filled(color) {
            stretch.push(q);
            q = q.offset(dx * sign, dy * sign);
        }
    }
    stretch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::Color::{Blue as B, Green as G, Red as R, Yellow as Y};

    /// Open grid from rows of optional colors, `None` meaning empty
    fn grid_from(rows: &[&[Option<Color>]]) -> Grid {
        let mut grid = Grid::open(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(color) = cell {
                    grid.set(x as i32, y as i32, Cell::Filled(*color));
                }
            }
        }
        grid
    }

    fn filled(color: Color) -> Cell {
        Cell::Filled(color)
    }

    #[test]
    fn test_swap_of_run_cells_clears_row_run() {
        let mut grid = grid_from(&[
            &[None, None, None, None, None],
            &[None, None, None, None, None],
            &[Some(B), Some(R), Some(R), Some(R), Some(G)],
            &[None, None, None, None, None],
        ]);
        assert!(attempt_swap(&mut grid, Point::new(2, 2), Point::new(3, 2)));
        for x in 1..=3 {
            assert!(grid.get(x, 2).is_empty());
        }
        assert_eq!(grid.get(0, 2), filled(B));
        assert_eq!(grid.get(4, 2), filled(G));
    }

    #[test]
    fn test_vertical_swap_creates_row_run() {
        let mut grid = grid_from(&[
            &[None, None, None, None, None],
            &[None, None, None, None, None],
            &[None, Some(R), Some(R), Some(G), None],
            &[None, None, None, Some(R), None],
        ]);
        assert!(attempt_swap(&mut grid, Point::new(3, 3), Point::new(3, 2)));
        for x in 1..=3 {
            assert!(grid.get(x, 2).is_empty());
        }
        // Swap is kept: the green moved down
        assert_eq!(grid.get(3, 3), filled(G));
    }

    #[test]
    fn test_swap_without_run_is_reverted() {
        let mut grid = grid_from(&[
            &[None, None, None, None, None],
            &[None, Some(R), None, None, None],
            &[None, Some(Y), Some(G), Some(R), None],
            &[None, None, None, None, None],
        ]);
        let before = grid.clone();
        assert!(!attempt_swap(&mut grid, Point::new(2, 2), Point::new(3, 2)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_cells_above_clear_stay_put() {
        let mut grid = grid_from(&[
            &[None, Some(Y), Some(B), Some(G), None],
            &[None, Some(G), Some(Y), Some(B), None],
            &[None, Some(R), Some(R), Some(B), Some(R)],
            &[None, None, None, None, None],
        ]);
        assert!(attempt_swap(&mut grid, Point::new(3, 2), Point::new(4, 2)));
        // Row run cleared, nothing above moved down
        for x in 1..=3 {
            assert!(grid.get(x, 2).is_empty());
        }
        assert_eq!(grid.get(1, 1), filled(G));
        assert_eq!(grid.get(2, 1), filled(Y));
        assert_eq!(grid.get(3, 1), filled(B));
        assert_eq!(grid.get(1, 0), filled(Y));
        assert_eq!(grid.get(4, 2), filled(B));
    }

    #[test]
    fn test_row_and_column_runs_through_same_cell() {
        let mut grid = grid_from(&[
            &[None, None, Some(R), None],
            &[None, None, Some(R), None],
            &[Some(R), Some(R), Some(G), Some(R)],
            &[None, None, None, None],
        ]);
        assert!(attempt_swap(&mut grid, Point::new(2, 2), Point::new(3, 2)));
        // Cross of 5 red cells cleared, green moved right
        for p in [(0, 2), (1, 2), (2, 2), (2, 1), (2, 0)] {
            assert!(grid.get(p.0, p.1).is_empty(), "{p:?}");
        }
        assert_eq!(grid.get(3, 2), filled(G));
    }

    #[test]
    fn test_both_sides_are_evaluated() {
        let mut grid = grid_from(&[
            &[Some(R), Some(G), None, None],
            &[Some(R), Some(G), None, None],
            &[Some(G), Some(R), None, None],
            &[None, None, None, None],
        ]);
        assert!(attempt_swap(&mut grid, Point::new(0, 2), Point::new(1, 2)));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_non_adjacent_pairs_never_swap() {
        let mut grid = grid_from(&[
            &[Some(R), Some(G), Some(R), None],
            &[Some(G), Some(R), Some(R), None],
            &[None, None, None, None],
            &[None, None, None, None],
        ]);
        let before = grid.clone();
        // Diagonal
        assert!(!attempt_swap(&mut grid, Point::new(0, 0), Point::new(1, 1)));
        // Two apart
        assert!(!attempt_swap(&mut grid, Point::new(0, 0), Point::new(2, 0)));
        // Same cell
        assert!(!attempt_swap(&mut grid, Point::new(1, 1), Point::new(1, 1)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_select_pairs_and_empties_buffer() {
        let mut grid = grid_from(&[
            &[Some(B), Some(R), Some(R), Some(G)],
            &[None, None, None, Some(R)],
            &[None, None, None, None],
            &[None, None, None, None],
        ]);
        let mut engine = MatchEngine::new();

        assert_eq!(engine.select(&mut grid, Point::new(1, 1)), SelectOutcome::Rejected);
        assert!(engine.selection().is_empty());

        assert_eq!(engine.select(&mut grid, Point::new(3, 0)), SelectOutcome::Pending);
        assert_eq!(engine.selection().pending(), &[Point::new(3, 0)]);

        assert_eq!(
            engine.select(&mut grid, Point::new(3, 1)),
            SelectOutcome::Swapped { committed: true }
        );
        assert!(engine.selection().is_empty());
        assert_eq!(grid.get(0, 0), filled(B));
        assert_eq!(grid.get(3, 1), filled(G));
        for x in 1..=3 {
            assert!(grid.get(x, 0).is_empty());
        }
    }

    #[test]
    fn test_diagonal_selection_never_swaps() {
        let mut grid = grid_from(&[
            &[Some(R), Some(G), Some(R), Some(R)],
            &[Some(G), Some(R), None, None],
            &[None, None, None, None],
            &[None, None, None, None],
        ]);
        let before = grid.clone();
        let mut engine = MatchEngine::new();
        engine.select(&mut grid, Point::new(0, 0));
        assert_eq!(
            engine.select(&mut grid, Point::new(1, 1)),
            SelectOutcome::Swapped { committed: false }
        );
        assert_eq!(grid, before);
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn test_out_of_range_selection_rejected() {
        let mut grid = Grid::open(4, 4);
        let mut engine = MatchEngine::new();
        assert_eq!(engine.select(&mut grid, Point::new(-1, 0)), SelectOutcome::Rejected);
        assert_eq!(engine.select(&mut grid, Point::new(0, 4)), SelectOutcome::Rejected);
    }

    #[test]
    fn test_run_stops_at_first_other_color() {
        let grid = grid_from(&[
            &[Some(R), Some(G), Some(R), Some(R)],
            &[None, None, None, None],
            &[None, None, None, None],
            &[None, None, None, None],
        ]);
        assert_eq!(run(&grid, Point::new(2, 0), R, (1, 0)).len(), 2);
        assert_eq!(run(&grid, Point::new(2, 0), R, (0, 1)).len(), 1);
    }
}
