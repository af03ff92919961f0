//! Row clearing
//!
//! Rows are scanned from the bottom-most playable row upward. A full row is
//! removed by copying every row above it down by one; the same row index is
//! then checked again because new contents just moved into it.

use crate::board::{Cell, Grid};

/// Clear every full row and return how many were removed
pub fn clear(grid: &mut Grid) -> usize {
    let rows = grid.playable_rows();
    let mut cleared = 0;
    let mut y = rows.end;

    while y > rows.start {
        let row = y - 1;
        if is_row_full(grid, row) {
            collapse_onto(grid, row);
            cleared += 1;
        } else {
            y -= 1;
        }
    }

    cleared
}

/// Every playable column in the row holds a block
pub fn is_row_full(grid: &Grid, y: usize) -> bool {
    let row = grid.row(y);
    grid.playable_columns().all(|x| row[x].is_filled())
}

/// Shift rows `0..row` down by one over `row`, leaving an empty top row
fn collapse_onto(grid: &mut Grid, row: usize) {
    let columns = grid.playable_columns();
    for y in (1..=row).rev() {
        for x in columns.clone() {
            let above = grid.get(x as i32, y as i32 - 1);
            grid.set(x as i32, y as i32, above);
        }
    }
    for x in columns {
        grid.set(x as i32, 0, Cell::Empty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::Color;

    fn fill_row(grid: &mut Grid, y: i32, color: Color) {
        for x in grid.playable_columns() {
            grid.set(x as i32, y, Cell::Filled(color));
        }
    }

    #[test]
    fn test_no_full_rows_leaves_grid_untouched() {
        let mut grid = Grid::walled(6, 6);
        grid.set(1, 4, Cell::Filled(Color::Red));
        grid.set(3, 2, Cell::Filled(Color::Blue));
        let before = grid.clone();
        assert_eq!(clear(&mut grid), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_full_row_is_replaced_by_row_above() {
        // 3 playable rows above the bottom wall
        let mut grid = Grid::walled(6, 4);
        grid.set(1, 0, Cell::Filled(Color::Red));
        fill_row(&mut grid, 1, Color::Cyan);
        grid.set(2, 2, Cell::Filled(Color::Green));
        grid.set(4, 2, Cell::Filled(Color::Green));

        assert_eq!(clear(&mut grid), 1);

        // Old row 0 moved into row 1, row 2 untouched, fresh empty top row
        assert_eq!(grid.get(1, 1), Cell::Filled(Color::Red));
        assert!((2..5).all(|x| grid.get(x, 1).is_empty()));
        assert_eq!(grid.get(2, 2), Cell::Filled(Color::Green));
        assert_eq!(grid.get(4, 2), Cell::Filled(Color::Green));
        assert!((1..5).all(|x| grid.get(x, 0).is_empty()));
        assert_eq!(grid.get(0, 1), Cell::Wall);
        assert_eq!(grid.get(5, 1), Cell::Wall);
    }

    #[test]
    fn test_adjacent_full_rows_are_rechecked() {
        let mut grid = Grid::walled(5, 8);
        grid.set(2, 3, Cell::Filled(Color::Pink));
        fill_row(&mut grid, 4, Color::Red);
        fill_row(&mut grid, 5, Color::Blue);
        fill_row(&mut grid, 6, Color::Green);

        assert_eq!(clear(&mut grid), 3);
        assert_eq!(grid.get(2, 6), Cell::Filled(Color::Pink));
        assert_eq!(grid.cells().iter().filter(|c| c.is_filled()).count(), 1);
    }

    #[test]
    fn test_split_full_rows() {
        let mut grid = Grid::walled(5, 8);
        fill_row(&mut grid, 6, Color::Red);
        grid.set(1, 5, Cell::Filled(Color::Yellow));
        fill_row(&mut grid, 4, Color::Blue);
        grid.set(3, 3, Cell::Filled(Color::Orange));

        assert_eq!(clear(&mut grid), 2);
        assert_eq!(grid.get(1, 6), Cell::Filled(Color::Yellow));
        assert_eq!(grid.get(3, 5), Cell::Filled(Color::Orange));
    }

    #[test]
    fn test_top_row_is_scanned() {
        let mut grid = Grid::walled(5, 5);
        fill_row(&mut grid, 0, Color::Red);
        assert_eq!(clear(&mut grid), 1);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_open_grid_uses_every_column() {
        let mut grid = Grid::open(4, 4);
        for x in 0..3 {
            grid.set(x, 3, Cell::Filled(Color::Red));
        }
        assert_eq!(clear(&mut grid), 0);
        grid.set(3, 3, Cell::Filled(Color::Red));
        assert_eq!(clear(&mut grid), 1);
        assert!(grid.is_empty());
    }
}
