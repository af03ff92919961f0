//! Grid representation and collision detection
//!
//! Coordinates are `(x, y)`: x is the column, y is the row counted downward
//! from the top. A walled grid carries a permanent border of `Wall` cells on
//! the left column, right column and bottom row; an open grid has none and
//! its bounds act as hard edges.

use crate::tetromino::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Smallest legal grid dimension
pub const MIN_DIMENSION: usize = 4;

/// A cell on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Filled(color) => Some(*color),
            _ => None,
        }
    }

    fn glyph(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::Filled(color) => color.glyph(),
        }
    }
}

/// A grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Manhattan distance
    pub fn distance(&self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// The playing field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: usize,
    rows: usize,
    walled: bool,
    /// Row-major, `y * columns + x`
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid bordered by walls on both sides and the bottom
    pub fn walled(columns: usize, rows: usize) -> Self {
        let mut grid = Self::blank(columns, rows, true);
        for y in 0..rows {
            for x in 0..columns {
                if x == 0 || x == columns - 1 || y == rows - 1 {
                    grid.cells[y * columns + x] = Cell::Wall;
                }
            }
        }
        grid
    }

    /// Create an empty grid with no walls
    pub fn open(columns: usize, rows: usize) -> Self {
        Self::blank(columns, rows, false)
    }

    fn blank(columns: usize, rows: usize, walled: bool) -> Self {
        assert!(
            columns >= MIN_DIMENSION && rows >= MIN_DIMENSION,
            "grid must be at least {MIN_DIMENSION}x{MIN_DIMENSION}, got {columns}x{rows}"
        );
        Self {
            columns,
            rows,
            walled,
            cells: vec![Cell::Empty; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns that can hold filled cells
    pub fn playable_columns(&self) -> Range<usize> {
        if self.walled {
            1..self.columns - 1
        } else {
            0..self.columns
        }
    }

    /// Rows that can hold filled cells
    pub fn playable_rows(&self) -> Range<usize> {
        if self.walled {
            0..self.rows - 1
        } else {
            0..self.rows
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.columns && (y as usize) < self.rows
    }

    /// Flat index; panics outside the grid
    fn index(&self, x: i32, y: i32) -> usize {
        assert!(
            self.in_bounds(x, y),
            "cell ({x}, {y}) is outside the {}x{} grid",
            self.columns,
            self.rows
        );
        y as usize * self.columns + x as usize
    }

    /// Get the cell at `(x, y)`. Out-of-range access panics.
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.cells[self.index(x, y)]
    }

    /// Set the cell at `(x, y)`. Out-of-range access and writes onto walls panic.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        let idx = self.index(x, y);
        assert!(
            self.cells[idx] != Cell::Wall && cell != Cell::Wall,
            "walls are immutable (write at ({x}, {y}))"
        );
        self.cells[idx] = cell;
    }

    /// Sole collision primitive: out of bounds, a wall, or a filled cell
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        !self.in_bounds(x, y) || !self.cells[y as usize * self.columns + x as usize].is_empty()
    }

    /// Check if every point is free
    pub fn fits(&self, points: &[Point]) -> bool {
        points.iter().all(|p| !self.is_blocked(p.x, p.y))
    }

    /// One full row, walls included
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.columns..(y + 1) * self.columns]
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Check if no playable cell is filled
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_filled())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.rows {
            let line: String = self.row(y).iter().map(Cell::glyph).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
