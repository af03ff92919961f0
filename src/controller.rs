//! Falling piece lifecycle: spawn, move, rotate, fall, lock, clear, respawn

use crate::bag::PieceSource;
use crate::board::{Grid, Point};
use crate::lines;
use crate::piece::FallingPiece;
use crate::tetromino::RotationDirection;
use tracing::{debug, trace};

/// Result of one gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The piece moved down one row
    Fell,
    /// The piece was copied into the grid and a new one spawned
    Locked { rows_cleared: usize },
}

/// Result of an instant drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropResult {
    /// Rows fallen before locking
    pub fell: u32,
    pub rows_cleared: usize,
}

/// Spawn origin for a grid: top row, centered
pub fn spawn_origin(columns: usize) -> Point {
    Point::new(columns as i32 / 2 - 1, 0)
}

/// Owns the active piece and the randomizer that feeds it
#[derive(Debug, Clone)]
pub struct Controller {
    piece: FallingPiece,
    source: PieceSource,
    spawn: Point,
}

impl Controller {
    /// Create a controller and spawn its first piece at `spawn`
    pub fn new(mut source: PieceSource, spawn: Point) -> Self {
        let piece = Self::draw(&mut source, spawn);
        Self {
            piece,
            source,
            spawn,
        }
    }

    fn draw(source: &mut PieceSource, spawn: Point) -> FallingPiece {
        let (piece_type, colors) = source.next();
        FallingPiece::new(piece_type, spawn, colors)
    }

    pub fn piece(&self) -> &FallingPiece {
        &self.piece
    }

    /// Replace the active piece with a fresh one at the spawn origin.
    /// Never checks for collision.
    pub fn spawn(&mut self) {
        self.piece = Self::draw(&mut self.source, self.spawn);
        debug!(piece = ?self.piece.piece_type, "spawned");
    }

    /// Check whether the active piece overlaps something in the grid
    pub fn is_overlapping(&self, grid: &Grid) -> bool {
        !grid.fits(&self.piece.cells())
    }

    /// Rotate in place if the new rotation is free; no kicks are attempted
    pub fn try_rotate(&mut self, grid: &Grid, direction: RotationDirection) -> bool {
        let rotation = self.piece.rotation.turned(direction);
        if self.piece.fits_at(grid, self.piece.origin, rotation) {
            self.piece.rotation = rotation;
            true
        } else {
            trace!(?direction, "rotation blocked");
            false
        }
    }

    /// Shift horizontally by `dx` if the shifted cells are free
    pub fn try_move(&mut self, grid: &Grid, dx: i32) -> bool {
        let origin = self.piece.origin.offset(dx, 0);
        if self.piece.fits_at(grid, origin, self.piece.rotation) {
            self.piece.origin = origin;
            true
        } else {
            trace!(dx, "move blocked");
            false
        }
    }

    /// Fall one row, or lock at the current position, clear rows and respawn
    pub fn step_down(&mut self, grid: &mut Grid) -> Step {
        let below = self.piece.origin.offset(0, 1);
        if self.piece.fits_at(grid, below, self.piece.rotation) {
            self.piece.origin = below;
            return Step::Fell;
        }

        self.piece.lock_into(grid);
        let rows_cleared = lines::clear(grid);
        debug!(
            piece = ?self.piece.piece_type,
            x = self.piece.origin.x,
            y = self.piece.origin.y,
            rows_cleared,
            "locked"
        );
        self.spawn();
        Step::Locked { rows_cleared }
    }

    /// Step down until the piece locks
    pub fn drop_instant(&mut self, grid: &mut Grid) -> DropResult {
        let mut fell = 0;
        loop {
            match self.step_down(grid) {
                Step::Fell => fell += 1,
                Step::Locked { rows_cleared } => return DropResult { fell, rows_cleared },
            }
        }
    }
}
