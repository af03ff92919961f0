//! Active falling piece

use crate::board::{Cell, Grid, Point};
use crate::tetromino::{Color, Rotation, TetrominoType};

/// An active falling piece. Replaced, not reused, on every spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallingPiece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    /// Current rotation state
    pub rotation: Rotation,
    /// Top-left corner of the piece's 4x4 box
    pub origin: Point,
    /// Color of each block, parallel to the shape offsets
    pub colors: [Color; 4],
}

impl FallingPiece {
    /// Create a new piece in its spawn rotation
    pub fn new(piece_type: TetrominoType, origin: Point, colors: [Color; 4]) -> Self {
        Self {
            piece_type,
            rotation: Rotation::North,
            origin,
            colors,
        }
    }

    /// A piece whose blocks all carry the shape's own color
    pub fn uniform(piece_type: TetrominoType, origin: Point) -> Self {
        Self::new(piece_type, origin, [piece_type.color(); 4])
    }

    /// Absolute positions of all 4 blocks
    pub fn cells(&self) -> [Point; 4] {
        self.cells_at(self.origin, self.rotation)
    }

    /// Absolute positions of the blocks if the piece sat at `origin` in `rotation`
    pub fn cells_at(&self, origin: Point, rotation: Rotation) -> [Point; 4] {
        self.piece_type
            .shape(rotation)
            .map(|(dx, dy)| origin.offset(dx, dy))
    }

    /// Blocks paired with their colors
    pub fn blocks(&self) -> [(Point, Color); 4] {
        let cells = self.cells();
        std::array::from_fn(|i| (cells[i], self.colors[i]))
    }

    /// Check whether the piece would be free of collisions at `origin` in `rotation`
    pub fn fits_at(&self, grid: &Grid, origin: Point, rotation: Rotation) -> bool {
        grid.fits(&self.cells_at(origin, rotation))
    }

    /// Copy every block into the grid at the current position
    pub fn lock_into(&self, grid: &mut Grid) {
        for (p, color) in self.blocks() {
            grid.set(p.x, p.y, Cell::Filled(color));
        }
    }
}
