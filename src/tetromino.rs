//! Tetromino definitions and shapes
//!
//! All 7 tetrominoes with their 4 rotation states. Offsets are `(x, y)` inside
//! a 4x4 box anchored at the piece origin, x to the right and y downward.
//! Rotation indices advance counter-clockwise on screen.

use serde::{Deserialize, Serialize};

/// Block colors used by pieces and locked cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Pink,
    Red,
}

impl Color {
    /// Palette the match-3 variant draws block colors from, in order
    pub const MATCH_PALETTE: [Color; 7] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Pink,
        Color::Cyan,
        Color::Orange,
    ];

    /// Single-character tag for text dumps
    pub fn glyph(&self) -> char {
        match self {
            Color::Cyan => 'C',
            Color::Blue => 'B',
            Color::Orange => 'O',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Pink => 'P',
            Color::Red => 'R',
        }
    }
}

/// The 7 tetromino types, ordered by shape id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoType {
    I, // 0
    J, // 1
    L, // 2
    O, // 3
    S, // 4
    T, // 5
    Z, // 6
}

type Offsets = [(i32, i32); 4];

const I_SHAPES: [Offsets; 4] = [
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
];

const J_SHAPES: [Offsets; 4] = [
    [(0, 1), (1, 1), (2, 1), (2, 0)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 1), (1, 1), (2, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2), (0, 0)],
];

const L_SHAPES: [Offsets; 4] = [
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (1, 2), (0, 2)],
    [(0, 1), (1, 1), (2, 1), (0, 0)],
    [(1, 0), (1, 1), (1, 2), (2, 0)],
];

// O piece doesn't rotate
const O_SHAPES: [Offsets; 4] = [[(0, 0), (0, 1), (1, 0), (1, 1)]; 4];

const S_SHAPES: [Offsets; 4] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(0, 0), (0, 1), (1, 1), (1, 2)],
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(0, 0), (0, 1), (1, 1), (1, 2)],
];

// North: .T.   West: .T   South: TTT   East: T.
//        TTT         TT          .T.         TT
//                    .T                      T.
const T_SHAPES: [Offsets; 4] = [
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (1, 2)],
    [(1, 0), (1, 1), (2, 1), (1, 2)],
];

const Z_SHAPES: [Offsets; 4] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(1, 0), (0, 1), (1, 1), (0, 2)],
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(1, 0), (0, 1), (1, 1), (0, 2)],
];

impl TetrominoType {
    /// Get the color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Cyan,
            TetrominoType::J => Color::Blue,
            TetrominoType::L => Color::Orange,
            TetrominoType::O => Color::Yellow,
            TetrominoType::S => Color::Green,
            TetrominoType::T => Color::Pink,
            TetrominoType::Z => Color::Red,
        }
    }

    /// Get all tetromino types for bag randomization
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    /// Shape id in `0..=6`
    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn from_id(id: u8) -> Option<TetrominoType> {
        Self::all().get(id as usize).copied()
    }

    /// Get the 4 `(x, y)` offsets of this tetromino at a given rotation
    pub fn shape(&self, rotation: Rotation) -> [(i32, i32); 4] {
        let table = match self {
            TetrominoType::I => &I_SHAPES,
            TetrominoType::J => &J_SHAPES,
            TetrominoType::L => &L_SHAPES,
            TetrominoType::O => &O_SHAPES,
            TetrominoType::S => &S_SHAPES,
            TetrominoType::T => &T_SHAPES,
            TetrominoType::Z => &Z_SHAPES,
        };
        table[rotation.index() as usize]
    }
}

/// Rotation state, always one of the indices `0..=3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North, // 0, spawn state
    West,  // 1
    South, // 2
    East,  // 3
}

impl Rotation {
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Rotation for any integer index, wrapped into `0..=3`
    pub fn from_index(index: i32) -> Rotation {
        match index.rem_euclid(4) {
            0 => Rotation::North,
            1 => Rotation::West,
            2 => Rotation::South,
            _ => Rotation::East,
        }
    }

    /// Turn by one step; negative results wrap to 3
    pub fn turned(&self, direction: RotationDirection) -> Rotation {
        Rotation::from_index(self.index() as i32 + direction.delta())
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Step applied to the rotation index
    pub fn delta(&self) -> i32 {
        match self {
            RotationDirection::Clockwise => -1,
            RotationDirection::CounterClockwise => 1,
        }
    }
}
