//! Piece randomizers
//!
//! The line-clear variant uses a "7-bag": all 7 pieces are shuffled, then
//! dealt out before reshuffling, which prevents long droughts. The match-3
//! variant draws each shape uniformly and gives every block its own color.
//! Both are seeded so a session can be replayed exactly.

use crate::tetromino::{Color, TetrominoType};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct Bag {
    rng: ChaCha8Rng,
    /// Pieces left in the current bag, drawn from the front
    queue: Vec<TetrominoType>,
}

impl Bag {
    /// Create a bag whose shuffles are fully determined by `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            queue: Vec::with_capacity(7),
        }
    }

    /// Get the next piece, reshuffling a fresh bag once the current one is empty
    pub fn next(&mut self) -> TetrominoType {
        if self.queue.is_empty() {
            self.refill();
        }
        self.queue.remove(0)
    }

    /// Number of pieces left before the next reshuffle
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    fn refill(&mut self) {
        let mut new_bag = TetrominoType::all().to_vec();
        new_bag.shuffle(&mut self.rng);
        self.queue.extend(new_bag);
    }
}

/// Uniform shape draw with a random color per block
#[derive(Debug, Clone)]
pub struct UniformDraw {
    rng: ChaCha8Rng,
    palette: Vec<Color>,
}

impl UniformDraw {
    /// `palette` must not be empty
    pub fn with_seed(seed: u64, palette: &[Color]) -> Self {
        assert!(!palette.is_empty(), "palette needs at least one color");
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            palette: palette.to_vec(),
        }
    }

    pub fn next(&mut self) -> (TetrominoType, [Color; 4]) {
        let all = TetrominoType::all();
        let piece = all[self.rng.gen_range(0..all.len())];
        let colors = std::array::from_fn(|_| self.palette[self.rng.gen_range(0..self.palette.len())]);
        (piece, colors)
    }
}

/// Where new pieces come from, chosen per variant
#[derive(Debug, Clone)]
pub enum PieceSource {
    Bag(Bag),
    Uniform(UniformDraw),
}

impl PieceSource {
    /// Next shape and the color of each of its 4 blocks
    pub fn next(&mut self) -> (TetrominoType, [Color; 4]) {
        match self {
            PieceSource::Bag(bag) => {
                let piece = bag.next();
                (piece, [piece.color(); 4])
            }
            PieceSource::Uniform(draw) => draw.next(),
        }
    }
}
