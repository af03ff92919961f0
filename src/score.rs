//! Scoring: a fixed per-clear table plus drop points

use serde::Serialize;

/// Points for clearing `rows` rows with one piece lock.
/// The table is applied once per lock, never per row.
pub fn line_clear_points(rows: usize) -> u64 {
    match rows {
        1 => 100,
        2 => 300,
        3 => 500,
        4 => 800,
        _ => 0,
    }
}

/// Display name for a clear of `rows` rows
pub fn clear_name(rows: usize) -> &'static str {
    match rows {
        0 => "",
        1 => "Single",
        2 => "Double",
        3 => "Triple",
        4 => "Tetris",
        _ => "Overflow",
    }
}

/// Score tracking for one session. Never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total rows cleared
    pub lines: u32,
    /// Committed match-3 swaps
    pub matches: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one lock's row clears and return the points awarded
    pub fn add_clear(&mut self, rows: usize) -> u64 {
        let points = line_clear_points(rows);
        self.lines += rows as u32;
        self.points += points;
        points
    }

    /// Add drop points (1 point per step)
    pub fn add_drop(&mut self, steps: u32) {
        self.points += steps as u64;
    }

    pub fn add_match(&mut self) {
        self.matches += 1;
    }
}
