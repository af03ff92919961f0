//! Rule variants: classic line clearing and swap-based match-3

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available rule variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    #[default]
    LineClear, // Walled well, 7-bag, rows clear
    Match3,    // Open grid, per-block colors, swaps clear runs
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::LineClear => "line-clear",
            Variant::Match3 => "match3",
        }
    }

    /// Grid size when the configuration leaves it open, `(columns, rows)`
    pub fn default_dimensions(&self) -> (usize, usize) {
        match self {
            Variant::LineClear => (12, 24),
            Variant::Match3 => (13, 26),
        }
    }

    /// Whether the grid carries a wall border
    pub fn walled(&self) -> bool {
        matches!(self, Variant::LineClear)
    }

    /// Soft and hard drops award a point per row fallen
    pub fn scores_drops(&self) -> bool {
        matches!(self, Variant::Match3)
    }

    /// Pause and cell selection are part of the command surface
    pub fn has_swaps(&self) -> bool {
        matches!(self, Variant::Match3)
    }

    pub fn all() -> &'static [Variant] {
        &[Variant::LineClear, Variant::Match3]
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "line-clear" | "lineclear" | "classic" => Ok(Variant::LineClear),
            "match3" | "match-3" | "crush" => Ok(Variant::Match3),
            other => Err(format!("unknown variant '{other}' (expected line-clear or match3)")),
        }
    }
}
