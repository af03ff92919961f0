//! TETRS Crush - falling blocks, two ways
//!
//! A grid engine shared by a classic line-clear mode and a match-3 mode where
//! locked blocks are swapped to line up colors.

pub mod bag;
pub mod board;
pub mod controller;
pub mod game;
pub mod input;
pub mod lines;
pub mod matching;
pub mod mode;
pub mod piece;
pub mod runtime;
pub mod score;
pub mod settings;
pub mod tetromino;

pub use game::{Command, GameSession, Outcome, Snapshot};
pub use mode::Variant;
pub use settings::{ConfigError, SessionConfig, Settings};
