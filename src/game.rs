//! Game session: one grid, one falling piece, one score, one rule variant

use crate::bag::{Bag, PieceSource, UniformDraw};
use crate::board::{Cell, Grid, Point};
use crate::controller::{spawn_origin, Controller, Step};
use crate::matching::{MatchEngine, SelectOutcome};
use crate::mode::Variant;
use crate::piece::FallingPiece;
use crate::score::{clear_name, Score};
use crate::settings::{ConfigError, SessionConfig};
use crate::tetromino::{Color, Rotation, RotationDirection, TetrominoType};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, trace};

/// Commands the session accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Shift by -1 or +1 column
    Move(i32),
    Rotate(RotationDirection),
    SoftDrop,
    HardDrop,
    /// Match-3 only
    Select(Point),
    /// Match-3 only
    TogglePause,
    /// Periodic gravity, ignored while paused
    Tick,
}

/// What a command did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// False when the command was rejected
    pub accepted: bool,
    /// Points awarded by this command
    pub points: u64,
    /// Rows removed by a lock this command caused
    pub rows_cleared: usize,
}

impl Outcome {
    fn accepted() -> Self {
        Self {
            accepted: true,
            ..Self::default()
        }
    }

    fn rejected() -> Self {
        Self::default()
    }
}

/// The main session struct. All mutation goes through [`GameSession::apply`].
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    grid: Grid,
    controller: Controller,
    matcher: MatchEngine,
    score: Score,
    paused: bool,
    /// Name of the last row clear, for display
    pub last_action: Option<&'static str>,
}

impl GameSession {
    /// Create a session with an empty grid and its first piece spawned
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let source = match config.variant {
            Variant::LineClear => PieceSource::Bag(Bag::with_seed(config.seed)),
            Variant::Match3 => PieceSource::Uniform(UniformDraw::with_seed(config.seed, config.palette())),
        };
        let controller = Controller::new(source, spawn_origin(config.columns));

        info!(
            variant = %config.variant,
            columns = config.columns,
            rows = config.rows,
            seed = config.seed,
            "session started"
        );

        Ok(Self {
            grid: config.empty_grid(),
            config,
            controller,
            matcher: MatchEngine::new(),
            score: Score::new(),
            paused: false,
            last_action: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece(&self) -> &FallingPiece {
        self.controller.piece()
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Apply one command. A rejected command changes nothing, except that a
    /// second selection always empties the selection buffer, even when its
    /// swap is refused.
    pub fn apply(&mut self, command: Command) -> Outcome {
        let outcome = match command {
            Command::Move(dx) if dx == -1 || dx == 1 => {
                Self::flag(self.controller.try_move(&self.grid, dx))
            }
            Command::Move(_) => Outcome::rejected(),
            Command::Rotate(direction) => {
                Self::flag(self.controller.try_rotate(&self.grid, direction))
            }
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::Select(p) => self.select(p),
            Command::TogglePause => self.toggle_pause(),
            Command::Tick => self.tick(),
        };
        if !outcome.accepted {
            trace!(?command, "command rejected");
        }
        outcome
    }

    fn flag(accepted: bool) -> Outcome {
        if accepted {
            Outcome::accepted()
        } else {
            Outcome::rejected()
        }
    }

    fn soft_drop(&mut self) -> Outcome {
        let step = self.controller.step_down(&mut self.grid);
        let mut outcome = self.settle(step);
        if self.variant().scores_drops() {
            self.score.add_drop(1);
            outcome.points += 1;
        }
        outcome
    }

    fn hard_drop(&mut self) -> Outcome {
        let result = self.controller.drop_instant(&mut self.grid);
        let mut outcome = self.settle(Step::Locked {
            rows_cleared: result.rows_cleared,
        });
        if self.variant().scores_drops() {
            self.score.add_drop(result.fell);
            outcome.points += result.fell as u64;
        }
        outcome
    }

    fn tick(&mut self) -> Outcome {
        if self.paused {
            return Outcome::rejected();
        }
        let step = self.controller.step_down(&mut self.grid);
        self.settle(step)
    }

    fn select(&mut self, p: Point) -> Outcome {
        if !self.variant().has_swaps() {
            return Outcome::rejected();
        }
        match self.matcher.select(&mut self.grid, p) {
            SelectOutcome::Rejected => Outcome::rejected(),
            SelectOutcome::Pending => Outcome::accepted(),
            SelectOutcome::Swapped { committed } => {
                if committed {
                    self.score.add_match();
                }
                Self::flag(committed)
            }
        }
    }

    fn toggle_pause(&mut self) -> Outcome {
        if !self.variant().has_swaps() {
            return Outcome::rejected();
        }
        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
        Outcome::accepted()
    }

    /// Score a gravity step's row clears
    fn settle(&mut self, step: Step) -> Outcome {
        let Step::Locked { rows_cleared } = step else {
            return Outcome::accepted();
        };

        let points = self.score.add_clear(rows_cleared);
        if rows_cleared > 0 {
            self.last_action = Some(clear_name(rows_cleared));
            info!(rows_cleared, points, total = self.score.points, "rows cleared");
        }
        Outcome {
            accepted: true,
            points,
            rows_cleared,
        }
    }

    /// Read-only view for renderers, taken after every command
    pub fn snapshot(&self) -> Snapshot {
        let piece = self.controller.piece();
        Snapshot {
            variant: self.config.variant,
            columns: self.grid.columns(),
            rows: self.grid.rows(),
            cells: self.grid.cells().to_vec(),
            piece: PieceView {
                shape: piece.piece_type,
                rotation: piece.rotation,
                origin: piece.origin,
                blocks: piece
                    .blocks()
                    .iter()
                    .map(|&(p, color)| Block { x: p.x, y: p.y, color })
                    .collect(),
            },
            score: self.score,
            paused: self.paused,
            selection: self.matcher.selection().pending().to_vec(),
            spawn_blocked: self.controller.is_overlapping(&self.grid),
        }
    }
}

/// One block of the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

/// The active piece as seen by a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub shape: TetrominoType,
    pub rotation: Rotation,
    pub origin: Point,
    pub blocks: Vec<Block>,
}

/// Everything a renderer needs after a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub variant: Variant,
    pub columns: usize,
    pub rows: usize,
    /// Row-major grid cells
    pub cells: Vec<Cell>,
    pub piece: PieceView,
    pub score: Score,
    pub paused: bool,
    /// Selections waiting for a partner
    pub selection: Vec<Point>,
    /// The active piece overlaps locked cells
    pub spawn_blocked: bool,
}

impl Snapshot {
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.columns + x]
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.rows {
            let line: String = (0..self.columns)
                .map(|x| {
                    let block = self
                        .piece
                        .blocks
                        .iter()
                        .find(|b| b.x == x as i32 && b.y == y as i32);
                    match (block, self.cell(x, y)) {
                        (Some(b), _) => b.color.glyph().to_ascii_lowercase(),
                        (None, Cell::Empty) => '.',
                        (None, Cell::Wall) => '#',
                        (None, Cell::Filled(color)) => color.glyph(),
                    }
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        write!(
            f,
            "score {} | lines {} | matches {}{}",
            self.score.points,
            self.score.lines,
            self.score.matches,
            if self.paused { " | paused" } else { "" }
        )
    }
}
