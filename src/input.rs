//! Script input: one command word per line, resolved through the key bindings
//!
//! Words are matched case-insensitively. `select` takes two coordinates,
//! everything else takes none. Blank lines and `#` comments are skipped.

use crate::board::Point;
use crate::game::Command;
use crate::settings::{KeyBindings, Settings};
use crate::tetromino::RotationDirection;
use thiserror::Error;

/// What one script line asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptAction {
    Apply(Command),
    /// Emit a snapshot
    Print,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("line {line}: unknown command '{word}'")]
    UnknownCommand { line: usize, word: String },
    #[error("line {line}: '{word}' needs x and y coordinates")]
    MissingCoordinates { line: usize, word: String },
    #[error("line {line}: '{value}' is not a coordinate")]
    BadCoordinate { line: usize, value: String },
    #[error("line {line}: unexpected argument '{arg}'")]
    UnexpectedArgument { line: usize, arg: String },
}

/// Maps script words to actions
#[derive(Debug, Clone)]
pub struct InputHandler {
    bindings: KeyBindings,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            bindings: KeyBindings::default(),
        }
    }

    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bindings: settings.keys.clone(),
        }
    }

    /// Parse one line. `line` is 1-based and only used in errors.
    pub fn parse_line(&self, line: usize, text: &str) -> Result<Option<ScriptAction>, InputError> {
        let text = match text.find('#') {
            Some(start) => &text[..start],
            None => text,
        };
        let mut words = text.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(None);
        };
        let word = normalize_word(word);
        let keys = &self.bindings;

        let action = if keys.select.contains(&word) {
            let point = parse_point(line, &word, &mut words)?;
            ScriptAction::Apply(Command::Select(point))
        } else if keys.move_left.contains(&word) {
            ScriptAction::Apply(Command::Move(-1))
        } else if keys.move_right.contains(&word) {
            ScriptAction::Apply(Command::Move(1))
        } else if keys.rotate_cw.contains(&word) {
            ScriptAction::Apply(Command::Rotate(RotationDirection::Clockwise))
        } else if keys.rotate_ccw.contains(&word) {
            ScriptAction::Apply(Command::Rotate(RotationDirection::CounterClockwise))
        } else if keys.soft_drop.contains(&word) {
            ScriptAction::Apply(Command::SoftDrop)
        } else if keys.hard_drop.contains(&word) {
            ScriptAction::Apply(Command::HardDrop)
        } else if keys.pause.contains(&word) {
            ScriptAction::Apply(Command::TogglePause)
        } else if keys.tick.contains(&word) {
            ScriptAction::Apply(Command::Tick)
        } else if keys.print.contains(&word) {
            ScriptAction::Print
        } else if keys.quit.contains(&word) {
            ScriptAction::Quit
        } else {
            return Err(InputError::UnknownCommand { line, word });
        };

        if let Some(arg) = words.next() {
            return Err(InputError::UnexpectedArgument {
                line,
                arg: arg.to_string(),
            });
        }
        Ok(Some(action))
    }

    /// Parse a whole script, stopping at the first bad line
    pub fn parse_script(&self, script: &str) -> Result<Vec<ScriptAction>, InputError> {
        let mut actions = Vec::new();
        for (index, text) in script.lines().enumerate() {
            if let Some(action) = self.parse_line(index + 1, text)? {
                actions.push(action);
            }
        }
        Ok(actions)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_point<'a>(
    line: usize,
    word: &str,
    args: &mut impl Iterator<Item = &'a str>,
) -> Result<Point, InputError> {
    let mut coordinate = || -> Result<i32, InputError> {
        let value = args.next().ok_or_else(|| InputError::MissingCoordinates {
            line,
            word: word.to_string(),
        })?;
        value.parse().map_err(|_| InputError::BadCoordinate {
            line,
            value: value.to_string(),
        })
    };
    let x = coordinate()?;
    let y = coordinate()?;
    Ok(Point::new(x, y))
}

/// Normalize words for consistent matching
fn normalize_word(word: &str) -> String {
    word.to_ascii_lowercase()
}
