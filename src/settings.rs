//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/tetrs-crush/settings.toml (or platform equivalent)

use crate::board::{Grid, MIN_DIMENSION};
use crate::controller::spawn_origin;
use crate::mode::Variant;
use crate::piece::FallingPiece;
use crate::tetromino::{Color, Rotation, TetrominoType};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize settings")]
    Serialize(#[from] toml::ser::Error),
    #[error("grid must be at least 4x4, got {columns}x{rows}")]
    GridTooSmall { columns: usize, rows: usize },
    #[error("a {columns}x{rows} {variant} grid has no room to spawn every piece")]
    SpawnBlocked {
        variant: Variant,
        columns: usize,
        rows: usize,
    },
    #[error("palette size must be between 2 and 7, got {0}")]
    PaletteSize(usize),
}

/// All settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rules and grid
    pub session: SessionSettings,
    /// Words accepted by the command script
    pub keys: KeyBindings,
    /// Log output
    pub logging: LoggingSettings,
}

/// Session settings as written in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub variant: Variant,
    /// Per-variant default when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Seed for the piece randomizer; entropy when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Colors in the match-3 palette
    pub palette_size: usize,
    /// Gravity interval in milliseconds, 0 disables it
    pub tick_ms: u64,
}

/// Script words, stored as strings for easy editing.
/// Each action can have one or more words bound to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_cw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_ccw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub select: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub tick: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub print: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_lowercase()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key.to_lowercase());
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if keys.len() == 1 {
        serializer.serialize_str(&keys[0])
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence
    pub filter: String,
    /// Directory for log files, the temp directory when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            variant: Variant::LineClear,
            columns: None,
            rows: None,
            seed: None,
            palette_size: 4,
            tick_ms: 1000,
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: words(&["left", "h"]),
            move_right: words(&["right", "l"]),
            rotate_cw: words(&["up", "rotate", "x"]),
            rotate_ccw: words(&["z"]),
            soft_drop: words(&["down", "j"]),
            hard_drop: words(&["space", "drop"]),
            select: words(&["select", "click"]),
            pause: words(&["p", "pause"]),
            tick: words(&["tick"]),
            print: words(&["print", "show"]),
            quit: words(&["q", "quit", "esc"]),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "tetrs_crush=info".to_string(),
            directory: None,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tetrs", "tetrs-crush").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the default location, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Save settings to a file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve defaults and validate into a session configuration
    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        let s = &self.session;
        let (default_columns, default_rows) = s.variant.default_dimensions();
        let config = SessionConfig {
            variant: s.variant,
            columns: s.columns.unwrap_or(default_columns),
            rows: s.rows.unwrap_or(default_rows),
            seed: s.seed.unwrap_or_else(rand::random),
            palette_size: s.palette_size,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Fully resolved parameters for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub variant: Variant,
    pub columns: usize,
    pub rows: usize,
    pub seed: u64,
    pub palette_size: usize,
}

impl SessionConfig {
    /// Variant defaults with the given seed
    pub fn new(variant: Variant, seed: u64) -> Self {
        let (columns, rows) = variant.default_dimensions();
        Self {
            variant,
            columns,
            rows,
            seed,
            palette_size: SessionSettings::default().palette_size,
        }
    }

    pub fn with_dimensions(mut self, columns: usize, rows: usize) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    pub fn with_palette_size(mut self, palette_size: usize) -> Self {
        self.palette_size = palette_size;
        self
    }

    /// Colors the match-3 randomizer draws from
    pub fn palette(&self) -> &'static [Color] {
        &Color::MATCH_PALETTE[..self.palette_size.min(Color::MATCH_PALETTE.len())]
    }

    /// Empty grid for this configuration
    pub fn empty_grid(&self) -> Grid {
        if self.variant.walled() {
            Grid::walled(self.columns, self.rows)
        } else {
            Grid::open(self.columns, self.rows)
        }
    }

    /// Reject grids too small to hold every piece, in every rotation, at the
    /// spawn origin
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < MIN_DIMENSION || self.rows < MIN_DIMENSION {
            return Err(ConfigError::GridTooSmall {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if !(2..=Color::MATCH_PALETTE.len()).contains(&self.palette_size) {
            return Err(ConfigError::PaletteSize(self.palette_size));
        }

        let grid = self.empty_grid();
        let spawn = spawn_origin(self.columns);
        let fits = TetrominoType::all().iter().all(|&t| {
            let piece = FallingPiece::uniform(t, spawn);
            (0..4).all(|r| piece.fits_at(&grid, spawn, Rotation::from_index(r)))
        });
        if !fits {
            return Err(ConfigError::SpawnBlocked {
                variant: self.variant,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }
}
