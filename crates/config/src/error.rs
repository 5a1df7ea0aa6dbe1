//! Error types raised while loading or validating level definitions.

use std::path::PathBuf;

use thiserror::Error;

use ball_crush_types::{Color, MatchRules};

/// Errors surfaced by level loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("level {level} has an empty color palette")]
    EmptyPalette { level: u32 },

    #[error("level {level} lists color {color} more than once")]
    DuplicateColor { level: u32, color: Color },

    #[error("level {level} has invalid board size {rows}x{cols}")]
    BoardSize { level: u32, rows: u8, cols: u8 },

    #[error("level {level} has no moves")]
    NoMoves { level: u32 },

    #[error("level {level} places unknown obstacle `{name}`")]
    UnknownObstacle { level: u32, name: String },

    #[error("level {level} places obstacle `{name}` outside the board at ({row}, {col})")]
    ObstacleOutOfBounds {
        level: u32,
        name: String,
        row: i8,
        col: i8,
    },

    #[error("level {level} places two obstacles at ({row}, {col})")]
    DuplicateObstacle { level: u32, row: i8, col: i8 },

    #[error("level {level} objective `{id}` has a zero target")]
    ZeroTarget { level: u32, id: String },

    #[error("level {level} objective `{id}` can never progress: {reason}")]
    UnreachableObjective {
        level: u32,
        id: String,
        reason: &'static str,
    },

    #[error("level {level} has invalid match rules {rules:?}")]
    InvalidRules { level: u32, rules: MatchRules },

    #[error("level number must start at 1")]
    LevelZero,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
