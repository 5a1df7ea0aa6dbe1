//! Level definitions and their validated, immutable form
//!
//! A [`LevelDef`] is what a level file contains. [`LevelDef::validate`] checks it against
//! an obstacle registry and produces a [`LevelConfig`], the value a session is built from.
//! Every precondition the cascade engine relies on (non-empty palette, sane board size,
//! known obstacle kinds, in-bounds placements) is rejected here rather than mid-cascade.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "level": 7,
//!   "colors": ["red", "blue", "green", "yellow", "purple"],
//!   "moves": 28,
//!   "target_score": 3000,
//!   "obstacles": [{ "type": "ice", "row": 3, "col": 4 }],
//!   "objectives": [
//!     { "type": "clear_obstacle", "obstacle": "ice", "target": 4 },
//!     { "type": "score", "target": 3000 }
//!   ]
//! }
//! ```
//!
//! `rows` / `cols` default to 9, `rules` to the 3/4/5 thresholds, and a level without
//! objectives gets a single `score` objective for its target score.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ball_crush_types::{
    Color, MatchRules, ObjectiveId, ObstacleKind, ObstacleRegistry, Position, SpecialKind,
    DEFAULT_COLS, DEFAULT_ROWS, MAX_BOARD_DIM,
};

use crate::error::{ConfigError, Result};

/// A level goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectiveDef {
    Score { target: u32 },
    CollectColor { color: Color, target: u32 },
    ActivateSpecial { special: SpecialKind, target: u32 },
    ClearObstacle { obstacle: String, target: u32 },
}

impl ObjectiveDef {
    pub fn id(&self) -> ObjectiveId {
        match self {
            ObjectiveDef::Score { .. } => ObjectiveId::score(),
            ObjectiveDef::CollectColor { color, .. } => ObjectiveId::collect(*color),
            ObjectiveDef::ActivateSpecial { special, .. } => ObjectiveId::special(*special),
            ObjectiveDef::ClearObstacle { obstacle, .. } => ObjectiveId::obstacle(obstacle),
        }
    }

    pub fn target(&self) -> u32 {
        match self {
            ObjectiveDef::Score { target }
            | ObjectiveDef::CollectColor { target, .. }
            | ObjectiveDef::ActivateSpecial { target, .. }
            | ObjectiveDef::ClearObstacle { target, .. } => *target,
        }
    }
}

/// An obstacle placed by name; `hp` overrides the registry's starting hp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstaclePlacement {
    #[serde(rename = "type")]
    pub obstacle: String,
    pub row: i8,
    pub col: i8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<u32>,
}

impl ObstaclePlacement {
    pub fn new(obstacle: &str, row: i8, col: i8) -> Self {
        Self {
            obstacle: obstacle.to_string(),
            row,
            col,
            hp: None,
        }
    }

    pub fn ice(row: i8, col: i8) -> Self {
        Self::new("ice", row, col)
    }

    pub fn stone(row: i8, col: i8) -> Self {
        Self::new("stone", row, col)
    }
}

fn default_rows() -> u8 {
    DEFAULT_ROWS
}

fn default_cols() -> u8 {
    DEFAULT_COLS
}

/// Level definition as authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub level: u32,
    #[serde(default = "default_rows")]
    pub rows: u8,
    #[serde(default = "default_cols")]
    pub cols: u8,
    pub colors: Vec<Color>,
    pub moves: u32,
    pub target_score: u32,
    #[serde(default)]
    pub obstacles: Vec<ObstaclePlacement>,
    #[serde(default)]
    pub objectives: Vec<ObjectiveDef>,
    #[serde(default)]
    pub rules: MatchRules,
}

/// Obstacle resolved against the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedObstacle {
    pub pos: Position,
    pub kind: ObstacleKind,
    pub hp: u32,
}

/// Validated level, immutable for the lifetime of a session
#[derive(Debug, Clone, PartialEq)]
pub struct LevelConfig {
    pub level: u32,
    pub rows: u8,
    pub cols: u8,
    pub colors: Vec<Color>,
    pub moves: u32,
    pub target_score: u32,
    pub obstacles: Vec<PlacedObstacle>,
    /// Never empty
    pub objectives: Vec<ObjectiveDef>,
    pub rules: MatchRules,
}

impl LevelDef {
    /// Parse a level definition from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a level file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let def = Self::from_json(&content)?;
        debug!(path = %path.display(), level = def.level, "loaded level file");
        Ok(def)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the definition and resolve obstacle names
    pub fn validate(&self, registry: &ObstacleRegistry) -> Result<LevelConfig> {
        let level = self.level;
        if level == 0 {
            return Err(ConfigError::LevelZero);
        }
        if self.rows == 0 || self.cols == 0 || self.rows > MAX_BOARD_DIM || self.cols > MAX_BOARD_DIM
        {
            return Err(ConfigError::BoardSize {
                level,
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyPalette { level });
        }
        let mut seen = HashSet::new();
        for color in &self.colors {
            if !seen.insert(*color) {
                return Err(ConfigError::DuplicateColor {
                    level,
                    color: *color,
                });
            }
        }
        if self.moves == 0 {
            return Err(ConfigError::NoMoves { level });
        }
        if !self.rules.is_valid() {
            return Err(ConfigError::InvalidRules {
                level,
                rules: self.rules,
            });
        }

        let obstacles = self.place_obstacles(registry)?;
        let objectives = self.check_objectives(registry)?;

        Ok(LevelConfig {
            level,
            rows: self.rows,
            cols: self.cols,
            colors: self.colors.clone(),
            moves: self.moves,
            target_score: self.target_score,
            obstacles,
            objectives,
            rules: self.rules,
        })
    }

    fn place_obstacles(&self, registry: &ObstacleRegistry) -> Result<Vec<PlacedObstacle>> {
        let level = self.level;
        let mut occupied = HashSet::new();
        let mut placed = Vec::with_capacity(self.obstacles.len());
        for placement in &self.obstacles {
            let kind = registry
                .lookup(&placement.obstacle)
                .ok_or_else(|| ConfigError::UnknownObstacle {
                    level,
                    name: placement.obstacle.clone(),
                })?;
            let (row, col) = (placement.row, placement.col);
            if row < 0 || col < 0 || row as u8 >= self.rows || col as u8 >= self.cols {
                return Err(ConfigError::ObstacleOutOfBounds {
                    level,
                    name: placement.obstacle.clone(),
                    row,
                    col,
                });
            }
            if !occupied.insert((row, col)) {
                return Err(ConfigError::DuplicateObstacle { level, row, col });
            }
            let default_hp = registry.get(kind).map(|def| def.hp).unwrap_or(1);
            placed.push(PlacedObstacle {
                pos: Position::new(row, col),
                kind,
                hp: placement.hp.unwrap_or(default_hp).max(1),
            });
        }
        Ok(placed)
    }

    fn check_objectives(&self, registry: &ObstacleRegistry) -> Result<Vec<ObjectiveDef>> {
        let level = self.level;
        if self.objectives.is_empty() {
            return Ok(vec![ObjectiveDef::Score {
                target: self.target_score,
            }]);
        }
        for objective in &self.objectives {
            let id = objective.id();
            if objective.target() == 0 {
                return Err(ConfigError::ZeroTarget {
                    level,
                    id: id.to_string(),
                });
            }
            match objective {
                ObjectiveDef::Score { .. } => {}
                ObjectiveDef::CollectColor { color, .. } => {
                    if !self.colors.contains(color) {
                        return Err(ConfigError::UnreachableObjective {
                            level,
                            id: id.to_string(),
                            reason: "color is not in the palette",
                        });
                    }
                }
                ObjectiveDef::ActivateSpecial { special, .. } => {
                    if !special.is_special() {
                        return Err(ConfigError::UnreachableObjective {
                            level,
                            id: id.to_string(),
                            reason: "plain pieces are not specials",
                        });
                    }
                }
                ObjectiveDef::ClearObstacle { obstacle, .. } => {
                    if registry.lookup(obstacle).is_none() {
                        return Err(ConfigError::UnknownObstacle {
                            level,
                            name: obstacle.clone(),
                        });
                    }
                }
            }
        }
        Ok(self.objectives.clone())
    }
}
