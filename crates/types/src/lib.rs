//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behaviour beyond small helpers, making them
//! usable in any context (board model, cascade coordinator, level configs, observers).
//!
//! # Board Coordinates
//!
//! Boards are `rows x cols` matrices (default 9x9), addressed by [`Position`]:
//!
//! - **row**: 0 is the top row, `rows - 1` the bottom row (gravity pulls toward higher rows)
//! - **col**: 0 is the left column
//!
//! Coordinates are signed so neighbourhood arithmetic can step off the board; every board
//! accessor treats out-of-bounds positions as empty.
//!
//! # Gameplay Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `BASE_MATCH_POINTS` | 10 | Points per matched piece (times cascade multiplier) |
//! | `SPECIAL_ACTIVATION_POINTS` | 15 | Points per piece cleared by a special |
//! | `CASCADE_MULTIPLIER_STEP` | 1 | Multiplier increase per cascade recheck |
//! | `CASCADE_MILESTONE_THRESHOLD` | 2 | Cascade count that triggers the milestone notification |
//! | `LAST_MOVE_PAUSE_MS` | 500 | Dramatic pause inserted on the final move |
//! | `FILL_MAX_ATTEMPTS` | 50 | Color retries per cell when filling without matches |
//!
//! # Examples
//!
//! ```
//! use ball_crush_types::{Color, Position, SpecialKind};
//!
//! let color = Color::from_str("Red").unwrap();
//! assert_eq!(color, Color::Red);
//!
//! let a = Position::new(3, 4);
//! assert!(a.is_adjacent(Position::new(3, 5)));
//! assert!(!a.is_adjacent(Position::new(4, 5)));
//!
//! assert!(SpecialKind::AreaBomb.is_special());
//! assert!(!SpecialKind::None.is_special());
//! ```

pub mod obstacle;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

pub use obstacle::{
    DamageTable, DamageTrigger, EffectDescriptor, ObstacleDef, ObstacleEffects, ObstacleRegistry,
};

/// Default board height (9 rows)
pub const DEFAULT_ROWS: u8 = 9;

/// Default board width (9 columns)
pub const DEFAULT_COLS: u8 = 9;

/// Largest supported board dimension on either axis
pub const MAX_BOARD_DIM: u8 = 32;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Points per piece in a plain match (multiplied by the cascade multiplier)
pub const BASE_MATCH_POINTS: u32 = 10;

/// Points per piece cleared by a special activation or combo
pub const SPECIAL_ACTIVATION_POINTS: u32 = 15;

/// Cascade multiplier increase applied on every recheck
pub const CASCADE_MULTIPLIER_STEP: u32 = 1;

/// Cascade count at which the milestone notification starts firing
pub const CASCADE_MILESTONE_THRESHOLD: u32 = 2;

/// Pause inserted before resolving the final move (milliseconds)
pub const LAST_MOVE_PAUSE_MS: u32 = 500;

/// Color attempts per cell before `fill` accepts a placement that completes a run
pub const FILL_MAX_ATTEMPTS: u32 = 50;

/// Number of recent refill colors remembered per column
pub const COLUMN_HISTORY_LEN: usize = 3;

/// Cleared-cell count at which a match pass fires the large-clear notification
pub const LARGE_CLEAR_THRESHOLD: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_crush_tuning_defaults() {
        assert_eq!(DEFAULT_ROWS, 9);
        assert_eq!(DEFAULT_COLS, 9);
        assert_eq!(BASE_MATCH_POINTS, 10);
        assert_eq!(SPECIAL_ACTIVATION_POINTS, 15);
        assert_eq!(CASCADE_MULTIPLIER_STEP, 1);
        assert_eq!(CASCADE_MILESTONE_THRESHOLD, 2);
        assert_eq!(LAST_MOVE_PAUSE_MS, 500);
        assert_eq!(FILL_MAX_ATTEMPTS, 50);
        assert_eq!(COLUMN_HISTORY_LEN, 3);
    }

    #[test]
    fn position_midpoint_rounds_half_up() {
        let a = Position::new(3, 4);
        let b = Position::new(4, 4);
        assert_eq!(a.midpoint(b), Position::new(4, 4));
        assert_eq!(b.midpoint(a), Position::new(4, 4));
        assert_eq!(a.midpoint(Position::new(3, 5)), Position::new(3, 5));
    }

    #[test]
    fn special_kind_names_round_trip() {
        for kind in [
            SpecialKind::None,
            SpecialKind::RowClear,
            SpecialKind::ColumnClear,
            SpecialKind::AreaBomb,
            SpecialKind::Rainbow,
        ] {
            assert_eq!(SpecialKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn objective_ids() {
        assert_eq!(ObjectiveId::score().as_str(), "score");
        assert_eq!(ObjectiveId::collect(Color::Purple).as_str(), "collect_purple");
        assert_eq!(
            ObjectiveId::special(SpecialKind::AreaBomb).as_str(),
            "special_area_bomb"
        );
        assert_eq!(ObjectiveId::obstacle("ice").to_string(), "obstacle_ice");
    }

    #[test]
    fn default_match_rules_are_valid() {
        assert!(MatchRules::default().is_valid());
        let broken = MatchRules {
            min_run: 3,
            line_special_len: 3,
            rainbow_len: 5,
        };
        assert!(!broken.is_valid());
    }

    #[test]
    fn cell_occupancy_classes() {
        let piece = Piece::new(PieceId(1), Color::Red);
        let obstacle = Obstacle::new(ObstacleKind(0), 2);

        assert!(Cell::EMPTY.is_empty());
        assert!(Cell::with_piece(piece).has_piece());
        assert!(Cell::with_obstacle(obstacle).has_obstacle());
        assert!(!Cell::with_obstacle(obstacle).has_piece());

        let hosted = Cell {
            piece: Some(piece),
            obstacle: Some(obstacle),
        };
        assert!(hosted.has_piece() && hosted.has_obstacle());
        assert!(!hosted.is_empty());
    }
}

/// A board coordinate (row, column)
///
/// Signed so that neighbourhood arithmetic may step outside the board; bounds are
/// checked by the board, never by the position itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Position shifted by (dr, dc)
    pub const fn offset(self, dr: i8, dc: i8) -> Self {
        Self {
            row: self.row.wrapping_add(dr),
            col: self.col.wrapping_add(dc),
        }
    }

    /// 4-directional neighbours: up, down, left, right
    pub fn neighbors(self) -> [Position; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    /// True when the two positions are at Manhattan distance exactly 1
    pub fn is_adjacent(self, other: Position) -> bool {
        let dr = (self.row as i16 - other.row as i16).abs();
        let dc = (self.col as i16 - other.col as i16).abs();
        dr + dc == 1
    }

    /// Cell between two positions, rounding halves toward the higher index
    pub fn midpoint(self, other: Position) -> Position {
        let row = (self.row as i16 + other.row as i16 + 1).div_euclid(2);
        let col = (self.col as i16 + other.col as i16 + 1).div_euclid(2);
        Position::new(row as i8, col as i8)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The six piece colors
///
/// A level palette is a non-empty subset of these.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl Color {
    /// Every color, in palette order
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
    ];

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use ball_crush_types::Color;
    ///
    /// assert_eq!(Color::from_str("purple"), Some(Color::Purple));
    /// assert_eq!(Color::from_str("ORANGE"), Some(Color::Orange));
    /// assert_eq!(Color::from_str("teal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "blue" => Some(Color::Blue),
            "green" => Some(Color::Green),
            "yellow" => Some(Color::Yellow),
            "purple" => Some(Color::Purple),
            "orange" => Some(Color::Orange),
            _ => None,
        }
    }

    /// Lowercase name, used in objective ids
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Single-letter glyph for text boards
    pub fn glyph(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Green => 'G',
            Color::Yellow => 'Y',
            Color::Purple => 'P',
            Color::Orange => 'O',
        }
    }
}

/// Special piece behaviour
///
/// A closed set: every consumer matches exhaustively.
///
/// - **None**: plain piece
/// - **RowClear**: clears its entire row when activated
/// - **ColumnClear**: clears its entire column when activated
/// - **AreaBomb**: clears the 3x3 neighbourhood around it
/// - **Rainbow**: clears every piece of a target color
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpecialKind {
    #[default]
    None,
    RowClear,
    ColumnClear,
    AreaBomb,
    Rainbow,
}

impl SpecialKind {
    /// Parse from the snake_case name used in configs and objective ids
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(SpecialKind::None),
            "row_clear" => Some(SpecialKind::RowClear),
            "column_clear" => Some(SpecialKind::ColumnClear),
            "area_bomb" => Some(SpecialKind::AreaBomb),
            "rainbow" => Some(SpecialKind::Rainbow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// True for every kind except `None`
    pub fn is_special(&self) -> bool {
        !matches!(self, SpecialKind::None)
    }

    /// True for the row/column line clears
    pub fn is_line(&self) -> bool {
        matches!(self, SpecialKind::RowClear | SpecialKind::ColumnClear)
    }
}

/// Opaque identity of a piece, stable across swaps, falls and reshuffles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

/// A colored board occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub special: SpecialKind,
}

impl Piece {
    /// Plain (non-special) piece
    pub fn new(id: PieceId, color: Color) -> Self {
        Self {
            id,
            color,
            special: SpecialKind::None,
        }
    }

    pub fn special(id: PieceId, color: Color, special: SpecialKind) -> Self {
        Self { id, color, special }
    }

    pub fn is_special(&self) -> bool {
        self.special.is_special()
    }
}

/// Registry key of an obstacle definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleKind(pub u8);

/// An obstacle instance: immutable kind plus remaining hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub hp: u32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, hp: u32) -> Self {
        Self { kind, hp }
    }
}

/// A board cell
///
/// Exactly one of four occupancy classes:
/// - empty (`piece` and `obstacle` both `None`)
/// - piece only
/// - obstacle only
/// - obstacle hosting a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub piece: Option<Piece>,
    pub obstacle: Option<Obstacle>,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        piece: None,
        obstacle: None,
    };

    pub fn with_piece(piece: Piece) -> Self {
        Self {
            piece: Some(piece),
            obstacle: None,
        }
    }

    pub fn with_obstacle(obstacle: Obstacle) -> Self {
        Self {
            piece: None,
            obstacle: Some(obstacle),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_none() && self.obstacle.is_none()
    }

    pub fn has_piece(&self) -> bool {
        self.piece.is_some()
    }

    pub fn has_obstacle(&self) -> bool {
        self.obstacle.is_some()
    }

    pub fn color(&self) -> Option<Color> {
        self.piece.map(|p| p.color)
    }

    pub fn special(&self) -> SpecialKind {
        self.piece.map(|p| p.special).unwrap_or_default()
    }
}

/// Cascade coordinator state
///
/// The flow is `Entrance -> Idle <-> Swapping -> MatchCheck -> Clearing -> Falling ->
/// Recheck -> MatchCheck -> ... -> Idle`, with `LevelComplete` / `GameOver` terminal.
/// `Idle` is the only state that accepts input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CascadeState {
    /// One-time initial fill animation
    Entrance,
    /// Waiting for player input
    Idle,
    /// Swap in flight (animation or last-move pause)
    Swapping,
    /// Scan for matches on the next tick
    MatchCheck,
    /// Clearing matched cells or playing special waves
    Clearing,
    /// Gravity and refill animations in flight
    Falling,
    /// Bump the cascade multiplier on the next tick, then rescan
    Recheck,
    /// Deadlock recovery animation in flight
    Reshuffling,
    LevelComplete,
    GameOver,
}

impl CascadeState {
    /// True once the level has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, CascadeState::LevelComplete | CascadeState::GameOver)
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Shape of a merged match group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchShape {
    /// A single straight run
    Line,
    /// Two runs meeting at an end of each
    L,
    /// Two runs meeting at the end of one and the interior of the other
    T,
    /// Runs crossing through their interiors, or three or more merged runs
    Cross,
}

/// Run-length thresholds used by the match detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Shortest run that counts as a match
    pub min_run: u8,
    /// Straight run length that creates a row/column clear
    pub line_special_len: u8,
    /// Run length that creates a rainbow (straight or as part of an L/T)
    pub rainbow_len: u8,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            min_run: 3,
            line_special_len: 4,
            rainbow_len: 5,
        }
    }
}

impl MatchRules {
    /// Thresholds must be strictly increasing from a minimum run of 2
    pub fn is_valid(&self) -> bool {
        self.min_run >= 2
            && self.line_special_len > self.min_run
            && self.rainbow_len > self.line_special_len
    }
}

/// Objective tracker key
///
/// | Id | Progress source |
/// |----|-----------------|
/// | `score` | points scored |
/// | `collect_<color>` | pieces of that color cleared by matches |
/// | `special_<kind>` | specials of that kind activated |
/// | `obstacle_<name>` | obstacles of that registry name destroyed |
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectiveId(String);

impl ObjectiveId {
    pub fn score() -> Self {
        Self("score".to_string())
    }

    pub fn collect(color: Color) -> Self {
        Self(format!("collect_{}", color.as_str()))
    }

    pub fn special(kind: SpecialKind) -> Self {
        Self(format!("special_{}", kind.as_str()))
    }

    pub fn obstacle(name: &str) -> Self {
        Self(format!("obstacle_{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
