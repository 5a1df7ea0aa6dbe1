//! Core cascade logic - pure, deterministic, and testable
//!
//! This crate holds the board model and the two algorithms that read it. It knows
//! nothing about animation, input, or I/O, and pulls in only small utility crates
//! (`arrayvec`, `serde`, `tracing`):
//!
//! - **Deterministic**: every random choice draws from a seeded [`SimpleRng`]
//! - **Read-only analysis**: the match detector and special resolver never mutate the
//!   board; they return positions for the coordinator to apply
//! - **Bounds-safe**: out-of-bounds reads are empty cells, writes are ignored
//!
//! # Module Structure
//!
//! - [`board`]: grid storage, swaps, fill / reshuffle without standing matches, legal
//!   move search, gravity
//! - [`matcher`]: run detection, L/T/cross merging, special classification
//! - [`special`]: single special effects, breadth-first chains, special+special combos
//! - [`cellset`]: ordered position set used for clear sets
//! - [`rng`]: seeded LCG
//! - [`scoring`]: match and special points, cascade multiplier
//! - [`snapshot`]: owned board copies for observers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use ball_crush_core::{matcher, Board};
//! use ball_crush_types::{ObstacleRegistry, Position, SpecialKind};
//!
//! let board = Board::from_rows(
//!     &["R R R R B", "G B Y G Y"],
//!     Arc::new(ObstacleRegistry::standard()),
//! )
//! .unwrap();
//!
//! let matches = matcher::detect(&board);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].special_to_create, SpecialKind::RowClear);
//! assert_eq!(matches[0].special_pos, Some(Position::new(0, 2)));
//! ```

pub mod board;
pub mod cellset;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod special;

pub use ball_crush_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Fall};
pub use cellset::CellSet;
pub use matcher::{detect, detect_with, Match, SwapHint};
pub use rng::SimpleRng;
pub use scoring::{match_points, special_points, Cascade};
pub use snapshot::BoardSnapshot;
pub use special::{
    resolve_chain, resolve_combo, resolve_combo_chain, resolve_special, ChainResolution,
    ChainSeed, ClearResult, SpecialActivation, Wave,
};
