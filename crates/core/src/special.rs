//! Special resolver - computes what special pieces clear, in breadth-first waves
//!
//! Nothing here mutates the board. The resolver reads a stable view of the cells and
//! returns the cells to clear; the cascade coordinator applies them afterwards.
//!
//! # Single specials
//!
//! | Kind | Clears |
//! |------|--------|
//! | `RowClear` | its whole row |
//! | `ColumnClear` | its whole column |
//! | `AreaBomb` | the 3x3 block around it |
//! | `Rainbow` | every piece of the target color, plus itself |
//!
//! # Chains
//!
//! Wave 0 holds the explicitly activated specials. Any special caught in a wave's clear
//! area fires in the next wave. A shared [`CellSet`] guarantees that no cell is cleared
//! twice, and a second set of fired origins guarantees that no special fires twice.
//! A chained rainbow has no swap partner, so it targets a random color on the board.
//!
//! # Combos
//!
//! Swapping two specials fires a combined effect instead of the two individual ones:
//!
//! | A | B | Clears |
//! |---|---|--------|
//! | rainbow | any | every piece of the other's color |
//! | bomb | bomb | 5x5 block around the swap midpoint |
//! | row / column | same orientation | the target's row or column |
//! | row / column | other orientation | both rows and both columns |
//! | bomb | row / column | three rows and three columns around the bomb |
//!
//! Both origin cells are always cleared. The combo is wave 0 of its own chain.

use arrayvec::ArrayVec;
use tracing::trace;

use crate::board::Board;
use crate::cellset::CellSet;
use crate::rng::SimpleRng;
use crate::types::{Color, Position, SpecialKind};

/// Cells newly claimed by one activation, plus the specials it exposed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearResult {
    pub positions: Vec<Position>,
    pub chain_specials: Vec<Position>,
}

/// A special to fire, with the rainbow target if one is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSeed {
    pub pos: Position,
    pub target_color: Option<Color>,
}

impl ChainSeed {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            target_color: None,
        }
    }

    pub fn with_target(pos: Position, target_color: Option<Color>) -> Self {
        Self { pos, target_color }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialActivation {
    pub kind: SpecialKind,
    pub origin: Position,
    /// Cells first claimed by this activation
    pub affected: Vec<Position>,
}

/// Activations that fire together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wave {
    pub activations: Vec<SpecialActivation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainResolution {
    pub waves: Vec<Wave>,
    /// Union of all affected cells, in discovery order
    pub all_to_clear: CellSet,
}

/// Collects cells into the shared cleared set, noting specials that should chain
struct Clearer<'a> {
    board: &'a Board,
    cleared: &'a mut CellSet,
    origins: ArrayVec<Position, 2>,
    result: ClearResult,
}

impl<'a> Clearer<'a> {
    fn new(board: &'a Board, cleared: &'a mut CellSet, origins: &[Position]) -> Self {
        Self {
            board,
            cleared,
            origins: origins.iter().copied().collect(),
            result: ClearResult::default(),
        }
    }

    fn add(&mut self, pos: Position) {
        if !self.cleared.insert(pos) {
            return;
        }
        self.result.positions.push(pos);
        if self.board.get(pos).special().is_special() && !self.origins.contains(&pos) {
            self.result.chain_specials.push(pos);
        }
    }

    fn row(&mut self, row: i8) {
        for c in 0..self.board.cols() as i8 {
            self.add(Position::new(row, c));
        }
    }

    fn column(&mut self, col: i8) {
        for r in 0..self.board.rows() as i8 {
            self.add(Position::new(r, col));
        }
    }

    fn square(&mut self, center: Position, radius: i8) {
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                self.add(center.offset(dr, dc));
            }
        }
    }

    fn color(&mut self, color: Color) {
        let targets: Vec<Position> = self
            .board
            .positions()
            .filter(|p| self.board.get(*p).color() == Some(color))
            .collect();
        for pos in targets {
            self.add(pos);
        }
    }

    fn finish(self) -> ClearResult {
        self.result
    }
}

/// Resolve one special at `pos`
///
/// A rainbow without a target clears only itself. A plain or empty cell clears nothing.
pub fn resolve_special(
    board: &Board,
    pos: Position,
    target_color: Option<Color>,
    cleared: &mut CellSet,
) -> ClearResult {
    let mut clearer = Clearer::new(board, cleared, &[pos]);
    match board.get(pos).special() {
        SpecialKind::None => {}
        SpecialKind::RowClear => clearer.row(pos.row),
        SpecialKind::ColumnClear => clearer.column(pos.col),
        SpecialKind::AreaBomb => clearer.square(pos, 1),
        SpecialKind::Rainbow => {
            if let Some(color) = target_color {
                clearer.color(color);
            }
            clearer.add(pos);
        }
    }
    clearer.finish()
}

/// Resolve a chain starting from `seeds`, skipping cells already in `cleared`
pub fn resolve_chain(
    board: &Board,
    seeds: &[ChainSeed],
    cleared: CellSet,
    rng: &mut SimpleRng,
) -> ChainResolution {
    let mut fired = CellSet::new(board.rows(), board.cols());
    let first: Vec<ChainSeed> = seeds.iter().copied().filter(|s| fired.insert(s.pos)).collect();
    let mut resolution = ChainResolution {
        waves: Vec::new(),
        all_to_clear: cleared,
    };
    run_waves(board, first, &mut fired, &mut resolution, rng);
    resolution
}

/// Resolve the combo of the specials at `a` (swap origin) and `b` (swap target)
///
/// Every one of the 25 ordered kind pairs has a defined result; pairs without a combo
/// effect (either side plain) clear nothing.
pub fn resolve_combo(
    board: &Board,
    a: Position,
    b: Position,
    cleared: &mut CellSet,
) -> ClearResult {
    use SpecialKind::*;

    let kind_a = board.get(a).special();
    let kind_b = board.get(b).special();
    let mut clearer = Clearer::new(board, cleared, &[a, b]);

    match (kind_a, kind_b) {
        (Rainbow, _) | (_, Rainbow) => {
            let other = if kind_a == Rainbow { b } else { a };
            if let Some(color) = board.get(other).color() {
                clearer.color(color);
            }
        }
        (None, _) | (_, None) => return clearer.finish(),
        (AreaBomb, AreaBomb) => clearer.square(a.midpoint(b), 2),
        (RowClear, RowClear) => clearer.row(b.row),
        (ColumnClear, ColumnClear) => clearer.column(b.col),
        (RowClear, ColumnClear) | (ColumnClear, RowClear) => {
            clearer.row(a.row);
            clearer.column(a.col);
            clearer.row(b.row);
            clearer.column(b.col);
        }
        (AreaBomb, RowClear | ColumnClear) | (RowClear | ColumnClear, AreaBomb) => {
            let bomb = if kind_a == AreaBomb { a } else { b };
            for d in -1..=1 {
                clearer.row(bomb.row + d);
                clearer.column(bomb.col + d);
            }
        }
    }
    clearer.add(a);
    clearer.add(b);
    clearer.finish()
}

/// Resolve a combo as wave 0 followed by the chain it exposes
pub fn resolve_combo_chain(
    board: &Board,
    a: Position,
    b: Position,
    rng: &mut SimpleRng,
) -> ChainResolution {
    let mut cleared = CellSet::new(board.rows(), board.cols());
    let mut fired = CellSet::new(board.rows(), board.cols());
    fired.insert(a);
    fired.insert(b);

    let combo = resolve_combo(board, a, b, &mut cleared);
    let kind = combo_visual_kind(board.get(a).special(), board.get(b).special());
    let next: Vec<ChainSeed> = combo
        .chain_specials
        .iter()
        .copied()
        .filter(|p| fired.insert(*p))
        .map(ChainSeed::new)
        .collect();

    let mut resolution = ChainResolution {
        waves: vec![Wave {
            activations: vec![SpecialActivation {
                kind,
                origin: a.midpoint(b),
                affected: combo.positions,
            }],
        }],
        all_to_clear: cleared,
    };
    run_waves(board, next, &mut fired, &mut resolution, rng);
    resolution
}

/// Dominant kind of a combo, for presentation
pub fn combo_visual_kind(a: SpecialKind, b: SpecialKind) -> SpecialKind {
    if a == SpecialKind::Rainbow || b == SpecialKind::Rainbow {
        SpecialKind::Rainbow
    } else if a == SpecialKind::AreaBomb || b == SpecialKind::AreaBomb {
        SpecialKind::AreaBomb
    } else {
        a
    }
}

fn run_waves(
    board: &Board,
    mut current: Vec<ChainSeed>,
    fired: &mut CellSet,
    resolution: &mut ChainResolution,
    rng: &mut SimpleRng,
) {
    while !current.is_empty() {
        let mut wave = Wave::default();
        let mut next = Vec::new();
        for seed in current {
            let kind = board.get(seed.pos).special();
            if !kind.is_special() {
                continue;
            }
            let target = match (kind, seed.target_color) {
                (SpecialKind::Rainbow, None) => random_board_color(board, rng),
                (_, target) => target,
            };
            let result = resolve_special(board, seed.pos, target, &mut resolution.all_to_clear);
            trace!(
                wave = resolution.waves.len(),
                kind = kind.as_str(),
                origin = %seed.pos,
                affected = result.positions.len(),
                "special activation"
            );
            next.extend(
                result
                    .chain_specials
                    .iter()
                    .copied()
                    .filter(|p| fired.insert(*p))
                    .map(ChainSeed::new),
            );
            wave.activations.push(SpecialActivation {
                kind,
                origin: seed.pos,
                affected: result.positions,
            });
        }
        if !wave.activations.is_empty() {
            resolution.waves.push(wave);
        }
        current = next;
    }
}

/// Color of a random piece on the board (weighted by how often each color appears)
fn random_board_color(board: &Board, rng: &mut SimpleRng) -> Option<Color> {
    let colors: Vec<Color> = board.cells().iter().filter_map(|c| c.color()).collect();
    rng.pick(&colors)
}
