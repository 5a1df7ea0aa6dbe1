//! Board module - manages the game grid
//!
//! The board is a `rows x cols` grid (default 9x9) where each [`Cell`] is empty, holds a
//! piece, holds an obstacle, or holds an obstacle hosting a piece.
//! Uses a flat row-major vector; dimensions are fixed for the lifetime of a level.
//! Coordinates: (row, col) where row 0 is the top and gravity pulls toward `rows - 1`.
//!
//! Every accessor is bounds-checked: out-of-bounds reads return [`Cell::EMPTY`] and writes
//! are ignored, so neighbourhood scans never need their own edge handling.
//!
//! # Legal moves
//!
//! A swap of two horizontally or vertically adjacent swappable cells is legal when either
//! moved cell ends up in a same-color line of three or more. The line test here looks in
//! four directions (horizontal, vertical and both diagonals); the match detector itself
//! only scores horizontal and vertical runs.

use std::sync::Arc;

use arrayvec::ArrayVec;
use tracing::{trace, warn};

use crate::rng::SimpleRng;
use crate::snapshot::BoardSnapshot;
use crate::types::{
    Cell, Color, MatchRules, Obstacle, ObstacleDef, ObstacleRegistry, Piece, PieceId, Position,
    SpecialKind, DEFAULT_COLS, DEFAULT_ROWS, FILL_MAX_ATTEMPTS, MAX_BOARD_DIM,
};

/// Line directions checked by fill and legal-move queries: horizontal, vertical, `\`, `/`
const LINE_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Shuffles tried before falling back to a full refill
const RESHUFFLE_ATTEMPTS: u32 = 10;

/// Refills tried by the reshuffle fallback before accepting the board as-is
const REFILL_ATTEMPTS: u32 = 10;

/// Shortest line fill and reshuffle refuse to leave standing
fn fill_line_len(rules: &MatchRules) -> usize {
    rules.min_run.min(3) as usize
}

/// A piece moved by gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fall {
    pub id: PieceId,
    pub from: Position,
    pub to: Position,
}

/// The game board
#[derive(Debug, Clone)]
pub struct Board {
    rows: u8,
    cols: u8,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<Cell>,
    registry: Arc<ObstacleRegistry>,
    next_piece_id: u32,
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.cells == other.cells
    }
}

impl Board {
    /// Create an empty board
    ///
    /// Dimensions are clamped to `1..=MAX_BOARD_DIM`.
    pub fn new(rows: u8, cols: u8, registry: Arc<ObstacleRegistry>) -> Self {
        let rows = rows.clamp(1, MAX_BOARD_DIM);
        let cols = cols.clamp(1, MAX_BOARD_DIM);
        Self {
            rows,
            cols,
            cells: vec![Cell::EMPTY; rows as usize * cols as usize],
            registry,
            next_piece_id: 1,
        }
    }

    /// Empty 9x9 board with the standard obstacle registry
    pub fn standard() -> Self {
        Self::new(
            DEFAULT_ROWS,
            DEFAULT_COLS,
            Arc::new(ObstacleRegistry::standard()),
        )
    }

    /// Build a board from whitespace-separated cell tokens, one string per row
    ///
    /// | Token | Cell |
    /// |-------|------|
    /// | `.` | empty |
    /// | `R` `B` `G` `Y` `P` `O` | plain piece |
    /// | `R-` `R\|` `R*` `R@` | row clear, column clear, area bomb, rainbow |
    /// | `#` | stone |
    /// | `~` / `~R` | ice, empty or hosting a piece |
    ///
    /// Returns `None` for ragged rows, unknown tokens, obstacles missing from the
    /// registry, or more than [`MAX_BOARD_DIM`] rows or columns.
    pub fn from_rows(rows: &[&str], registry: Arc<ObstacleRegistry>) -> Option<Self> {
        let tokens: Vec<Vec<&str>> = rows
            .iter()
            .map(|line| line.split_whitespace().collect())
            .collect();
        let cols = tokens.first()?.len();
        if cols == 0 || tokens.iter().any(|row| row.len() != cols) {
            return None;
        }
        let max = MAX_BOARD_DIM as usize;
        if tokens.len() > max || cols > max {
            return None;
        }
        let mut board = Self::new(tokens.len() as u8, cols as u8, registry);
        for (r, row) in tokens.iter().enumerate() {
            for (c, token) in row.iter().enumerate() {
                let cell = board.parse_token(token)?;
                board.set(Position::new(r as i8, c as i8), cell);
            }
        }
        Some(board)
    }

    fn parse_token(&mut self, token: &str) -> Option<Cell> {
        match token {
            "." => return Some(Cell::EMPTY),
            "#" => return self.obstacle_cell("stone"),
            _ => {}
        }
        if let Some(rest) = token.strip_prefix('~') {
            let mut cell = self.obstacle_cell("ice")?;
            if !rest.is_empty() {
                cell.piece = Some(self.parse_piece(rest)?);
            }
            return Some(cell);
        }
        self.parse_piece(token).map(Cell::with_piece)
    }

    fn obstacle_cell(&self, name: &str) -> Option<Cell> {
        let kind = self.registry.lookup(name)?;
        let hp = self.registry.get(kind)?.hp;
        Some(Cell::with_obstacle(Obstacle::new(kind, hp)))
    }

    fn parse_piece(&mut self, token: &str) -> Option<Piece> {
        let mut chars = token.chars();
        let glyph = chars.next()?;
        let color = Color::ALL.into_iter().find(|c| c.glyph() == glyph)?;
        let special = match chars.next() {
            None => SpecialKind::None,
            Some('-') => SpecialKind::RowClear,
            Some('|') => SpecialKind::ColumnClear,
            Some('*') => SpecialKind::AreaBomb,
            Some('@') => SpecialKind::Rainbow,
            Some(_) => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(self.spawn_piece(color, special))
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if self.is_out_of_bounds(pos) {
            return None;
        }
        Some(pos.row as usize * self.cols as usize + pos.col as usize)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn registry(&self) -> &Arc<ObstacleRegistry> {
        &self.registry
    }

    pub fn is_out_of_bounds(&self, pos: Position) -> bool {
        pos.row < 0 || pos.col < 0 || pos.row as u8 >= self.rows || pos.col as u8 >= self.cols
    }

    /// Get cell at position; empty if out of bounds
    pub fn get(&self, pos: Position) -> Cell {
        self.index(pos)
            .map(|idx| self.cells[idx])
            .unwrap_or(Cell::EMPTY)
    }

    /// Set cell at position
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn piece(&self, pos: Position) -> Option<Piece> {
        self.get(pos).piece
    }

    /// Replace the piece of a cell, keeping its obstacle
    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx].piece = piece;
                true
            }
            None => false,
        }
    }

    /// Replace the obstacle of a cell, keeping its piece
    pub fn set_obstacle(&mut self, pos: Position, obstacle: Option<Obstacle>) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx].obstacle = obstacle;
                true
            }
            None => false,
        }
    }

    /// Definition of the obstacle at `pos`, if any
    pub fn obstacle_def(&self, pos: Position) -> Option<&ObstacleDef> {
        let obstacle = self.get(pos).obstacle?;
        self.registry.get(obstacle.kind)
    }

    /// Allocate a fresh piece identity
    pub fn spawn_piece(&mut self, color: Color, special: SpecialKind) -> Piece {
        let id = PieceId(self.next_piece_id);
        self.next_piece_id = self.next_piece_id.wrapping_add(1);
        Piece::special(id, color, special)
    }

    /// Exchange two cells; out-of-bounds positions are ignored
    pub fn swap(&mut self, a: Position, b: Position) {
        if let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) {
            self.cells.swap(ia, ib);
        }
    }

    /// Piece present, and no obstacle or a swappable one
    pub fn is_swappable(&self, pos: Position) -> bool {
        let cell = self.get(pos);
        if cell.piece.is_none() {
            return false;
        }
        match cell.obstacle {
            None => true,
            Some(obstacle) => self
                .registry
                .get(obstacle.kind)
                .map(|def| def.swappable)
                .unwrap_or(false),
        }
    }

    pub fn is_adjacent(&self, a: Position, b: Position) -> bool {
        a.is_adjacent(b)
    }

    /// Color of the piece at `pos` if it can take part in a run
    ///
    /// A hosted piece under a non-matchable obstacle has no matchable color.
    pub fn matchable_color(&self, pos: Position) -> Option<Color> {
        let cell = self.get(pos);
        let color = cell.color()?;
        if let Some(obstacle) = cell.obstacle {
            if let Some(def) = self.registry.get(obstacle.kind) {
                if !def.matchable {
                    return None;
                }
            }
        }
        Some(color)
    }

    /// Place an obstacle, replacing whatever occupied the cell
    ///
    /// Unknown kinds and zero hp are ignored.
    pub fn place_obstacle(&mut self, pos: Position, obstacle: Obstacle) -> bool {
        if obstacle.hp == 0 || self.registry.get(obstacle.kind).is_none() {
            return false;
        }
        self.set(pos, Cell::with_obstacle(obstacle))
    }

    /// All positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows as i8).flat_map(move |r| (0..cols as i8).map(move |c| Position::new(r, c)))
    }

    /// Number of consecutive cells through `pos` along `(dr, dc)` whose color (under
    /// `color_at`) equals `color`, counting `pos` itself
    fn line_len(
        &self,
        pos: Position,
        color: Color,
        (dr, dc): (i8, i8),
        color_at: &impl Fn(Position) -> Option<Color>,
    ) -> usize {
        let mut count = 1;
        for sign in [1i8, -1] {
            let mut p = pos.offset(dr * sign, dc * sign);
            while !self.is_out_of_bounds(p) && color_at(p) == Some(color) {
                count += 1;
                p = p.offset(dr * sign, dc * sign);
            }
        }
        count
    }

    fn completes_line(
        &self,
        pos: Position,
        color: Color,
        len: usize,
        color_at: &impl Fn(Position) -> Option<Color>,
    ) -> bool {
        LINE_DIRECTIONS
            .iter()
            .any(|dir| self.line_len(pos, color, *dir, color_at) >= len)
    }

    /// Would placing `color` at `pos` complete a line of three?
    pub fn would_match(&self, pos: Position, color: Color) -> bool {
        self.completes_line(pos, color, 3, &|p| self.matchable_color(p))
    }

    /// Is the piece at `pos` part of a line of three in any direction?
    pub fn has_match_at(&self, pos: Position) -> bool {
        match self.matchable_color(pos) {
            Some(color) => self.completes_line(pos, color, 3, &|p| self.matchable_color(p)),
            None => false,
        }
    }

    /// Would swapping `a` and `b` put either of them in a line of `len`?
    fn swap_creates_line(&self, a: Position, b: Position, len: usize) -> bool {
        let color_at = |p: Position| {
            let src = if p == a {
                b
            } else if p == b {
                a
            } else {
                p
            };
            self.matchable_color(src)
        };
        [a, b].into_iter().any(|pos| match color_at(pos) {
            Some(color) => self.completes_line(pos, color, len, &color_at),
            None => false,
        })
    }

    /// Would swapping `a` and `b` leave either in a horizontal or vertical run of `len`
    /// plain pieces, the way the match detector sees it?
    fn swap_creates_run(&self, a: Position, b: Position, len: usize) -> bool {
        let color_at = |p: Position| {
            let src = if p == a {
                b
            } else if p == b {
                a
            } else {
                p
            };
            if self.get(src).special().is_special() {
                return None;
            }
            self.matchable_color(src)
        };
        [a, b].into_iter().any(|pos| match color_at(pos) {
            Some(color) => [(0, 1), (1, 0)]
                .iter()
                .any(|dir| self.line_len(pos, color, *dir, &color_at) >= len),
            None => false,
        })
    }

    /// Fill every piece-less cell with a random palette color, avoiding lines
    ///
    /// Lines of three are avoided, or of `rules.min_run` when that is shorter. Obstacle
    /// cells that do not host a piece are skipped. Each cell retries up to
    /// [`FILL_MAX_ATTEMPTS`] colors and accepts the last one if all of them complete a
    /// line. Returns the number of cells filled.
    pub fn fill(&mut self, colors: &[Color], rules: &MatchRules, rng: &mut SimpleRng) -> usize {
        if colors.is_empty() {
            return 0;
        }
        let len = fill_line_len(rules);
        let completes = |board: &Self, pos: Position, color: Color| {
            board.completes_line(pos, color, len, &|p| board.matchable_color(p))
        };
        let mut filled = 0;
        let mut exhausted = 0;
        let positions: Vec<Position> = self.positions().collect();
        for pos in positions {
            let cell = self.get(pos);
            if cell.piece.is_some() {
                continue;
            }
            if let Some(obstacle) = cell.obstacle {
                if let Some(def) = self.registry.get(obstacle.kind) {
                    if !def.contains_piece {
                        continue;
                    }
                }
            }

            let mut color = colors[0];
            let mut attempts = 0;
            loop {
                if let Some(c) = rng.pick(colors) {
                    color = c;
                }
                attempts += 1;
                if attempts >= FILL_MAX_ATTEMPTS || !completes(self, pos, color) {
                    break;
                }
            }
            if attempts >= FILL_MAX_ATTEMPTS && completes(self, pos, color) {
                exhausted += 1;
            }

            let piece = self.spawn_piece(color, SpecialKind::None);
            self.set_piece(pos, Some(piece));
            filled += 1;
        }
        if exhausted > 0 {
            warn!(exhausted, "fill accepted placements that complete a line");
        }
        trace!(filled, "board filled");
        filled
    }

    /// Is there at least one legal swap under `rules`?
    pub fn has_legal_move(&self, rules: &MatchRules) -> bool {
        self.find_legal_move(rules).is_some()
    }

    /// First legal swap in row-major order, trying right then down
    ///
    /// A swap is legal when it puts either piece in a line of `rules.min_run`, diagonals
    /// included.
    pub fn find_legal_move(&self, rules: &MatchRules) -> Option<(Position, Position)> {
        let len = rules.min_run as usize;
        for pos in self.positions() {
            if !self.is_swappable(pos) {
                continue;
            }
            let candidates: ArrayVec<Position, 2> = [pos.offset(0, 1), pos.offset(1, 0)]
                .into_iter()
                .filter(|n| self.is_swappable(*n))
                .collect();
            for other in candidates {
                if self.swap_creates_line(pos, other, len) {
                    return Some((pos, other));
                }
            }
        }
        None
    }

    /// First swap the cascade would actually resolve, trying right then down
    ///
    /// Counts swaps that form a horizontal or vertical run of `rules.min_run` and any swap
    /// that moves a special. Diagonal-only lines do not count.
    pub fn find_scoring_move(&self, rules: &MatchRules) -> Option<(Position, Position)> {
        let len = rules.min_run as usize;
        for pos in self.positions() {
            if !self.is_swappable(pos) {
                continue;
            }
            for other in [pos.offset(0, 1), pos.offset(1, 0)] {
                if !self.is_swappable(other) {
                    continue;
                }
                let special =
                    self.get(pos).special().is_special() || self.get(other).special().is_special();
                if special || self.swap_creates_run(pos, other, len) {
                    return Some((pos, other));
                }
            }
        }
        None
    }

    /// Does a horizontal or vertical run of three already sit on the board?
    pub fn has_free_run(&self) -> bool {
        self.has_run_of(3)
    }

    fn has_run_of(&self, len: usize) -> bool {
        self.positions().any(|pos| match self.matchable_color(pos) {
            Some(color) => [(0, 1), (1, 0)].iter().any(|dir| {
                self.line_len(pos, color, *dir, &|p| self.matchable_color(p)) >= len
            }),
            None => false,
        })
    }

    /// Shuffle pieces among non-obstacle cells until a legal move exists
    ///
    /// Obstacle cells (and the pieces they host) stay in place. Pieces are written back
    /// row-major over the non-obstacle positions, so any empty cells end up last. If no
    /// arrangement yields a legal move without a standing run, every non-obstacle cell
    /// is cleared and refilled. Returns true when that refill fallback was used.
    pub fn reshuffle(
        &mut self,
        colors: &[Color],
        rules: &MatchRules,
        rng: &mut SimpleRng,
    ) -> bool {
        let run_len = fill_line_len(rules);
        let slots: Vec<Position> = self
            .positions()
            .filter(|p| self.get(*p).obstacle.is_none())
            .collect();
        let mut pieces: Vec<Piece> = slots.iter().filter_map(|p| self.piece(*p)).collect();

        for attempt in 1..=RESHUFFLE_ATTEMPTS {
            rng.shuffle(&mut pieces);
            for (i, pos) in slots.iter().enumerate() {
                self.set(*pos, pieces.get(i).copied().map(Cell::with_piece).unwrap_or_default());
            }
            if self.has_legal_move(rules) && !self.has_run_of(run_len) {
                trace!(attempt, "reshuffle found a playable arrangement");
                return false;
            }
        }

        warn!("reshuffle fell back to a full refill");
        for attempt in 1..=REFILL_ATTEMPTS {
            for pos in &slots {
                self.set(*pos, Cell::EMPTY);
            }
            self.fill(colors, rules, rng);
            if self.has_legal_move(rules) {
                trace!(attempt, "refill produced a legal move");
                break;
            }
        }
        true
    }

    /// Compact every column downward
    ///
    /// Immovable obstacles keep their cell and the write cursor restarts above them.
    /// Everything else, including movable obstacles with their hosted piece, falls as a
    /// unit. Returns the piece moves, bottom-up per column, columns left to right.
    pub fn apply_gravity(&mut self) -> Vec<Fall> {
        let mut falls = Vec::new();
        for c in 0..self.cols as i8 {
            let mut write = self.rows as i8 - 1;
            for r in (0..self.rows as i8).rev() {
                let from = Position::new(r, c);
                let cell = self.get(from);
                if cell.is_empty() {
                    continue;
                }
                if self.obstacle_def(from).map(|d| d.immovable).unwrap_or(false) {
                    write = r - 1;
                    continue;
                }
                if r != write {
                    let to = Position::new(write, c);
                    self.set(to, cell);
                    self.set(from, Cell::EMPTY);
                    if let Some(piece) = cell.piece {
                        falls.push(Fall {
                            id: piece.id,
                            from,
                            to,
                        });
                    }
                }
                write -= 1;
            }
        }
        falls
    }

    /// Empty cells of a column, top to bottom
    pub fn empty_in_column(&self, col: i8) -> Vec<Position> {
        (0..self.rows as i8)
            .map(|r| Position::new(r, col))
            .filter(|p| self.get(*p).is_empty())
            .collect()
    }

    /// Colors currently in a column, top to bottom (`None` for piece-less cells)
    pub fn column_colors(&self, col: i8) -> Vec<Option<Color>> {
        (0..self.rows as i8)
            .map(|r| self.get(Position::new(r, col)).color())
            .collect()
    }

    /// Distinct colors of pieces on the board, in palette order
    pub fn colors_present(&self) -> Vec<Color> {
        let mut present = [false; 6];
        for cell in &self.cells {
            if let Some(color) = cell.color() {
                present[color as usize] = true;
            }
        }
        Color::ALL
            .into_iter()
            .filter(|c| present[*c as usize])
            .collect()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from(self)
    }

    /// Cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Render with the same tokens [`Board::from_rows`] accepts
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for r in 0..self.rows as i8 {
            let row: Vec<String> = (0..self.cols as i8)
                .map(|c| self.token(Position::new(r, c)))
                .collect();
            out.push_str(&row.join(" "));
            out.push('\n');
        }
        out
    }

    fn token(&self, pos: Position) -> String {
        let cell = self.get(pos);
        let mut token = String::new();
        if let Some(def) = self.obstacle_def(pos) {
            token.push(if def.contains_piece { '~' } else { '#' });
        }
        if let Some(piece) = cell.piece {
            token.push(piece.color.glyph());
            match piece.special {
                SpecialKind::None => {}
                SpecialKind::RowClear => token.push('-'),
                SpecialKind::ColumnClear => token.push('|'),
                SpecialKind::AreaBomb => token.push('*'),
                SpecialKind::Rainbow => token.push('@'),
            }
        }
        if token.is_empty() {
            token.push('.');
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: MatchRules = MatchRules {
        min_run: 3,
        line_special_len: 4,
        rainbow_len: 5,
    };

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows, Arc::new(ObstacleRegistry::standard())).unwrap()
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut b = Board::standard();
        assert_eq!(b.get(Position::new(-1, 0)), Cell::EMPTY);
        assert_eq!(b.get(Position::new(0, 9)), Cell::EMPTY);
        let piece = b.spawn_piece(Color::Red, SpecialKind::None);
        assert!(!b.set(Position::new(9, 0), Cell::with_piece(piece)));
        assert!(b.set(Position::new(8, 8), Cell::with_piece(piece)));
        assert_eq!(b.piece(Position::new(8, 8)), Some(piece));
    }

    #[test]
    fn test_parse_and_render() {
        let rows = ["R B- #", "~G . Y@"];
        let b = board(&rows);
        assert_eq!(b.rows(), 2);
        assert_eq!(b.cols(), 3);
        assert_eq!(b.get(Position::new(0, 1)).special(), SpecialKind::RowClear);
        assert!(b.get(Position::new(0, 2)).has_obstacle());
        assert!(!b.get(Position::new(0, 2)).has_piece());
        assert_eq!(b.get(Position::new(1, 0)).color(), Some(Color::Green));
        assert_eq!(b.to_text(), "R B- #\n~G . Y@\n");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let registry = Arc::new(ObstacleRegistry::standard());
        assert!(Board::from_rows(&["R B", "R"], registry.clone()).is_none());
        assert!(Board::from_rows(&["R X"], registry.clone()).is_none());
        assert!(Board::from_rows(&["#"], Arc::new(ObstacleRegistry::new())).is_none());
    }

    #[test]
    fn test_piece_ids_are_unique() {
        let b = board(&["R R B", "G G B"]);
        let mut ids: Vec<PieceId> = b.cells().iter().filter_map(|c| c.piece).map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_place_obstacle_replaces_piece() {
        let mut b = board(&["R B G"]);
        let stone = b.registry().lookup("stone").unwrap();
        assert!(b.place_obstacle(Position::new(0, 1), Obstacle::new(stone, 3)));
        let cell = b.get(Position::new(0, 1));
        assert_eq!(cell.obstacle, Some(Obstacle::new(stone, 3)));
        assert!(cell.piece.is_none());

        assert!(!b.place_obstacle(Position::new(0, 0), Obstacle::new(stone, 0)));
        assert!(b.get(Position::new(0, 0)).has_piece());
    }

    #[test]
    fn test_swappable_rules() {
        let b = board(&["R # ~G ."]);
        assert!(b.is_swappable(Position::new(0, 0)));
        assert!(!b.is_swappable(Position::new(0, 1)));
        assert!(!b.is_swappable(Position::new(0, 2)));
        assert!(!b.is_swappable(Position::new(0, 3)));
        assert!(!b.is_swappable(Position::new(0, 4)));
    }

    #[test]
    fn test_ice_is_not_matchable() {
        let b = board(&["R R ~R"]);
        assert_eq!(b.matchable_color(Position::new(0, 2)), None);
        assert!(!b.has_match_at(Position::new(0, 0)));
    }

    #[test]
    fn test_swap_exchanges_whole_cells() {
        let mut b = board(&["R B"]);
        let left = b.get(Position::new(0, 0));
        let right = b.get(Position::new(0, 1));
        b.swap(Position::new(0, 0), Position::new(0, 1));
        assert_eq!(b.get(Position::new(0, 0)), right);
        assert_eq!(b.get(Position::new(0, 1)), left);

        // out of bounds is a no-op
        b.swap(Position::new(0, 0), Position::new(0, 5));
        assert_eq!(b.get(Position::new(0, 0)), right);
    }

    #[test]
    fn test_fill_leaves_no_runs() {
        let mut b = Board::standard();
        let mut rng = SimpleRng::new(2024);
        let palette = [
            Color::Red,
            Color::Blue,
            Color::Green,
            Color::Yellow,
            Color::Purple,
        ];
        let filled = b.fill(&palette, &RULES, &mut rng);
        assert_eq!(filled, 81);
        assert!(!b.has_free_run());
        assert!(b.positions().all(|p| b.get(p).has_piece()));
    }

    #[test]
    fn test_fill_skips_stone_and_fills_ice() {
        let mut b = board(&[". # .", "~ . ."]);
        let mut rng = SimpleRng::new(5);
        assert_eq!(b.fill(&[Color::Red, Color::Blue], &RULES, &mut rng), 5);
        assert!(!b.get(Position::new(0, 1)).has_piece());
        let ice = b.get(Position::new(1, 0));
        assert!(ice.has_piece() && ice.has_obstacle());
    }

    #[test]
    fn test_fill_single_color_is_best_effort() {
        let mut b = Board::new(1, 4, Arc::new(ObstacleRegistry::new()));
        let mut rng = SimpleRng::new(1);
        assert_eq!(b.fill(&[Color::Red], &RULES, &mut rng), 4);
        assert!(b.has_free_run());
    }

    #[test]
    fn test_find_legal_move() {
        // swapping (0,2) and (1,2) lines up three reds on row 0
        let b = board(&["R R B", "G B R"]);
        assert_eq!(
            b.find_legal_move(&RULES),
            Some((Position::new(0, 2), Position::new(1, 2)))
        );
        assert!(b.has_legal_move(&RULES));
    }

    #[test]
    fn test_legal_move_counts_diagonals() {
        // swapping (2,2) and (2,1) completes the diagonal R at (0,0), (1,1), (2,2)
        let b = board(&["R B G", "G R B", "B R G"]);
        assert!(b.has_legal_move(&RULES));
    }

    #[test]
    fn test_legal_move_follows_min_run() {
        // row 2 becomes R R R R after swapping (1,2) and (2,2)
        let b = board(&["R B G Y B", "G Y R B G", "R R B R Y", "B G Y G B", "Y B G Y R"]);
        let four = MatchRules {
            min_run: 4,
            line_special_len: 5,
            rainbow_len: 6,
        };
        let swap = Some((Position::new(1, 2), Position::new(2, 2)));
        assert_eq!(b.find_legal_move(&four), swap);
        assert_eq!(b.find_scoring_move(&four), swap);

        // only lines of three are on offer here
        let b = board(&["P R B P Y", "P R R P B", "G B B G B", "P B G G P", "G Y B P G"]);
        assert!(b.has_legal_move(&RULES));
        assert!(b.find_scoring_move(&RULES).is_some());
        assert!(!b.has_legal_move(&four));
        assert_eq!(b.find_scoring_move(&four), None);
    }

    #[test]
    fn test_fill_avoids_pairs_when_min_run_is_two() {
        let pairs = MatchRules {
            min_run: 2,
            line_special_len: 3,
            rainbow_len: 4,
        };
        let mut b = Board::new(4, 4, Arc::new(ObstacleRegistry::new()));
        let mut rng = SimpleRng::new(9);
        b.fill(&Color::ALL, &pairs, &mut rng);
        assert!(!b.has_run_of(2));
    }

    #[test]
    fn test_dimensions_are_capped() {
        let b = Board::new(200, 0, Arc::new(ObstacleRegistry::new()));
        assert_eq!((b.rows(), b.cols()), (MAX_BOARD_DIM, 1));
        assert!(b.positions().all(|p| !b.is_out_of_bounds(p)));

        let wide = vec!["R"; MAX_BOARD_DIM as usize + 1].join(" ");
        assert!(Board::from_rows(&[wide.as_str()], Arc::new(ObstacleRegistry::standard())).is_none());
    }

    #[test]
    fn test_no_legal_move() {
        let b = board(&["R B", "G Y"]);
        assert!(!b.has_legal_move(&RULES));
        assert_eq!(b.find_legal_move(&RULES), None);
    }

    #[test]
    fn test_gravity_respects_stone() {
        let mut b = board(&["R", "#", ".", "B", "."]);
        let red = b.piece(Position::new(0, 0)).unwrap();
        let falls = b.apply_gravity();

        assert!(b.get(Position::new(1, 0)).has_obstacle());
        assert_eq!(b.piece(Position::new(4, 0)).map(|p| p.color), Some(Color::Blue));
        // red is blocked by the stone
        assert_eq!(b.piece(Position::new(0, 0)), Some(red));
        assert_eq!(falls.len(), 1);
        assert_eq!(falls[0].from, Position::new(3, 0));
        assert_eq!(falls[0].to, Position::new(4, 0));
    }

    #[test]
    fn test_gravity_carries_ice() {
        let mut b = board(&["~G", "."]);
        b.apply_gravity();
        let bottom = b.get(Position::new(1, 0));
        assert!(bottom.has_obstacle());
        assert_eq!(bottom.color(), Some(Color::Green));
        assert!(b.get(Position::new(0, 0)).is_empty());
    }

    #[test]
    fn test_reshuffle_keeps_obstacles_and_pieces() {
        let mut b = board(&[
            "R B G Y R B",
            "B # Y R ~G Y",
            "G Y R B G R",
            "Y R B G Y B",
        ]);
        let before_obstacles: Vec<Position> =
            b.positions().filter(|p| b.get(*p).has_obstacle()).collect();
        let ice_piece = b.piece(Position::new(1, 4));
        let mut rng = SimpleRng::new(77);
        let palette = [Color::Red, Color::Blue, Color::Green, Color::Yellow];
        let refilled = b.reshuffle(&palette, &RULES, &mut rng);

        let after_obstacles: Vec<Position> =
            b.positions().filter(|p| b.get(*p).has_obstacle()).collect();
        assert_eq!(before_obstacles, after_obstacles);
        assert_eq!(b.piece(Position::new(1, 4)), ice_piece);
        assert!(b.has_legal_move(&RULES) || refilled);
    }

    #[test]
    fn test_colors_present() {
        let b = board(&["R . G", "# R ."]);
        assert_eq!(b.colors_present(), vec![Color::Red, Color::Green]);
    }

    #[test]
    fn test_scoring_move_ignores_diagonals() {
        let b = board(&["R B G Y", "Y R P G", "G Y B R"]);
        assert_eq!(
            b.find_legal_move(&RULES),
            Some((Position::new(2, 2), Position::new(2, 3)))
        );
        assert_eq!(b.find_scoring_move(&RULES), None);

        let b = board(&["R B G Y", "Y R- P G", "G Y B R"]);
        assert_eq!(
            b.find_scoring_move(&RULES),
            Some((Position::new(0, 1), Position::new(1, 1)))
        );
    }
}
