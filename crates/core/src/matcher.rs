//! Match detector - finds scoring runs and decides which special each one creates
//!
//! # Algorithm
//!
//! 1. Scan every row, then every column, for maximal runs of one color. Only plain
//!    pieces take part: specials, empty cells and pieces under a non-matchable obstacle
//!    break a run.
//! 2. Keep runs of at least [`MatchRules::min_run`].
//! 3. Merge runs of the same color that share a cell (union-find), so an L, T or cross is
//!    one group and each piece is scored once.
//! 4. Classify each group:
//!
//! | Group | Special | Placed at |
//! |-------|---------|-----------|
//! | single run, `min_run..line_special_len` | none | - |
//! | single run, `line_special_len..rainbow_len` | row clear (horizontal) / column clear (vertical) | swapped-in cell if in the run, else the middle |
//! | single run, `>= rainbow_len` | rainbow | same as above |
//! | merged runs, one of them `>= rainbow_len` | rainbow | first intersection |
//! | merged runs | area bomb | first intersection |
//!
//! Groups are reported in scan order (the group containing the earliest run first).

use crate::board::Board;
use crate::types::{Color, MatchRules, MatchShape, Position, SpecialKind};

/// The swap that led to this scan; the special is placed on a swapped-in cell when it
/// lies in the run (`to` first, then `from`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapHint {
    pub from: Position,
    pub to: Position,
}

/// One merged match group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Distinct cells of the group in discovery order
    pub positions: Vec<Position>,
    pub color: Color,
    pub special_to_create: SpecialKind,
    /// Cell that receives the new special; `None` when no special is created
    pub special_pos: Option<Position>,
    pub shape: MatchShape,
}

impl Match {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone)]
struct Run {
    positions: Vec<Position>,
    color: Color,
    axis: Axis,
}

impl Run {
    fn is_end(&self, pos: Position) -> bool {
        self.positions.first() == Some(&pos) || self.positions.last() == Some(&pos)
    }
}

/// Detect with the default 3/4/5 thresholds and no swap hint
pub fn detect(board: &Board) -> Vec<Match> {
    detect_with(board, &MatchRules::default(), None)
}

/// Detect matches on the board
pub fn detect_with(board: &Board, rules: &MatchRules, swap: Option<SwapHint>) -> Vec<Match> {
    let runs = find_runs(board, rules.min_run as usize);
    if runs.is_empty() {
        return Vec::new();
    }

    let mut parent: Vec<usize> = (0..runs.len()).collect();
    for i in 0..runs.len() {
        for j in (i + 1)..runs.len() {
            if runs[i].color == runs[j].color && intersection(&runs[i], &runs[j]).is_some() {
                union(&mut parent, i, j);
            }
        }
    }

    // Groups ordered by their first run
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of_root: Vec<Option<usize>> = vec![None; runs.len()];
    for i in 0..runs.len() {
        let root = find(&mut parent, i);
        match group_of_root[root] {
            Some(g) => groups[g].push(i),
            None => {
                group_of_root[root] = Some(groups.len());
                groups.push(vec![i]);
            }
        }
    }

    groups
        .iter()
        .map(|members| {
            let group: Vec<&Run> = members.iter().map(|&i| &runs[i]).collect();
            classify(&group, rules, swap)
        })
        .collect()
}

fn find_runs(board: &Board, min_run: usize) -> Vec<Run> {
    let mut runs = Vec::new();
    let rows = board.rows() as i8;
    let cols = board.cols() as i8;
    for r in 0..rows {
        scan_line(
            board,
            (0..cols).map(|c| Position::new(r, c)),
            Axis::Horizontal,
            min_run,
            &mut runs,
        );
    }
    for c in 0..cols {
        scan_line(
            board,
            (0..rows).map(|r| Position::new(r, c)),
            Axis::Vertical,
            min_run,
            &mut runs,
        );
    }
    runs
}

/// Color a cell contributes to runs: plain pieces only
fn run_color(board: &Board, pos: Position) -> Option<Color> {
    if board.get(pos).special().is_special() {
        return None;
    }
    board.matchable_color(pos)
}

fn scan_line(
    board: &Board,
    line: impl Iterator<Item = Position>,
    axis: Axis,
    min_run: usize,
    runs: &mut Vec<Run>,
) {
    let mut current: Vec<Position> = Vec::new();
    let mut current_color: Option<Color> = None;
    for pos in line {
        let color = run_color(board, pos);
        if color.is_some() && color == current_color {
            current.push(pos);
            continue;
        }
        flush(&mut current, current_color, axis, min_run, runs);
        current_color = color;
        if color.is_some() {
            current.push(pos);
        }
    }
    flush(&mut current, current_color, axis, min_run, runs);
}

fn flush(
    current: &mut Vec<Position>,
    color: Option<Color>,
    axis: Axis,
    min_run: usize,
    runs: &mut Vec<Run>,
) {
    let positions = std::mem::take(current);
    if let Some(color) = color {
        if positions.len() >= min_run {
            runs.push(Run {
                positions,
                color,
                axis,
            });
        }
    }
}

fn find(parent: &mut [usize], i: usize) -> usize {
    let mut root = i;
    while parent[root] != root {
        root = parent[root];
    }
    // path compression
    let mut node = i;
    while parent[node] != root {
        let next = parent[node];
        parent[node] = root;
        node = next;
    }
    root
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        // lower index stays root so groups keep scan order
        let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[merge] = keep;
    }
}

fn intersection(a: &Run, b: &Run) -> Option<Position> {
    a.positions.iter().copied().find(|p| b.positions.contains(p))
}

fn classify(group: &[&Run], rules: &MatchRules, swap: Option<SwapHint>) -> Match {
    let color = group[0].color;
    let mut positions: Vec<Position> = Vec::new();
    for run in group {
        for &pos in &run.positions {
            if !positions.contains(&pos) {
                positions.push(pos);
            }
        }
    }

    if let [run] = group {
        let len = run.positions.len();
        let special = if len >= rules.rainbow_len as usize {
            SpecialKind::Rainbow
        } else if len >= rules.line_special_len as usize {
            match run.axis {
                Axis::Horizontal => SpecialKind::RowClear,
                Axis::Vertical => SpecialKind::ColumnClear,
            }
        } else {
            SpecialKind::None
        };
        let special_pos = special
            .is_special()
            .then(|| straight_special_pos(&run.positions, swap));
        return Match {
            positions,
            color,
            special_to_create: special,
            special_pos,
            shape: MatchShape::Line,
        };
    }

    let special = if group
        .iter()
        .any(|run| run.positions.len() >= rules.rainbow_len as usize)
    {
        SpecialKind::Rainbow
    } else {
        SpecialKind::AreaBomb
    };

    let mut crossing = None;
    'outer: for (i, a) in group.iter().enumerate() {
        for b in &group[i + 1..] {
            if let Some(p) = intersection(a, b) {
                crossing = Some((p, a, b));
                break 'outer;
            }
        }
    }

    let shape = match crossing {
        _ if group.len() > 2 => MatchShape::Cross,
        Some((p, a, b)) => match (a.is_end(p), b.is_end(p)) {
            (true, true) => MatchShape::L,
            (true, false) | (false, true) => MatchShape::T,
            (false, false) => MatchShape::Cross,
        },
        None => MatchShape::Cross,
    };

    Match {
        special_pos: Some(crossing.map(|(p, _, _)| p).unwrap_or(positions[0])),
        positions,
        color,
        special_to_create: special,
        shape,
    }
}

fn straight_special_pos(run: &[Position], swap: Option<SwapHint>) -> Position {
    if let Some(hint) = swap {
        for candidate in [hint.to, hint.from] {
            if run.contains(&candidate) {
                return candidate;
            }
        }
    }
    run[run.len() / 2]
}
