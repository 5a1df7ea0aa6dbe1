use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::{Cell, Position};

/// Owned copy of a board's cells, for observers and assertions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub rows: u8,
    pub cols: u8,
    /// Row-major cells
    pub cells: Vec<Cell>,
}

impl BoardSnapshot {
    pub fn get(&self, pos: Position) -> Cell {
        if pos.row < 0 || pos.col < 0 || pos.row as u8 >= self.rows || pos.col as u8 >= self.cols
        {
            return Cell::EMPTY;
        }
        self.cells[pos.row as usize * self.cols as usize + pos.col as usize]
    }

    /// Positions holding an obstacle, row-major
    pub fn obstacle_positions(&self) -> Vec<Position> {
        self.positions_where(|cell| cell.has_obstacle())
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.has_piece()).count()
    }

    fn positions_where(&self, f: impl Fn(&Cell) -> bool) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| f(cell))
            .map(|(i, _)| {
                Position::new(
                    (i / self.cols as usize) as i8,
                    (i % self.cols as usize) as i8,
                )
            })
            .collect()
    }
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        Self {
            rows: board.rows(),
            cols: board.cols(),
            cells: board.cells().to_vec(),
        }
    }
}
