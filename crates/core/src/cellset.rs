//! Ordered set of board positions
//!
//! Insertion order is preserved (clear animations and waves are reported in discovery
//! order) while membership is a flat mask lookup sized to the board.

use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSet {
    rows: u8,
    cols: u8,
    mask: Vec<bool>,
    order: Vec<Position>,
}

impl CellSet {
    pub fn new(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            mask: vec![false; rows as usize * cols as usize],
            order: Vec::new(),
        }
    }

    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 || pos.row as u8 >= self.rows || pos.col as u8 >= self.cols {
            return None;
        }
        Some(pos.row as usize * self.cols as usize + pos.col as usize)
    }

    /// Add a position; false if already present or outside the board
    pub fn insert(&mut self, pos: Position) -> bool {
        match self.index(pos) {
            Some(idx) if !self.mask[idx] => {
                self.mask[idx] = true;
                self.order.push(pos);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).map(|idx| self.mask[idx]).unwrap_or(false)
    }

    pub fn remove(&mut self, pos: Position) -> bool {
        match self.index(pos) {
            Some(idx) if self.mask[idx] => {
                self.mask[idx] = false;
                self.order.retain(|p| *p != pos);
                true
            }
            _ => false,
        }
    }

    pub fn extend<I: IntoIterator<Item = Position>>(&mut self, positions: I) {
        for pos in positions {
            self.insert(pos);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Positions in insertion order
    pub fn positions(&self) -> &[Position] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.order.iter().copied()
    }

    pub fn clear(&mut self) {
        for pos in std::mem::take(&mut self.order) {
            if let Some(idx) = self.index(pos) {
                self.mask[idx] = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order_and_rejects_duplicates() {
        let mut set = CellSet::new(3, 3);
        assert!(set.insert(Position::new(2, 2)));
        assert!(set.insert(Position::new(0, 1)));
        assert!(!set.insert(Position::new(2, 2)));

        assert_eq!(set.positions(), &[Position::new(2, 2), Position::new(0, 1)]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn out_of_bounds_is_never_a_member() {
        let mut set = CellSet::new(3, 3);
        assert!(!set.insert(Position::new(-1, 0)));
        assert!(!set.insert(Position::new(0, 3)));
        assert!(!set.contains(Position::new(3, 0)));
        assert!(set.is_empty());
    }

    #[test]
    fn remove_and_clear() {
        let mut set = CellSet::new(4, 4);
        set.extend([Position::new(0, 0), Position::new(1, 1), Position::new(2, 2)]);
        assert!(set.remove(Position::new(1, 1)));
        assert!(!set.contains(Position::new(1, 1)));
        assert_eq!(set.len(), 2);

        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(Position::new(0, 0)));
        assert!(set.insert(Position::new(0, 0)));
    }
}
