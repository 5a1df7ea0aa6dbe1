//! Scoring module - cascade-multiplied points for matches and special clears
//!
//! A plain match scores `len x base x multiplier`; cells cleared by a special chain or
//! combo score `count x special_points x multiplier`. The multiplier starts at 1 on every
//! player swap and grows by a fixed step each time the board settles into another
//! round of matches.

use crate::types::{BASE_MATCH_POINTS, CASCADE_MULTIPLIER_STEP, SPECIAL_ACTIVATION_POINTS};

/// Points for one matched group
pub fn match_points(len: usize, multiplier: u32) -> u32 {
    (len as u32)
        .saturating_mul(BASE_MATCH_POINTS)
        .saturating_mul(multiplier)
}

/// Points for cells cleared by special activations
pub fn special_points(cleared: usize, multiplier: u32) -> u32 {
    (cleared as u32)
        .saturating_mul(SPECIAL_ACTIVATION_POINTS)
        .saturating_mul(multiplier)
}

/// Running multiplier and cascade depth for one player move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cascade {
    pub multiplier: u32,
    pub count: u32,
}

impl Default for Cascade {
    fn default() -> Self {
        Self {
            multiplier: 1,
            count: 0,
        }
    }
}

impl Cascade {
    /// Back to multiplier 1, depth 0 (a fresh player swap)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance one cascade level; returns the new depth
    pub fn advance(&mut self) -> u32 {
        self.multiplier = self.multiplier.saturating_add(CASCADE_MULTIPLIER_STEP);
        self.count = self.count.saturating_add(1);
        self.count
    }
}
