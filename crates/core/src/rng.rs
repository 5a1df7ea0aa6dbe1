//! RNG module - deterministic randomness for fills, reshuffles and refills
//!
//! Every random decision in the engine (fill colors, reshuffle permutation, chained
//! rainbow targets, refill colors) draws from a [`SimpleRng`], so a session is fully
//! replayable from its seed.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Uniform float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Pick a uniformly random element
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let i = self.next_range(items.len() as u32) as usize;
        Some(items[i])
    }

    /// Pick an element with probability proportional to its weight
    ///
    /// Non-positive weights are never picked unless every weight is non-positive, in
    /// which case the last element is returned.
    pub fn pick_weighted<T: Copy>(&mut self, items: &[T], weights: &[f32]) -> Option<T> {
        if items.is_empty() || items.len() != weights.len() {
            return None;
        }
        let total: f32 = weights.iter().filter(|w| **w > 0.0).sum();
        let mut roll = self.next_f32() * total;
        for (item, &weight) in items.iter().zip(weights) {
            if weight <= 0.0 {
                continue;
            }
            roll -= weight;
            if roll <= 0.0 {
                return Some(*item);
            }
        }
        items.last().copied()
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Get the current RNG state (for restarting a session with the same sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
