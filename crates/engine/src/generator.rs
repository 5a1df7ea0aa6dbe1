//! Refill color selection
//!
//! Refills are weighted away from colors that recently dropped into the same column,
//! and away from colors already common in it. The penalty for common colors tightens
//! as the cascade gets deeper, which keeps long chains from snowballing.
//!
//! | Cascade depth | 2+ in column | 1 in column |
//! |---------------|--------------|-------------|
//! | 0-1 | x0.5 | - |
//! | 2-4 | x0.2 | x0.6 |
//! | 5+ | x0.05 | x0.3 |
//!
//! Each recent drop of the color multiplies by 0.6. No weight drops below 0.01.

use ball_crush_core::SimpleRng;
use ball_crush_types::Color;

/// Everything a generator may look at when choosing one refill color
#[derive(Debug, Clone, Copy)]
pub struct RefillContext<'a> {
    pub column: i8,
    pub palette: &'a [Color],
    /// Last few colors dropped into this column, oldest first
    pub recent: &'a [Color],
    pub cascade_depth: u32,
    /// Current column contents, top to bottom
    pub column_colors: &'a [Option<Color>],
}

pub trait ColorGenerator {
    /// Pick a palette color for the next refill
    fn generate(&mut self, ctx: &RefillContext<'_>) -> Color;
}

/// Weighting factors used by [`WeightedColorGenerator`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorTuning {
    pub recent_decay: f32,
    pub min_weight: f32,
    pub shallow_max_depth: u32,
    pub medium_max_depth: u32,
    /// (two or more, exactly one) factors per depth band
    pub shallow: (f32, f32),
    pub medium: (f32, f32),
    pub deep: (f32, f32),
}

impl Default for GeneratorTuning {
    fn default() -> Self {
        Self {
            recent_decay: 0.6,
            min_weight: 0.01,
            shallow_max_depth: 1,
            medium_max_depth: 4,
            shallow: (0.5, 1.0),
            medium: (0.2, 0.6),
            deep: (0.05, 0.3),
        }
    }
}

/// Seeded generator using [`GeneratorTuning`]
#[derive(Debug, Clone)]
pub struct WeightedColorGenerator {
    rng: SimpleRng,
    tuning: GeneratorTuning,
}

impl WeightedColorGenerator {
    pub fn new(seed: u32) -> Self {
        Self::with_tuning(seed, GeneratorTuning::default())
    }

    pub fn with_tuning(seed: u32, tuning: GeneratorTuning) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            tuning,
        }
    }

    /// Weight of every palette color, in palette order
    pub fn weights(&self, ctx: &RefillContext<'_>) -> Vec<f32> {
        let t = &self.tuning;
        let (many, one) = if ctx.cascade_depth <= t.shallow_max_depth {
            t.shallow
        } else if ctx.cascade_depth <= t.medium_max_depth {
            t.medium
        } else {
            t.deep
        };

        ctx.palette
            .iter()
            .map(|color| {
                let recent = ctx.recent.iter().filter(|c| *c == color).count();
                let mut weight = t.recent_decay.powi(recent as i32);

                let in_column = ctx
                    .column_colors
                    .iter()
                    .filter(|c| **c == Some(*color))
                    .count();
                if in_column >= 2 {
                    weight *= many;
                } else if in_column == 1 {
                    weight *= one;
                }
                weight.max(t.min_weight)
            })
            .collect()
    }
}

impl ColorGenerator for WeightedColorGenerator {
    fn generate(&mut self, ctx: &RefillContext<'_>) -> Color {
        let weights = self.weights(ctx);
        self.rng
            .pick_weighted(ctx.palette, &weights)
            .unwrap_or(Color::Red)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALETTE: [Color; 3] = [Color::Red, Color::Blue, Color::Green];

    fn ctx<'a>(
        recent: &'a [Color],
        depth: u32,
        column: &'a [Option<Color>],
    ) -> RefillContext<'a> {
        RefillContext {
            column: 0,
            palette: &PALETTE,
            recent,
            cascade_depth: depth,
            column_colors: column,
        }
    }

    #[test]
    fn fresh_column_is_uniform() {
        let generator = WeightedColorGenerator::new(1);
        assert_eq!(generator.weights(&ctx(&[], 0, &[])), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn recent_drops_decay() {
        let generator = WeightedColorGenerator::new(1);
        let w = generator.weights(&ctx(&[Color::Red, Color::Red], 0, &[]));
        assert!((w[0] - 0.36).abs() < 1e-6);
        assert_eq!(w[1], 1.0);
    }

    #[test]
    fn column_penalty_tightens_with_depth() {
        let generator = WeightedColorGenerator::new(1);
        let column = [Some(Color::Blue), Some(Color::Blue), Some(Color::Green)];

        let shallow = generator.weights(&ctx(&[], 1, &column));
        assert_eq!(shallow, vec![1.0, 0.5, 1.0]);

        let medium = generator.weights(&ctx(&[], 3, &column));
        assert!((medium[1] - 0.2).abs() < 1e-6);
        assert!((medium[2] - 0.6).abs() < 1e-6);

        let deep = generator.weights(&ctx(&[], 9, &column));
        assert!((deep[1] - 0.05).abs() < 1e-6);
        assert!((deep[2] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn weights_have_a_floor() {
        let generator = WeightedColorGenerator::new(1);
        let recent = [Color::Red; 3];
        let column = [Some(Color::Red); 4];
        let w = generator.weights(&ctx(&recent, 9, &column));
        assert_eq!(w[0], 0.01);
    }

    #[test]
    fn generate_stays_in_palette_and_is_seeded() {
        let mut a = WeightedColorGenerator::new(42);
        let mut b = WeightedColorGenerator::new(42);
        for _ in 0..50 {
            let color = a.generate(&ctx(&[], 0, &[]));
            assert!(PALETTE.contains(&color));
            assert_eq!(color, b.generate(&ctx(&[], 0, &[])));
        }
    }
}
