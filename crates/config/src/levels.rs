//! Built-in level progression
//!
//! | Levels | Theme |
//! |--------|-------|
//! | 1-3 | score only, 4 colors, generous moves |
//! | 4-6 | color collection objectives |
//! | 7-10 | ice |
//! | 11-14 | stone, column partitioning |
//! | 15-18 | mixed obstacles, several objectives |
//! | 19-20 | dense obstacles, tight moves |
//!
//! Past level 20 levels are generated: all six colors,
//! `max(15, 18 - extra / 3)` moves and a `8000 + extra * 1500` target score.

use ball_crush_types::{Color, MatchRules, ObstacleRegistry, SpecialKind, DEFAULT_COLS, DEFAULT_ROWS};

use crate::error::{ConfigError, Result};
use crate::level::{LevelConfig, LevelDef, ObjectiveDef, ObstaclePlacement};

/// Number of hand-authored levels
pub const BUILTIN_LEVEL_COUNT: u32 = 20;

const C4: &[Color] = &[Color::Red, Color::Blue, Color::Green, Color::Yellow];
const C5: &[Color] = &[
    Color::Red,
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Purple,
];
const C6: &[Color] = &Color::ALL;

fn ice(row: i8, col: i8) -> ObstaclePlacement {
    ObstaclePlacement::ice(row, col)
}

fn stone(row: i8, col: i8) -> ObstaclePlacement {
    ObstaclePlacement::stone(row, col)
}

fn score(target: u32) -> ObjectiveDef {
    ObjectiveDef::Score { target }
}

fn collect(color: Color, target: u32) -> ObjectiveDef {
    ObjectiveDef::CollectColor { color, target }
}

fn clear(obstacle: &str, target: u32) -> ObjectiveDef {
    ObjectiveDef::ClearObstacle {
        obstacle: obstacle.to_string(),
        target,
    }
}

fn level(
    level: u32,
    colors: &[Color],
    moves: u32,
    target_score: u32,
    obstacles: Vec<ObstaclePlacement>,
    objectives: Vec<ObjectiveDef>,
) -> LevelDef {
    LevelDef {
        level,
        rows: DEFAULT_ROWS,
        cols: DEFAULT_COLS,
        colors: colors.to_vec(),
        moves,
        target_score,
        obstacles,
        objectives,
        rules: MatchRules::default(),
    }
}

/// Definition of a built-in or generated level (1-based)
pub fn builtin(n: u32) -> Result<LevelDef> {
    let def = match n {
        0 => return Err(ConfigError::LevelZero),
        1 => level(1, C4, 30, 1000, vec![], vec![]),
        2 => level(2, C4, 28, 1500, vec![], vec![]),
        3 => level(3, C4, 28, 2000, vec![], vec![]),
        4 => level(4, C4, 28, 2500, vec![], vec![collect(Color::Red, 15), score(2500)]),
        5 => level(5, C5, 26, 3000, vec![], vec![collect(Color::Blue, 20), score(3000)]),
        6 => level(
            6,
            C5,
            25,
            3500,
            vec![],
            vec![collect(Color::Green, 15), collect(Color::Yellow, 15)],
        ),
        7 => level(
            7,
            C5,
            28,
            3000,
            vec![ice(3, 4), ice(4, 3), ice(4, 5), ice(5, 4)],
            vec![clear("ice", 4), score(3000)],
        ),
        8 => level(
            8,
            C5,
            26,
            3500,
            vec![ice(3, 2), ice(3, 4), ice(3, 6), ice(5, 2), ice(5, 4), ice(5, 6)],
            vec![clear("ice", 6), score(3500)],
        ),
        9 => level(
            9,
            C5,
            25,
            4000,
            vec![
                ice(1, 1),
                ice(1, 7),
                ice(3, 3),
                ice(3, 5),
                ice(5, 3),
                ice(5, 5),
                ice(7, 1),
                ice(7, 7),
            ],
            vec![clear("ice", 8), collect(Color::Red, 20)],
        ),
        10 => level(
            10,
            C5,
            24,
            4500,
            [2, 6]
                .into_iter()
                .flat_map(|r| (2..=6).map(move |c| ice(r, c)))
                .collect(),
            vec![clear("ice", 10), score(4500)],
        ),
        11 => level(
            11,
            C5,
            26,
            4000,
            vec![stone(4, 3), stone(4, 5)],
            vec![clear("stone", 2), score(4000)],
        ),
        12 => level(
            12,
            C5,
            25,
            4500,
            vec![stone(2, 4), stone(3, 4), stone(5, 4), stone(6, 4)],
            vec![clear("stone", 4), collect(Color::Purple, 20)],
        ),
        13 => level(
            13,
            C6,
            24,
            5000,
            vec![
                stone(3, 2),
                stone(3, 6),
                stone(5, 2),
                stone(5, 6),
                ice(2, 4),
                ice(4, 3),
                ice(4, 5),
                ice(6, 4),
            ],
            vec![clear("stone", 4), clear("ice", 4)],
        ),
        14 => level(
            14,
            C6,
            23,
            5500,
            vec![
                stone(1, 4),
                stone(3, 2),
                stone(3, 6),
                stone(5, 2),
                stone(5, 6),
                stone(7, 4),
            ],
            vec![clear("stone", 6), score(5500)],
        ),
        15 => level(
            15,
            C6,
            24,
            5500,
            vec![
                stone(2, 2),
                stone(2, 6),
                stone(6, 2),
                stone(6, 6),
                ice(3, 3),
                ice(3, 5),
                ice(4, 4),
                ice(5, 3),
                ice(5, 5),
                ice(4, 7),
            ],
            vec![clear("stone", 4), clear("ice", 6), collect(Color::Blue, 25)],
        ),
        16 => level(
            16,
            C6,
            22,
            6000,
            vec![
                stone(0, 4),
                stone(4, 0),
                stone(4, 8),
                stone(8, 4),
                ice(2, 2),
                ice(2, 6),
                ice(3, 4),
                ice(4, 4),
                ice(5, 2),
                ice(5, 6),
                ice(6, 3),
                ice(6, 5),
            ],
            vec![clear("stone", 4), clear("ice", 8), score(6000)],
        ),
        17 => level(
            17,
            C6,
            22,
            6500,
            vec![
                stone(1, 4),
                stone(3, 1),
                stone(3, 7),
                stone(5, 1),
                stone(5, 7),
                stone(7, 4),
                ice(2, 3),
                ice(2, 5),
                ice(4, 3),
                ice(4, 5),
                ice(6, 3),
                ice(6, 5),
            ],
            vec![
                clear("stone", 6),
                clear("ice", 6),
                ObjectiveDef::ActivateSpecial {
                    special: SpecialKind::AreaBomb,
                    target: 3,
                },
            ],
        ),
        18 => level(
            18,
            C6,
            20,
            7000,
            vec![
                stone(2, 2),
                stone(2, 6),
                stone(4, 0),
                stone(4, 8),
                stone(6, 2),
                stone(6, 6),
                ice(1, 4),
                ice(3, 3),
                ice(3, 5),
                ice(4, 4),
                ice(5, 3),
                ice(5, 5),
                ice(7, 3),
                ice(7, 5),
            ],
            vec![clear("stone", 6), clear("ice", 8), score(7000)],
        ),
        19 => level(
            19,
            C6,
            20,
            7500,
            vec![
                stone(1, 2),
                stone(1, 6),
                stone(3, 0),
                stone(3, 8),
                stone(5, 0),
                stone(5, 8),
                stone(7, 2),
                stone(7, 6),
                ice(2, 3),
                ice(2, 5),
                ice(3, 4),
                ice(4, 2),
                ice(4, 4),
                ice(4, 6),
                ice(5, 4),
                ice(6, 3),
                ice(6, 5),
                ice(7, 4),
            ],
            vec![clear("stone", 8), clear("ice", 10), collect(Color::Red, 25)],
        ),
        20 => level(
            20,
            C6,
            18,
            8000,
            vec![
                stone(0, 4),
                stone(2, 1),
                stone(2, 7),
                stone(4, 0),
                stone(4, 8),
                stone(6, 1),
                stone(6, 7),
                stone(8, 4),
                ice(1, 3),
                ice(1, 5),
                ice(3, 3),
                ice(3, 4),
                ice(3, 5),
                ice(5, 3),
                ice(5, 4),
                ice(5, 5),
                ice(7, 3),
                ice(7, 5),
            ],
            vec![clear("stone", 8), clear("ice", 10), score(8000)],
        ),
        n => {
            let extra = n - BUILTIN_LEVEL_COUNT;
            level(
                n,
                C6,
                18u32.saturating_sub(extra / 3).max(15),
                8000u32.saturating_add(extra.saturating_mul(1500)),
                vec![],
                vec![],
            )
        }
    };
    Ok(def)
}

/// Validated built-in level
pub fn builtin_config(n: u32, registry: &ObstacleRegistry) -> Result<LevelConfig> {
    builtin(n)?.validate(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_level_validates() {
        let registry = ObstacleRegistry::standard();
        for n in 1..=BUILTIN_LEVEL_COUNT + 5 {
            let config = builtin_config(n, &registry).unwrap();
            assert_eq!(config.level, n);
            assert!(!config.objectives.is_empty());
        }
    }

    #[test]
    fn procedural_levels_scale() {
        let l21 = builtin(21).unwrap();
        assert_eq!(l21.colors.len(), 6);
        assert_eq!(l21.moves, 18);
        assert_eq!(l21.target_score, 9500);

        let l50 = builtin(50).unwrap();
        assert_eq!(l50.moves, 15);
        assert_eq!(l50.target_score, 8000 + 30 * 1500);
    }

    #[test]
    fn level_ten_has_two_ice_rows() {
        let l10 = builtin(10).unwrap();
        assert_eq!(l10.obstacles.len(), 10);
        assert!(l10.obstacles.iter().all(|o| o.row == 2 || o.row == 6));
    }

    #[test]
    fn level_zero_is_rejected() {
        assert!(matches!(builtin(0), Err(ConfigError::LevelZero)));
    }
}
