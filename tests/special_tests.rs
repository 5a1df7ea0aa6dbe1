//! Special resolver tests: combo table, chains, the rainbow scenario

use std::collections::HashSet;
use std::sync::Arc;

use strum::IntoEnumIterator;

use ball_crush::core::{
    resolve_chain, resolve_combo, resolve_combo_chain, Board, CellSet, ChainSeed, SimpleRng,
};
use ball_crush::types::{Color, MatchRules, ObstacleRegistry, Piece, Position, SpecialKind};

fn board(rows: &[&str]) -> Board {
    Board::from_rows(rows, Arc::new(ObstacleRegistry::standard())).unwrap()
}

fn make_special(board: &mut Board, pos: Position, kind: SpecialKind) {
    let piece = board.piece(pos).unwrap();
    board.set_piece(pos, Some(Piece::special(piece.id, piece.color, kind)));
}

const PLAIN: [&str; 7] = [
    "R B G Y R B G",
    "G Y R B G Y R",
    "B G Y R B G Y",
    "Y R B G Y R B",
    "R B G Y R B G",
    "G Y R B G Y R",
    "B G Y R B G Y",
];

/// Rainbow at (4,4), a red to its right and twelve more reds around the board
const RAINBOW: [&str; 9] = [
    "R P P B R Y P P R",
    "Y P Y G G Y G B Y",
    "G Y R B B P R B Y",
    "P Y G P P Y B P B",
    "R P Y G Y@ R Y B G",
    "G G B B Y P Y B Y",
    "G Y R P R B R P Y",
    "Y G G B Y P B B G",
    "R G B B R P Y G R",
];

#[test]
fn test_every_combo_pair_is_defined() {
    let a = Position::new(3, 3);
    let b = Position::new(3, 4);
    let kinds: Vec<SpecialKind> = SpecialKind::iter().collect();
    let mut pairs = 0;

    for (i, &kind_a) in kinds.iter().enumerate() {
        for &kind_b in &kinds[i..] {
            pairs += 1;
            let mut board = board(&PLAIN);
            make_special(&mut board, a, kind_a);
            make_special(&mut board, b, kind_b);

            let mut cleared = CellSet::new(board.rows(), board.cols());
            let result = resolve_combo(&board, a, b, &mut cleared);

            let unique: HashSet<Position> = result.positions.iter().copied().collect();
            assert_eq!(unique.len(), result.positions.len(), "{kind_a}+{kind_b}");
            assert!(result.positions.iter().all(|p| !board.is_out_of_bounds(*p)));

            let has_effect = kind_a == SpecialKind::Rainbow
                || kind_b == SpecialKind::Rainbow
                || (kind_a.is_special() && kind_b.is_special());
            if has_effect {
                assert!(unique.contains(&a) && unique.contains(&b), "{kind_a}+{kind_b}");
            } else {
                assert!(result.positions.is_empty(), "{kind_a}+{kind_b}");
            }

            let mut rng = SimpleRng::new(1);
            let chain = resolve_combo_chain(&board, a, b, &mut rng);
            assert!(!chain.waves.is_empty());
            assert!(result.positions.iter().all(|p| chain.all_to_clear.contains(*p)));
        }
    }
    assert_eq!(pairs, 15);
}

#[test]
fn test_bomb_pair_clears_five_by_five() {
    let mut board = board(&PLAIN);
    let (a, b) = (Position::new(3, 3), Position::new(3, 4));
    make_special(&mut board, a, SpecialKind::AreaBomb);
    make_special(&mut board, b, SpecialKind::AreaBomb);

    let mut cleared = CellSet::new(7, 7);
    let result = resolve_combo(&board, a, b, &mut cleared);
    // Midpoint rounds toward (3,4)
    assert_eq!(result.positions.len(), 25);
    assert!(cleared.contains(Position::new(1, 2)));
    assert!(cleared.contains(Position::new(5, 6)));
    assert!(!cleared.contains(Position::new(3, 1)));
}

#[test]
fn test_rainbow_swap_clears_every_red_in_wave_zero() {
    let board = board(&RAINBOW);
    let rainbow = Position::new(4, 4);
    let reds: Vec<Position> = board
        .positions()
        .filter(|p| board.get(*p).color() == Some(Color::Red))
        .collect();
    assert_eq!(reds.len(), 13);

    let mut rng = SimpleRng::new(4);
    let chain = resolve_chain(
        &board,
        &[ChainSeed::with_target(rainbow, Some(Color::Red))],
        CellSet::new(board.rows(), board.cols()),
        &mut rng,
    );

    assert_eq!(chain.waves.len(), 1);
    let wave = &chain.waves[0];
    assert_eq!(wave.activations.len(), 1);
    assert_eq!(wave.activations[0].kind, SpecialKind::Rainbow);

    let affected: HashSet<Position> = wave.activations[0].affected.iter().copied().collect();
    assert_eq!(affected.len(), 14);
    assert!(affected.contains(&rainbow));
    assert!(reds.iter().all(|p| affected.contains(p)));
}

#[test]
fn test_line_exposes_next_wave() {
    let mut board = board(&PLAIN);
    make_special(&mut board, Position::new(1, 0), SpecialKind::RowClear);
    make_special(&mut board, Position::new(1, 5), SpecialKind::ColumnClear);
    make_special(&mut board, Position::new(6, 5), SpecialKind::AreaBomb);

    let mut rng = SimpleRng::new(1);
    let chain = resolve_chain(
        &board,
        &[ChainSeed::new(Position::new(1, 0))],
        CellSet::new(7, 7),
        &mut rng,
    );
    let kinds: Vec<SpecialKind> = chain
        .waves
        .iter()
        .map(|w| w.activations[0].kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            SpecialKind::RowClear,
            SpecialKind::ColumnClear,
            SpecialKind::AreaBomb
        ]
    );
}

#[test]
fn test_seeded_chains_never_clear_a_cell_twice() {
    let colors = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Purple,
    ];
    let specials = [
        SpecialKind::RowClear,
        SpecialKind::ColumnClear,
        SpecialKind::AreaBomb,
        SpecialKind::Rainbow,
    ];

    for seed in 1..=100u32 {
        let mut rng = SimpleRng::new(seed);
        let mut board = Board::standard();
        board.fill(&colors, &MatchRules::default(), &mut rng);

        let mut placed = Vec::new();
        for _ in 0..8 {
            let pos = Position::new(rng.next_range(9) as i8, rng.next_range(9) as i8);
            let kind = specials[rng.next_range(specials.len() as u32) as usize];
            make_special(&mut board, pos, kind);
            placed.push(pos);
        }

        let chain = resolve_chain(
            &board,
            &[ChainSeed::new(placed[0])],
            CellSet::new(9, 9),
            &mut rng,
        );

        let mut seen = HashSet::new();
        let mut origins = HashSet::new();
        for wave in &chain.waves {
            for activation in &wave.activations {
                assert!(origins.insert(activation.origin), "seed {seed}: fired twice");
                for pos in &activation.affected {
                    assert!(seen.insert(*pos), "seed {seed}: {pos} cleared twice");
                }
            }
        }
        assert_eq!(seen.len(), chain.all_to_clear.len(), "seed {seed}");
        assert!(chain.all_to_clear.iter().all(|p| seen.contains(&p)));
    }
}
