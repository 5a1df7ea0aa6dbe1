use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ball_crush::config::builtin_config;
use ball_crush::core::{detect, resolve_chain, Board, CellSet, ChainSeed, SimpleRng};
use ball_crush::engine::{CascadeCoordinator, Collaborators};
use ball_crush::types::{CascadeState, Color, MatchRules, ObstacleRegistry, Position, TICK_MS};

fn filled_board(seed: u32) -> Board {
    let mut board = Board::standard();
    board.fill(&Color::ALL, &MatchRules::default(), &mut SimpleRng::new(seed));
    board
}

fn bench_fill(c: &mut Criterion) {
    let mut seed = 0;
    c.bench_function("fill_9x9", |b| {
        b.iter(|| {
            seed += 1;
            black_box(filled_board(seed));
        })
    });
}

fn bench_detect(c: &mut Criterion) {
    let board = Board::from_rows(
        &[
            "R R R R B G Y P O",
            "G B Y G Y P O R B",
            "G Y B R R R O P Y",
            "G B Y P O R B G Y",
            "P O R B G Y P O R",
            "B G Y P O R B G Y",
            "Y P O R B G Y P O",
            "O R B G Y P O R B",
            "R B G Y P O R B G",
        ],
        Arc::new(ObstacleRegistry::standard()),
    )
    .unwrap();

    c.bench_function("detect_matches", |b| {
        b.iter(|| black_box(detect(black_box(&board))))
    });
}

fn bench_chain(c: &mut Criterion) {
    let board = Board::from_rows(
        &[
            "R B G Y P O R B G",
            "G Y P O R B G Y P",
            "P O R B G Y P O R",
            "B G Y P O R B G Y",
            "Y P O R- B G Y| P O",
            "O R B G Y P O R B",
            "R B G Y P O R* B G",
            "G Y P O R B G Y P",
            "P O R B G Y P O R",
        ],
        Arc::new(ObstacleRegistry::standard()),
    )
    .unwrap();

    c.bench_function("resolve_chain", |b| {
        b.iter(|| {
            let mut rng = SimpleRng::new(7);
            let cleared = CellSet::new(board.rows(), board.cols());
            black_box(resolve_chain(
                &board,
                &[ChainSeed::new(Position::new(4, 3))],
                cleared,
                &mut rng,
            ))
        })
    });
}

fn bench_turn(c: &mut Criterion) {
    let registry = Arc::new(ObstacleRegistry::standard());
    let level = builtin_config(16, &registry).unwrap();

    c.bench_function("play_one_turn", |b| {
        b.iter(|| {
            let collaborators = Collaborators::headless(&level, 99);
            let mut session =
                CascadeCoordinator::new(level.clone(), Arc::clone(&registry), collaborators, 99);
            session.finish_animations();
            if let Some((a, b)) = session.hint() {
                let _ = session.request_swap(a, b);
            }
            for _ in 0..200 {
                if session.state() == CascadeState::Idle || session.state().is_terminal() {
                    break;
                }
                session.finish_animations();
                session.tick(TICK_MS);
            }
            black_box(session.score())
        })
    });
}

criterion_group!(benches, bench_fill, bench_detect, bench_chain, bench_turn);
criterion_main!(benches);
