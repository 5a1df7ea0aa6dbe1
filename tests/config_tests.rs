//! Level files and built-in levels feeding real sessions

use std::sync::Arc;

use ball_crush::config::{
    builtin, builtin_config, ConfigError, LevelDef, ObjectiveDef, BUILTIN_LEVEL_COUNT,
};
use ball_crush::engine::{CascadeCoordinator, Collaborators};
use ball_crush::types::{CascadeState, Color, ObstacleRegistry, Position};

const LEVEL_JSON: &str = r#"{
    "level": 3,
    "rows": 7,
    "cols": 6,
    "colors": ["red", "blue", "green", "yellow", "purple"],
    "moves": 15,
    "target_score": 600,
    "obstacles": [
        { "type": "stone", "row": 3, "col": 2 },
        { "type": "ice", "row": 5, "col": 4, "hp": 2 }
    ],
    "objectives": [
        { "type": "score", "target": 600 },
        { "type": "collect_color", "color": "blue", "target": 12 }
    ]
}"#;

#[test]
fn test_level_file_starts_a_session() {
    let path = std::env::temp_dir().join(format!("ball-crush-level-{}.json", std::process::id()));
    std::fs::write(&path, LEVEL_JSON).unwrap();
    let def = LevelDef::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let registry = Arc::new(ObstacleRegistry::standard());
    let level = def.validate(&registry).unwrap();
    assert_eq!(level.objectives.len(), 2);
    assert_eq!(
        level.objectives[1],
        ObjectiveDef::CollectColor {
            color: Color::Blue,
            target: 12
        }
    );

    let collaborators = Collaborators::headless(&level, 77);
    let mut session = CascadeCoordinator::new(level, registry, collaborators, 77);
    let board = session.board();
    assert_eq!((board.rows(), board.cols()), (7, 6));
    assert_eq!(board.obstacle_def(Position::new(3, 2)).unwrap().name, "stone");
    assert!(board.piece(Position::new(3, 2)).is_none());
    let ice = board.get(Position::new(5, 4));
    assert_eq!(ice.obstacle.map(|o| o.hp), Some(2));
    assert!(ice.piece.is_some());

    session.finish_animations();
    assert!(matches!(
        session.state(),
        CascadeState::Idle | CascadeState::Reshuffling
    ));
}

#[test]
fn test_missing_file_reports_path() {
    let path = std::env::temp_dir().join("ball-crush-no-such-level.json");
    let err = LevelDef::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("ball-crush-no-such-level.json"));
}

#[test]
fn test_every_builtin_level_plays() {
    let registry = Arc::new(ObstacleRegistry::standard());
    for n in 1..=BUILTIN_LEVEL_COUNT {
        let level = builtin_config(n, &registry).unwrap();
        let collaborators = Collaborators::headless(&level, n);
        let mut session = CascadeCoordinator::new(level, Arc::clone(&registry), collaborators, n);
        session.finish_animations();
        session.finish_animations();
        assert!(
            session.state() == CascadeState::Idle,
            "level {n} did not reach input, state {}",
            session.state()
        );
        assert!(session.board().has_legal_move(&session.level().rules));
    }
}

#[test]
fn test_invalid_levels_never_reach_a_session() {
    let registry = ObstacleRegistry::standard();

    let mut def = builtin(4).unwrap();
    def.colors = vec![Color::Red, Color::Red];
    assert!(matches!(
        def.validate(&registry),
        Err(ConfigError::DuplicateColor { level: 4, .. })
    ));

    let mut def = builtin(4).unwrap();
    def.moves = 0;
    assert!(matches!(
        def.validate(&registry),
        Err(ConfigError::NoMoves { level: 4 })
    ));

    let mut def = builtin(4).unwrap();
    def.objectives.push(ObjectiveDef::Score { target: 0 });
    assert!(matches!(
        def.validate(&registry),
        Err(ConfigError::ZeroTarget { .. })
    ));
}
