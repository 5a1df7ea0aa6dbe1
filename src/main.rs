//! Headless autoplay runner (default binary).
//!
//! Plays one level by always taking the coordinator's hint and settling every
//! animation batch at once. The final board and a summary go to stdout, logs to
//! stderr (`RUST_LOG` overrides the default `info` filter).

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ball_crush::config::{builtin, LevelDef, RunnerConfig};
use ball_crush::engine::{CascadeCoordinator, Collaborators, EventLog};
use ball_crush::types::{CascadeState, ObstacleRegistry, TICK_MS};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RunnerConfig::from_env();
    run(&config)
}

fn run(config: &RunnerConfig) -> Result<()> {
    let registry = Arc::new(ObstacleRegistry::standard());
    let def = match &config.level_file {
        Some(path) => {
            LevelDef::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => builtin(config.level)?,
    };
    let level = def
        .validate(&registry)
        .with_context(|| format!("level {} is not playable", def.level))?;

    let events = EventLog::new();
    let collaborators = Collaborators::headless(&level, config.seed).with_events(events.clone());
    let mut session = CascadeCoordinator::new(level, registry, collaborators, config.seed);

    let mut frames = 0;
    let mut swaps = 0;
    while !session.state().is_terminal() && frames < config.max_frames {
        frames += 1;
        session.finish_animations();
        session.tick(TICK_MS);
        if session.state() != CascadeState::Idle {
            continue;
        }
        if events.count("swap_reverted") > 0 {
            warn!("only diagonal lines left on the board, stopping");
            break;
        }
        let Some((a, b)) = session.hint() else {
            warn!("no move available, stopping");
            break;
        };
        session.request_swap(a, b)?;
        swaps += 1;
    }
    if frames >= config.max_frames {
        warn!(frames, "frame cap reached");
    }
    info!(frames, swaps, "autoplay finished");

    let snapshot = session.snapshot();
    print!("{}", session.board().to_text());
    println!(
        "level {} {}: score {}, {} moves left",
        snapshot.level, snapshot.state, snapshot.score, snapshot.moves_left
    );
    for objective in &snapshot.objectives {
        println!(
            "  {:<20} {}/{}",
            objective.id.as_str(),
            objective.current,
            objective.target
        );
    }
    println!(
        "matches {} | specials {} | combos {} | cascades {} | reshuffles {}",
        events.count("match_scored"),
        events.count("special"),
        events.count("combo"),
        events.count("cascade"),
        events.count("reshuffle"),
    );
    Ok(())
}
