//! Cascade coordinator - the state machine that sequences one player move
//!
//! The coordinator owns the board and drives it through
//! `Idle -> Swapping -> MatchCheck -> Clearing -> Falling -> Recheck -> MatchCheck -> ...`
//! until the board settles. It never sleeps or spawns anything: time arrives through
//! [`CascadeCoordinator::tick`] and animation completion through
//! [`CascadeCoordinator::animation_finished`] / [`CascadeCoordinator::finish_animations`].
//!
//! # Timing
//!
//! | State | Leaves on |
//! |-------|-----------|
//! | `Entrance` | entrance animation done |
//! | `Swapping` | swap animation done, or the last-move pause elapsed |
//! | `MatchCheck` | next tick |
//! | `Clearing` | clear animations (or the last special wave) done |
//! | `Falling` | fall and refill animations done |
//! | `Recheck` | next tick |
//! | `Reshuffling` | shuffle animation done |
//!
//! A step that launches no animations continues immediately.

use std::collections::HashMap;
use std::sync::Arc;

use arrayvec::ArrayVec;
use tracing::{debug, info, trace, warn};

use ball_crush_config::LevelConfig;
use ball_crush_core::{
    detect_with, match_points, resolve_chain, resolve_combo_chain, special_points, Board,
    Cascade, CellSet, ChainSeed, Match, SimpleRng, SwapHint, Wave,
};
use ball_crush_types::{
    CascadeState, Cell, Color, DamageTrigger, Obstacle, ObjectiveId, ObstacleRegistry, PieceId,
    Position, SpecialKind, CASCADE_MILESTONE_THRESHOLD, COLUMN_HISTORY_LEN,
    LARGE_CLEAR_THRESHOLD, LAST_MOVE_PAUSE_MS,
};

use crate::animation::{AnimationRequest, Animator, NullAnimator, PieceMove};
use crate::error::SwapError;
use crate::events::{EventSink, GameEvent, NullSink};
use crate::generator::{ColorGenerator, RefillContext, WeightedColorGenerator};
use crate::hooks::{LifecycleHooks, NoHooks};
use crate::objectives::{ObjectiveTracker, Objectives};
use crate::snapshot::SessionSnapshot;

/// Seed offset for the refill generator, so it does not mirror the board rng
const GENERATOR_SEED_SALT: u32 = 0x9E37_79B9;

/// External collaborators of a session
pub struct Collaborators {
    pub animator: Box<dyn Animator>,
    pub events: Box<dyn EventSink>,
    pub generator: Box<dyn ColorGenerator>,
    pub objectives: Box<dyn ObjectiveTracker>,
    pub hooks: Box<dyn LifecycleHooks>,
}

impl Collaborators {
    /// Discarding animator and sink, weighted refills, the level's own objectives
    pub fn headless(level: &LevelConfig, seed: u32) -> Self {
        Self {
            animator: Box::new(NullAnimator),
            events: Box::new(NullSink),
            generator: Box::new(WeightedColorGenerator::new(seed ^ GENERATOR_SEED_SALT)),
            objectives: Box::new(Objectives::from_defs(&level.objectives)),
            hooks: Box::new(NoHooks),
        }
    }

    pub fn with_animator(mut self, animator: impl Animator + 'static) -> Self {
        self.animator = Box::new(animator);
        self
    }

    pub fn with_events(mut self, events: impl EventSink + 'static) -> Self {
        self.events = Box::new(events);
        self
    }

    pub fn with_generator(mut self, generator: impl ColorGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn with_objectives(mut self, objectives: impl ObjectiveTracker + 'static) -> Self {
        self.objectives = Box::new(objectives);
        self
    }

    pub fn with_hooks(mut self, hooks: impl LifecycleHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }
}

/// Work parked on the last-move pause
#[derive(Debug, Clone, Copy)]
enum Deferred {
    Combo(Position, Position),
    Special(Position, Position),
    MatchCheck,
}

#[derive(Debug)]
struct Pause {
    remaining_ms: u32,
    then: Deferred,
}

/// Special waves still to play, and what they clear in the end
#[derive(Debug)]
struct SpecialPlan {
    waves: Vec<Wave>,
    to_clear: CellSet,
    /// Plain piece swapped onto a special; it survives the activation
    spared: Option<Position>,
}

/// What to do when the current animation batch completes
#[derive(Debug)]
enum Continuation {
    Entered,
    SwapLanded { a: Position, b: Position },
    SwapReverted,
    MatchCleared { cleared: CellSet, formed: Vec<Position> },
    Wave { plan: SpecialPlan, next: usize },
    Settled,
    Reshuffled,
}

/// One level session
pub struct CascadeCoordinator {
    level: LevelConfig,
    board: Board,
    rng: SimpleRng,
    state: CascadeState,
    score: u32,
    moves_left: u32,
    cascade: Cascade,
    /// Swap that started the current cascade, used once for special placement
    swap_hint: Option<SwapHint>,
    /// Last few refill colors per column
    column_history: Vec<ArrayVec<Color, COLUMN_HISTORY_LEN>>,
    /// Animations launched in the current batch and not yet finished
    pending: u32,
    continuation: Option<Continuation>,
    pause: Option<Pause>,
    cancelled: bool,
    animator: Box<dyn Animator>,
    events: Box<dyn EventSink>,
    generator: Box<dyn ColorGenerator>,
    objectives: Box<dyn ObjectiveTracker>,
    hooks: Box<dyn LifecycleHooks>,
}

impl CascadeCoordinator {
    /// Start a session: place the level's obstacles, fill the board, play the entrance
    ///
    /// `registry` must be the one `level` was validated against.
    pub fn new(
        level: LevelConfig,
        registry: Arc<ObstacleRegistry>,
        collaborators: Collaborators,
        seed: u32,
    ) -> Self {
        let mut board = Board::new(level.rows, level.cols, registry);
        for placed in &level.obstacles {
            board.place_obstacle(placed.pos, Obstacle::new(placed.kind, placed.hp));
        }
        let mut rng = SimpleRng::new(seed);
        board.fill(&level.colors, &level.rules, &mut rng);
        Self::start(level, board, rng, collaborators)
    }

    /// Start a session on a prepared board
    ///
    /// The board's dimensions and obstacles win over the level's; moves, palette,
    /// rules and objectives come from `level`.
    pub fn with_board(
        level: LevelConfig,
        board: Board,
        collaborators: Collaborators,
        seed: u32,
    ) -> Self {
        Self::start(level, board, SimpleRng::new(seed), collaborators)
    }

    fn start(level: LevelConfig, board: Board, rng: SimpleRng, c: Collaborators) -> Self {
        info!(
            level = level.level,
            rows = board.rows(),
            cols = board.cols(),
            moves = level.moves,
            "session started"
        );
        let mut session = Self {
            moves_left: level.moves,
            column_history: vec![ArrayVec::new(); board.cols() as usize],
            level,
            board,
            rng,
            state: CascadeState::Entrance,
            score: 0,
            cascade: Cascade::default(),
            swap_hint: None,
            pending: 0,
            continuation: None,
            pause: None,
            cancelled: false,
            animator: c.animator,
            events: c.events,
            generator: c.generator,
            objectives: c.objectives,
            hooks: c.hooks,
        };

        let pieces: Vec<(PieceId, Position)> = session
            .board
            .positions()
            .filter_map(|pos| session.board.piece(pos).map(|p| (p.id, pos)))
            .collect();
        session.launch(AnimationRequest::Entrance { pieces });
        session.await_batch(Continuation::Entered);
        session
    }

    pub fn state(&self) -> CascadeState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    /// Current multiplier and depth
    pub fn cascade(&self) -> Cascade {
        self.cascade
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for scripted setups (only meaningful while idle)
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn objectives(&self) -> &dyn ObjectiveTracker {
        self.objectives.as_ref()
    }

    pub fn pending_animations(&self) -> u32 {
        self.pending
    }

    /// True while the last-move pause is running
    pub fn is_paused(&self) -> bool {
        self.pause.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// A swap worth making, if the session is idle
    ///
    /// Prefers swaps the cascade will resolve; falls back to any legal move.
    pub fn hint(&self) -> Option<(Position, Position)> {
        if self.state != CascadeState::Idle {
            return None;
        }
        let rules = &self.level.rules;
        self.board
            .find_scoring_move(rules)
            .or_else(|| self.board.find_legal_move(rules))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            level: self.level.level,
            state: self.state,
            score: self.score,
            moves_left: self.moves_left,
            multiplier: self.cascade.multiplier,
            cascade_count: self.cascade.count,
            pending_animations: self.pending,
            board: self.board.snapshot(),
            objectives: self.objectives.progress(),
        }
    }

    /// Try to start a player swap of two adjacent cells
    ///
    /// Rejected requests leave the session untouched and cost nothing.
    pub fn request_swap(&mut self, a: Position, b: Position) -> Result<(), SwapError> {
        if self.cancelled {
            return Err(SwapError::Cancelled);
        }
        if self.state != CascadeState::Idle {
            return Err(SwapError::NotIdle(self.state));
        }
        if !self.board.is_adjacent(a, b) {
            return Err(SwapError::NotAdjacent { a, b });
        }
        for pos in [a, b] {
            if !self.board.is_swappable(pos) {
                return Err(SwapError::NotSwappable(pos));
            }
        }
        self.start_swap(a, b);
        Ok(())
    }

    /// Advance time; returns true if the session changed state
    ///
    /// Performs at most one transition per call.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.cancelled || self.state.is_terminal() {
            return false;
        }

        if let Some(pause) = self.pause.as_mut() {
            pause.remaining_ms = pause.remaining_ms.saturating_sub(elapsed_ms);
            if pause.remaining_ms > 0 {
                return false;
            }
            if let Some(pause) = self.pause.take() {
                self.run_deferred(pause.then);
            }
            return true;
        }

        match self.state {
            CascadeState::MatchCheck => {
                self.check_matches();
                true
            }
            CascadeState::Recheck => {
                self.recheck();
                true
            }
            _ => false,
        }
    }

    /// One launched animation completed
    pub fn animation_finished(&mut self) {
        if self.cancelled || self.pending == 0 {
            return;
        }
        self.pending -= 1;
        if self.pending == 0 {
            if let Some(next) = self.continuation.take() {
                self.resume(next);
            }
        }
    }

    /// Every animation of the current batch completed
    pub fn finish_animations(&mut self) {
        if self.cancelled || self.pending == 0 {
            return;
        }
        self.pending = 0;
        if let Some(next) = self.continuation.take() {
            self.resume(next);
        }
    }

    /// Drop all in-flight work without touching the board
    ///
    /// The session stops accepting input, ticks and completions.
    pub fn cancel_all(&mut self) {
        self.animator.cancel_all();
        self.pending = 0;
        self.continuation = None;
        self.pause = None;
        self.cancelled = true;
        debug!(state = %self.state, "session cancelled");
    }

    fn set_state(&mut self, next: CascadeState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "state transition");
            self.state = next;
        }
    }

    fn launch(&mut self, request: AnimationRequest) {
        self.pending += 1;
        self.animator.launch(request);
    }

    fn await_batch(&mut self, next: Continuation) {
        if self.pending == 0 {
            self.resume(next);
        } else {
            self.continuation = Some(next);
        }
    }

    fn resume(&mut self, next: Continuation) {
        match next {
            Continuation::Entered => {
                if self.board.has_legal_move(&self.level.rules) {
                    self.set_state(CascadeState::Idle);
                } else {
                    self.start_reshuffle();
                }
            }
            Continuation::SwapLanded { a, b } => self.swap_landed(a, b),
            Continuation::SwapReverted => self.set_state(CascadeState::Idle),
            Continuation::MatchCleared { cleared, formed } => {
                for pos in cleared.iter() {
                    if !formed.contains(&pos) {
                        self.board.set(pos, Cell::EMPTY);
                    }
                }
                let hit = CellSet::new(self.board.rows(), self.board.cols());
                self.damage_adjacent(&cleared, hit);
                self.settle();
            }
            Continuation::Wave { plan, next } => self.play_wave(plan, next),
            Continuation::Settled => self.set_state(CascadeState::Recheck),
            Continuation::Reshuffled => {
                self.hooks.on_reshuffle();
                if self.board.has_legal_move(&self.level.rules) {
                    self.finish_turn();
                } else {
                    warn!("no legal move after reshuffle");
                    self.game_over();
                }
            }
        }
    }

    fn start_swap(&mut self, a: Position, b: Position) {
        debug!(%a, %b, "swap accepted");
        self.set_state(CascadeState::Swapping);
        self.board.swap(a, b);

        let special_a = self.board.get(a).special().is_special();
        let special_b = self.board.get(b).special().is_special();
        if special_a && special_b {
            self.spend_move(Deferred::Combo(a, b));
            return;
        }

        self.launch(AnimationRequest::Swap { a, b });
        self.await_batch(Continuation::SwapLanded { a, b });
    }

    fn swap_landed(&mut self, a: Position, b: Position) {
        if self.board.get(a).special().is_special() || self.board.get(b).special().is_special() {
            self.spend_move(Deferred::Special(a, b));
            return;
        }

        let hint = SwapHint { from: a, to: b };
        if detect_with(&self.board, &self.level.rules, Some(hint)).is_empty() {
            trace!(%a, %b, "swap made no match, reverting");
            self.board.swap(a, b);
            self.events.emit(GameEvent::SwapReverted { a, b });
            self.launch(AnimationRequest::SwapBack { a, b });
            self.await_batch(Continuation::SwapReverted);
            return;
        }
        self.swap_hint = Some(hint);
        self.spend_move(Deferred::MatchCheck);
    }

    /// Charge a move, then run `then` now or after the last-move pause
    fn spend_move(&mut self, then: Deferred) {
        let last = self.moves_left == 1;
        self.moves_left = self.moves_left.saturating_sub(1);
        self.cascade.reset();
        if last {
            debug!("last move, pausing");
            self.pause = Some(Pause {
                remaining_ms: LAST_MOVE_PAUSE_MS,
                then,
            });
        } else {
            self.run_deferred(then);
        }
    }

    fn run_deferred(&mut self, then: Deferred) {
        match then {
            Deferred::Combo(a, b) => self.activate_combo(a, b),
            Deferred::Special(a, b) => self.activate_special(a, b),
            Deferred::MatchCheck => self.set_state(CascadeState::MatchCheck),
        }
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.objectives.increment(&ObjectiveId::score(), points);
    }

    fn check_matches(&mut self) {
        let hint = self.swap_hint.take();
        let matches = detect_with(&self.board, &self.level.rules, hint);
        if matches.is_empty() {
            self.end_cascade();
            return;
        }
        self.set_state(CascadeState::Clearing);
        self.clear_matches(matches);
    }

    fn clear_matches(&mut self, matches: Vec<Match>) {
        let multiplier = self.cascade.multiplier;
        let mut cleared = CellSet::new(self.board.rows(), self.board.cols());
        let mut specials = Vec::new();
        let mut order = 0;

        for m in &matches {
            let points = match_points(m.len(), multiplier);
            self.add_score(points);
            self.objectives
                .increment(&ObjectiveId::collect(m.color), m.len() as u32);
            self.events.emit(GameEvent::MatchScored {
                positions: m.positions.clone(),
                color: m.color,
                points,
                multiplier,
            });

            let special_pos = m.special_pos.filter(|_| m.special_to_create.is_special());
            for &pos in &m.positions {
                if !cleared.insert(pos) || Some(pos) == special_pos {
                    continue;
                }
                let Some(piece) = self.board.piece(pos) else {
                    continue;
                };
                let request = match special_pos {
                    Some(into) => AnimationRequest::Absorb {
                        id: piece.id,
                        from: pos,
                        into,
                        order,
                    },
                    None => AnimationRequest::Clear {
                        id: piece.id,
                        pos,
                        color: piece.color,
                        order,
                    },
                };
                self.launch(request);
                order += 1;
            }
            if let Some(pos) = special_pos {
                specials.push((pos, m.special_to_create, m.color));
            }
        }

        if cleared.len() >= LARGE_CLEAR_THRESHOLD {
            self.events.emit(GameEvent::LargeClear {
                count: cleared.len(),
            });
        }

        let mut formed = Vec::with_capacity(specials.len());
        for (pos, kind, color) in specials {
            let piece = self.board.spawn_piece(color, kind);
            self.board.set_piece(pos, Some(piece));
            self.launch(AnimationRequest::SpecialFormation {
                id: piece.id,
                pos,
                kind,
            });
            self.events
                .emit(GameEvent::SpecialCreated { kind, pos, color });
            formed.push(pos);
        }

        debug!(
            groups = matches.len(),
            cleared = cleared.len(),
            multiplier,
            score = self.score,
            "matches scored"
        );
        self.await_batch(Continuation::MatchCleared { cleared, formed });
    }

    /// One special swapped with a plain piece
    fn activate_special(&mut self, a: Position, b: Position) {
        let (origin, other) = if self.board.get(a).special().is_special() {
            (a, b)
        } else {
            (b, a)
        };
        let kind = self.board.get(origin).special();
        let target = self.board.get(other).color();

        let empty = CellSet::new(self.board.rows(), self.board.cols());
        let mut chain = resolve_chain(
            &self.board,
            &[ChainSeed::with_target(origin, target)],
            empty,
            &mut self.rng,
        );
        chain.all_to_clear.remove(other);

        let clear_count = chain.all_to_clear.len();
        let points = special_points(clear_count, self.cascade.multiplier);
        self.add_score(points);
        self.objectives.increment(&ObjectiveId::special(kind), 1);
        self.events.emit(GameEvent::Special {
            kind,
            clear_count,
            points,
        });
        debug!(?kind, %origin, clear_count, waves = chain.waves.len(), "special activated");

        self.set_state(CascadeState::Clearing);
        self.play_wave(
            SpecialPlan {
                waves: chain.waves,
                to_clear: chain.all_to_clear,
                spared: Some(other),
            },
            0,
        );
    }

    /// Two specials swapped together
    fn activate_combo(&mut self, a: Position, b: Position) {
        let kinds = (self.board.get(a).special(), self.board.get(b).special());
        let chain = resolve_combo_chain(&self.board, a, b, &mut self.rng);

        let clear_count = chain.all_to_clear.len();
        let points = special_points(clear_count, self.cascade.multiplier);
        self.add_score(points);
        self.objectives.increment(&ObjectiveId::special(kinds.0), 1);
        self.objectives.increment(&ObjectiveId::special(kinds.1), 1);
        self.events.emit(GameEvent::Combo {
            kinds,
            clear_count,
            points,
        });
        debug!(?kinds, clear_count, waves = chain.waves.len(), "combo activated");

        self.set_state(CascadeState::Clearing);
        self.play_wave(
            SpecialPlan {
                waves: chain.waves,
                to_clear: chain.all_to_clear,
                spared: None,
            },
            0,
        );
    }

    /// Launch wave `index`; once every wave has played, clear the plan
    fn play_wave(&mut self, plan: SpecialPlan, index: usize) {
        let Some(wave) = plan.waves.get(index) else {
            self.finish_special(plan);
            return;
        };

        let mut requests = Vec::new();
        for activation in &wave.activations {
            let origin = activation.origin;
            if let Some(piece) = self.board.piece(origin) {
                requests.push(AnimationRequest::SpecialIntro {
                    id: piece.id,
                    pos: origin,
                    kind: activation.kind,
                });
            }
            for &pos in &activation.affected {
                if pos == origin || Some(pos) == plan.spared {
                    continue;
                }
                if let Some(piece) = self.board.piece(pos) {
                    requests.push(AnimationRequest::SpecialDestroy {
                        id: piece.id,
                        kind: activation.kind,
                        origin,
                        pos,
                    });
                }
            }
        }
        trace!(
            wave = index,
            activations = wave.activations.len(),
            "special wave"
        );

        for request in requests {
            self.launch(request);
        }
        self.await_batch(Continuation::Wave {
            plan,
            next: index + 1,
        });
    }

    /// Surviving obstacles keep their cell and hosted piece out of the clear
    fn finish_special(&mut self, mut plan: SpecialPlan) {
        let mut hit = CellSet::new(self.board.rows(), self.board.cols());
        let shielded: Vec<Position> = plan
            .to_clear
            .iter()
            .filter(|pos| self.board.get(*pos).has_obstacle())
            .collect();
        for pos in shielded {
            hit.insert(pos);
            if self.damage_obstacle(pos, DamageTrigger::SpecialHit) {
                plan.to_clear.remove(pos);
            }
        }

        for pos in plan.to_clear.iter() {
            self.board.set(pos, Cell::EMPTY);
        }
        self.damage_adjacent(&plan.to_clear, hit);
        self.settle();
    }

    /// Hit every obstacle 4-adjacent to the cleared set once, skipping cells in `hit`
    fn damage_adjacent(&mut self, cleared: &CellSet, mut hit: CellSet) {
        let targets: Vec<Position> = cleared
            .iter()
            .flat_map(Position::neighbors)
            .filter(|n| {
                !self.board.is_out_of_bounds(*n) && !cleared.contains(*n) && hit.insert(*n)
            })
            .filter(|n| self.board.get(*n).has_obstacle())
            .collect();
        for pos in targets {
            self.damage_obstacle(pos, DamageTrigger::AdjacentMatch);
        }
    }

    /// Apply one trigger's damage; returns true if the obstacle is still standing
    fn damage_obstacle(&mut self, pos: Position, trigger: DamageTrigger) -> bool {
        let Some(obstacle) = self.board.get(pos).obstacle else {
            return false;
        };
        let registry = Arc::clone(self.board.registry());
        let Some(def) = registry.get(obstacle.kind) else {
            return false;
        };

        let damage = def.damage.amount(trigger);
        if damage <= 0 {
            return true;
        }
        let hp = obstacle.hp.saturating_sub(damage.unsigned_abs());
        if hp > 0 {
            self.board
                .set_obstacle(pos, Some(Obstacle::new(obstacle.kind, hp)));
            self.events.emit(GameEvent::ObstacleHit {
                pos,
                obstacle: def.name.clone(),
                remaining_hp: hp,
                effect: def.effects.hit,
            });
            trace!(%pos, obstacle = %def.name, hp, "obstacle hit");
            return true;
        }

        self.objectives.increment(&ObjectiveId::obstacle(&def.name), 1);
        self.events.emit(GameEvent::ObstacleDestroyed {
            pos,
            obstacle: def.name.clone(),
            effect: def.effects.destroy,
        });
        self.board.set_obstacle(pos, None);
        if !def.contains_piece {
            self.board.set(pos, Cell::EMPTY);
        }
        debug!(%pos, obstacle = %def.name, "obstacle destroyed");
        false
    }

    /// After a clear: finish the level or let the board fall
    fn settle(&mut self) {
        if self.objectives.all_complete() {
            self.complete_level();
            return;
        }
        self.set_state(CascadeState::Falling);
        self.drop_and_refill();
    }

    fn drop_and_refill(&mut self) {
        let falls = self.board.apply_gravity();
        for fall in &falls {
            self.launch(AnimationRequest::Fall {
                id: fall.id,
                from: fall.from,
                to: fall.to,
            });
        }

        let mut refilled = 0;
        for col in 0..self.board.cols() as i8 {
            let empty = self.board.empty_in_column(col);
            for (order, pos) in empty.into_iter().enumerate() {
                let column_colors = self.board.column_colors(col);
                let history = &mut self.column_history[col as usize];
                let ctx = RefillContext {
                    column: col,
                    palette: &self.level.colors,
                    recent: history.as_slice(),
                    cascade_depth: self.cascade.count,
                    column_colors: &column_colors,
                };
                let color = self.generator.generate(&ctx);
                if history.is_full() {
                    history.remove(0);
                }
                history.push(color);

                let piece = self.board.spawn_piece(color, SpecialKind::None);
                self.board.set_piece(pos, Some(piece));
                self.launch(AnimationRequest::Refill {
                    id: piece.id,
                    pos,
                    color,
                    order: order as u32,
                });
                refilled += 1;
            }
        }
        trace!(falls = falls.len(), refilled, "gravity and refill");

        if falls.is_empty() && refilled == 0 {
            self.end_cascade();
        } else {
            self.await_batch(Continuation::Settled);
        }
    }

    fn recheck(&mut self) {
        let count = self.cascade.advance();
        if count >= CASCADE_MILESTONE_THRESHOLD {
            self.events.emit(GameEvent::Cascade {
                count,
                multiplier: self.cascade.multiplier,
            });
        }
        debug!(count, multiplier = self.cascade.multiplier, "cascade recheck");
        self.set_state(CascadeState::MatchCheck);
    }

    /// Board settled with nothing left to match
    fn end_cascade(&mut self) {
        self.events.emit(GameEvent::CascadeEnd);
        if self.board.has_legal_move(&self.level.rules) {
            self.finish_turn();
        } else {
            self.start_reshuffle();
        }
    }

    fn finish_turn(&mut self) {
        if self.objectives.all_complete() {
            self.complete_level();
        } else if self.moves_left == 0 {
            self.game_over();
        } else {
            self.set_state(CascadeState::Idle);
        }
    }

    fn start_reshuffle(&mut self) {
        let before: HashMap<PieceId, Position> = self
            .board
            .positions()
            .filter(|pos| !self.board.get(*pos).has_obstacle())
            .filter_map(|pos| self.board.piece(pos).map(|p| (p.id, pos)))
            .collect();

        let refilled = self
            .board
            .reshuffle(&self.level.colors, &self.level.rules, &mut self.rng);
        self.events.emit(GameEvent::Reshuffle { refilled });
        info!(refilled, "board reshuffled");

        let moves: Vec<PieceMove> = self
            .board
            .positions()
            .filter(|pos| !self.board.get(*pos).has_obstacle())
            .filter_map(|to| {
                self.board.piece(to).map(|p| PieceMove {
                    id: p.id,
                    from: before.get(&p.id).copied(),
                    to,
                })
            })
            .collect();

        self.set_state(CascadeState::Reshuffling);
        self.launch(AnimationRequest::Shuffle { moves });
        self.await_batch(Continuation::Reshuffled);
    }

    fn complete_level(&mut self) {
        self.set_state(CascadeState::LevelComplete);
        self.events.emit(GameEvent::LevelComplete);
        self.hooks.on_level_complete();
        info!(
            level = self.level.level,
            score = self.score,
            moves_left = self.moves_left,
            "level complete"
        );
    }

    fn game_over(&mut self) {
        self.set_state(CascadeState::GameOver);
        self.events.emit(GameEvent::GameOver);
        self.hooks.on_game_over();
        info!(level = self.level.level, score = self.score, "game over");
    }
}
