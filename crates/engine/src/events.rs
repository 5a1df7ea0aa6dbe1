//! Fire-and-forget gameplay notifications

use std::cell::RefCell;
use std::rc::Rc;

use strum::IntoStaticStr;

use ball_crush_types::{Color, EffectDescriptor, Position, SpecialKind};

#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum GameEvent {
    /// One match group scored
    MatchScored {
        positions: Vec<Position>,
        color: Color,
        points: u32,
        multiplier: u32,
    },
    /// A match pass cleared at least `LARGE_CLEAR_THRESHOLD` cells
    LargeClear { count: usize },
    SpecialCreated {
        kind: SpecialKind,
        pos: Position,
        color: Color,
    },
    /// A single special was activated by a swap
    Special {
        kind: SpecialKind,
        clear_count: usize,
        points: u32,
    },
    /// Two specials were swapped together
    Combo {
        kinds: (SpecialKind, SpecialKind),
        clear_count: usize,
        points: u32,
    },
    /// Cascade depth reached the milestone threshold
    Cascade { count: u32, multiplier: u32 },
    CascadeEnd,
    ObstacleHit {
        pos: Position,
        obstacle: String,
        remaining_hp: u32,
        effect: EffectDescriptor,
    },
    ObstacleDestroyed {
        pos: Position,
        obstacle: String,
        effect: EffectDescriptor,
    },
    /// An illegal swap was undone
    SwapReverted { a: Position, b: Position },
    Reshuffle { refilled: bool },
    LevelComplete,
    GameOver,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Event sink that records events; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Number of recorded events with the given name
    pub fn count(&self, name: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.name() == name)
            .count()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: GameEvent) {
        self.events.borrow_mut().push(event);
    }
}
