//! Session lifecycle callbacks

use std::cell::Cell;
use std::rc::Rc;

/// Called exactly once per occurrence
pub trait LifecycleHooks {
    fn on_level_complete(&mut self) {}
    fn on_game_over(&mut self) {}
    fn on_reshuffle(&mut self) {}
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl LifecycleHooks for NoHooks {}

/// Hooks that count calls; clones share the counters
#[derive(Debug, Clone, Default)]
pub struct HookCounter {
    level_complete: Rc<Cell<u32>>,
    game_over: Rc<Cell<u32>>,
    reshuffle: Rc<Cell<u32>>,
}

impl HookCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level_complete(&self) -> u32 {
        self.level_complete.get()
    }

    pub fn game_over(&self) -> u32 {
        self.game_over.get()
    }

    pub fn reshuffle(&self) -> u32 {
        self.reshuffle.get()
    }
}

impl LifecycleHooks for HookCounter {
    fn on_level_complete(&mut self) {
        self.level_complete.set(self.level_complete.get() + 1);
    }

    fn on_game_over(&mut self) {
        self.game_over.set(self.game_over.get() + 1);
    }

    fn on_reshuffle(&mut self) {
        self.reshuffle.set(self.reshuffle.get() + 1);
    }
}
