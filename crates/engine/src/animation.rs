//! Animation requests and the animator seam
//!
//! The coordinator never waits on time itself. Every request it hands to the
//! [`Animator`] counts as one outstanding animation; the driver reports completion
//! through `CascadeCoordinator::animation_finished` / `finish_animations`, and the
//! coordinator resumes once the whole batch is done.

use std::cell::RefCell;
use std::rc::Rc;

use ball_crush_types::{Color, PieceId, Position, SpecialKind};

/// A piece's move during a reshuffle; `from` is `None` for pieces created by a refill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceMove {
    pub id: PieceId,
    pub from: Option<Position>,
    pub to: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationRequest {
    /// Initial board drops in
    Entrance { pieces: Vec<(PieceId, Position)> },
    /// Two pieces trade places (board already swapped)
    Swap { a: Position, b: Position },
    /// An illegal swap slides back
    SwapBack { a: Position, b: Position },
    /// Matched piece pops; `order` staggers the pops within one pass
    Clear {
        id: PieceId,
        pos: Position,
        color: Color,
        order: u32,
    },
    /// Matched piece is pulled into the special it forms
    Absorb {
        id: PieceId,
        from: Position,
        into: Position,
        order: u32,
    },
    SpecialFormation {
        id: PieceId,
        pos: Position,
        kind: SpecialKind,
    },
    /// A special begins its effect
    SpecialIntro {
        id: PieceId,
        pos: Position,
        kind: SpecialKind,
    },
    /// A piece caught in a special's area
    SpecialDestroy {
        id: PieceId,
        kind: SpecialKind,
        origin: Position,
        pos: Position,
    },
    Fall {
        id: PieceId,
        from: Position,
        to: Position,
    },
    /// New piece drops in from above; `order` counts drops within the column
    Refill {
        id: PieceId,
        pos: Position,
        color: Color,
        order: u32,
    },
    Shuffle { moves: Vec<PieceMove> },
}

/// Presentation layer that plays animation requests
pub trait Animator {
    fn launch(&mut self, request: AnimationRequest);

    /// Drop everything in flight (level switch / reset)
    fn cancel_all(&mut self) {}
}

/// Animator that drops every request
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnimator;

impl Animator for NullAnimator {
    fn launch(&mut self, _request: AnimationRequest) {}
}

/// Animator that records requests; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct AnimationLog {
    inner: Rc<RefCell<AnimationLogInner>>,
}

#[derive(Debug, Default)]
struct AnimationLogInner {
    requests: Vec<AnimationRequest>,
    cancels: u32,
}

impl AnimationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<AnimationRequest> {
        self.inner.borrow().requests.clone()
    }

    /// Drain recorded requests
    pub fn take(&self) -> Vec<AnimationRequest> {
        std::mem::take(&mut self.inner.borrow_mut().requests)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().requests.is_empty()
    }

    pub fn cancels(&self) -> u32 {
        self.inner.borrow().cancels
    }
}

impl Animator for AnimationLog {
    fn launch(&mut self, request: AnimationRequest) {
        self.inner.borrow_mut().requests.push(request);
    }

    fn cancel_all(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.requests.clear();
        inner.cancels += 1;
    }
}
