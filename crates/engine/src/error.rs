//! Error types returned to input callers.

use thiserror::Error;

use ball_crush_types::{CascadeState, Position};

/// A swap request rejected before touching the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("swaps are only accepted while idle (state is {0})")]
    NotIdle(CascadeState),

    #[error("{a} and {b} are not adjacent")]
    NotAdjacent { a: Position, b: Position },

    #[error("cell {0} cannot be swapped")]
    NotSwappable(Position),

    #[error("session was cancelled")]
    Cancelled,
}
