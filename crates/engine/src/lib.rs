//! Cascade engine - sequences board analysis into a playable session
//!
//! [`CascadeCoordinator`] owns the board of one level and runs the swap, match, clear,
//! fall and recheck loop. Everything it talks to sits behind a trait so a frontend, a
//! test or the headless runner can plug in:
//!
//! | Seam | Trait | Recording impl |
//! |------|-------|----------------|
//! | animations | [`Animator`] | [`AnimationLog`] |
//! | notifications | [`EventSink`] | [`EventLog`] |
//! | refill colors | [`ColorGenerator`] | [`WeightedColorGenerator`] |
//! | objectives | [`ObjectiveTracker`] | [`Objectives`] |
//! | lifecycle | [`LifecycleHooks`] | [`HookCounter`] |

pub mod animation;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod generator;
pub mod hooks;
pub mod objectives;
pub mod snapshot;

pub use animation::{AnimationLog, AnimationRequest, Animator, NullAnimator, PieceMove};
pub use coordinator::{CascadeCoordinator, Collaborators};
pub use error::SwapError;
pub use events::{EventLog, EventSink, GameEvent, NullSink};
pub use generator::{ColorGenerator, GeneratorTuning, RefillContext, WeightedColorGenerator};
pub use hooks::{HookCounter, LifecycleHooks, NoHooks};
pub use objectives::{ObjectiveProgress, ObjectiveTracker, Objectives};
pub use snapshot::SessionSnapshot;
