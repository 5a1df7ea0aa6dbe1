//! Ball Crush cascade engine (workspace facade crate).
//!
//! This package exposes `ball_crush::{types,core,config,engine}` while the implementation
//! lives in dedicated crates under `crates/`.

pub use ball_crush_config as config;
pub use ball_crush_core as core;
pub use ball_crush_engine as engine;
pub use ball_crush_types as types;
