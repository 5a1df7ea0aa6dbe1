//! Level configuration - immutable inputs to a cascade session
//!
//! - [`level`]: serde level definitions, JSON loading, validation into [`LevelConfig`]
//! - [`levels`]: the built-in 20-level progression plus generated levels beyond it
//! - [`runner`]: environment settings for the headless runner
//! - [`error`]: [`ConfigError`]

pub mod error;
pub mod level;
pub mod levels;
pub mod runner;

pub use error::{ConfigError, Result};
pub use level::{LevelConfig, LevelDef, ObjectiveDef, ObstaclePlacement, PlacedObstacle};
pub use levels::{builtin, builtin_config, BUILTIN_LEVEL_COUNT};
pub use runner::RunnerConfig;
