//! Headless runner settings read from the environment

use std::path::PathBuf;

/// Settings for the autoplay binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Built-in level to play (ignored when `level_file` is set)
    pub level: u32,
    pub seed: u32,
    /// JSON level definition to play instead of a built-in level
    pub level_file: Option<PathBuf>,
    /// Safety cap on driven frames
    pub max_frames: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            level: 1,
            seed: 12345,
            level_file: None,
            max_frames: 100_000,
        }
    }
}

impl RunnerConfig {
    /// Create from environment variables
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `BALL_CRUSH_LEVEL` | 1 |
    /// | `BALL_CRUSH_SEED` | 12345 |
    /// | `BALL_CRUSH_LEVEL_FILE` | unset |
    /// | `BALL_CRUSH_MAX_FRAMES` | 100000 |
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`RunnerConfig::from_env`] with an explicit variable lookup
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let level = var("BALL_CRUSH_LEVEL")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.level);

        let seed = var("BALL_CRUSH_SEED")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(defaults.seed);

        let level_file = var("BALL_CRUSH_LEVEL_FILE")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        let max_frames = var("BALL_CRUSH_MAX_FRAMES")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(defaults.max_frames);

        Self {
            level,
            seed,
            level_file,
            max_frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_config_defaults_when_unset() {
        assert_eq!(RunnerConfig::from_vars(|_| None), RunnerConfig::default());
    }

    #[test]
    fn runner_config_reads_vars() {
        let config = RunnerConfig::from_vars(|key| match key {
            "BALL_CRUSH_LEVEL" => Some("7".to_string()),
            "BALL_CRUSH_SEED" => Some(" 42 ".to_string()),
            "BALL_CRUSH_LEVEL_FILE" => Some("levels/custom.json".to_string()),
            _ => None,
        });
        assert_eq!(config.level, 7);
        assert_eq!(config.seed, 42);
        assert_eq!(config.level_file, Some(PathBuf::from("levels/custom.json")));
        assert_eq!(config.max_frames, 100_000);
    }

    #[test]
    fn runner_config_ignores_garbage() {
        let config = RunnerConfig::from_vars(|key| match key {
            "BALL_CRUSH_LEVEL" => Some("0".to_string()),
            "BALL_CRUSH_MAX_FRAMES" => Some("lots".to_string()),
            "BALL_CRUSH_LEVEL_FILE" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config, RunnerConfig::default());
    }
}
