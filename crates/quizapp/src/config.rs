//! # Configuration
//!
//! Quiz settings are loaded with [`confique`] from, in priority order:
//! 1. **Environment variables**: `QUIZ_LEADERBOARD_CAP`, `QUIZ_REPORT_CAP`, etc.
//! 2. **Config file**: `quiz.toml` in the data root.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `leaderboard_cap` | `100` | Entries kept in the global leaderboard |
//! | `set_leaderboard_cap` | `100` | Entries kept per question-set leaderboard |
//! | `report_cap` | `1000` | Game reports kept |
//! | `top_display` | `10` | Rows shown by top-score listings |
//! | `points_per_correct` | `100` | Base points for a correct answer |
//! | `time_bonus_per_second` | `10` | Bonus points per remaining second |
//! | `perfect_bonus_threshold` | `90` | Bonus at or above which an answer is perfect |

use crate::error::Result;
use crate::paths::CONFIG_FILE;
use crate::session::ScoringRules;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Entries kept in `leaderboard.json`.
    #[config(default = 100, env = "QUIZ_LEADERBOARD_CAP")]
    pub leaderboard_cap: usize,

    /// Entries kept in each `Leaderboards/<set>.xml`.
    #[config(default = 100, env = "QUIZ_SET_LEADERBOARD_CAP")]
    pub set_leaderboard_cap: usize,

    /// Reports kept in `reports.json`; the oldest go first.
    #[config(default = 1000, env = "QUIZ_REPORT_CAP")]
    pub report_cap: usize,

    #[config(default = 10, env = "QUIZ_TOP_DISPLAY")]
    pub top_display: usize,

    #[config(default = 100, env = "QUIZ_POINTS_PER_CORRECT")]
    pub points_per_correct: u32,

    #[config(default = 10, env = "QUIZ_TIME_BONUS_PER_SECOND")]
    pub time_bonus_per_second: u32,

    #[config(default = 90, env = "QUIZ_PERFECT_BONUS_THRESHOLD")]
    pub perfect_bonus_threshold: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            leaderboard_cap: crate::leaderboard::DEFAULT_CAP,
            set_leaderboard_cap: crate::set_boards::DEFAULT_CAP,
            report_cap: crate::reports::DEFAULT_CAP,
            top_display: crate::leaderboard::DEFAULT_TOP,
            points_per_correct: 100,
            time_bonus_per_second: 10,
            perfect_bonus_threshold: 90,
        }
    }
}

impl QuizConfig {
    /// Load `quiz.toml` from `root` (if present) layered under the environment.
    pub fn load(root: &Path) -> Result<Self> {
        let config = QuizConfig::builder()
            .env()
            .file(root.join(CONFIG_FILE))
            .load()?;
        Ok(config)
    }

    pub fn scoring_rules(&self) -> ScoringRules {
        ScoringRules {
            points_per_correct: self.points_per_correct,
            time_bonus_per_second: self.time_bonus_per_second,
            perfect_bonus_threshold: self.perfect_bonus_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuizConfig::default();
        assert_eq!(config.leaderboard_cap, 100);
        assert_eq!(config.set_leaderboard_cap, 100);
        assert_eq!(config.report_cap, 1000);
        assert_eq!(config.top_display, 10);
        assert_eq!(config.scoring_rules(), ScoringRules::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "report_cap = 5\npoints_per_correct = 50\n",
        )
        .unwrap();

        let config = QuizConfig::load(dir.path()).unwrap();
        assert_eq!(config.report_cap, 5);
        assert_eq!(config.scoring_rules().points_per_correct, 50);
        assert_eq!(config.leaderboard_cap, 100);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = QuizConfig::load(dir.path()).unwrap();
        assert_eq!(config.top_display, 10);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "report_cap = \"many\"\n").unwrap();
        let err = QuizConfig::load(dir.path()).unwrap_err();
        assert_eq!(err.cause_kind(), "ConfigError");
    }
}
