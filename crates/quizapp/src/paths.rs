//! Fixed layout of the data root.
//!
//! ```text
//! <data root>/
//! ├── quiz.toml                 # Optional configuration
//! ├── leaderboard.json          # Global leaderboard
//! ├── reports.json              # Game reports
//! ├── Leaderboards/<set>.xml    # One leaderboard per question set
//! ├── CustomKahoots/<set>.json  # Question-set definitions
//! └── ErrorReports/ErrorReport_<yyyyMMdd_HHmmss>.txt
//! ```

pub const CONFIG_FILE: &str = "quiz.toml";
pub const GLOBAL_LEADERBOARD_FILE: &str = "leaderboard.json";
pub const REPORTS_FILE: &str = "reports.json";
pub const LEADERBOARDS_DIR: &str = "Leaderboards";
pub const CUSTOM_KAHOOTS_DIR: &str = "CustomKahoots";
pub const ERROR_REPORTS_DIR: &str = "ErrorReports";

/// Directories created when the data root is initialized.
pub const DATA_DIRS: [&str; 3] = [CUSTOM_KAHOOTS_DIR, LEADERBOARDS_DIR, ERROR_REPORTS_DIR];
