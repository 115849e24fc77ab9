//! # Quiz Persistence and Statistics
//!
//! `quizapp` keeps everything a trivia game remembers between rounds:
//! high scores, per-question-set scoreboards, a log of finished games, derived
//! statistics, question-set definitions, and text error reports for anything
//! that went wrong on disk.
//!
//! ## Layers
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                            │
//! │  - One entry point: submit a finished session, query     │
//! └──────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  Stores                                                  │
//! │  leaderboard.rs · set_boards.rs · reports.rs ·           │
//! │  question_sets.rs · error_reports.rs · stats.rs          │
//! └──────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                        │
//! │  StorageBackend trait · FsBackend · MemBackend · codecs │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate prints or exits. Corrupt input never aborts a game: it is
//! turned into an error report and an empty collection.
//!
//! ## Module Overview
//!
//! - [`api`]: Facade used by UIs
//! - [`session`]: Scoring of an in-progress game
//! - [`leaderboard`]: Global top scores
//! - [`set_boards`]: Per-question-set XML leaderboards
//! - [`reports`]: Game report log
//! - [`stats`]: Aggregates over reports
//! - [`question_sets`]: Question-set files and the editing draft
//! - [`error_reports`]: Error-reporting sink
//! - [`store`]: Storage backends and codecs
//! - [`config`], [`init`], [`paths`]: Data root and settings

pub mod api;
pub mod config;
pub mod error;
pub mod error_reports;
pub mod init;
pub mod leaderboard;
pub mod model;
pub mod paths;
pub mod question_sets;
pub mod reports;
pub mod session;
pub mod set_boards;
pub mod stats;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
