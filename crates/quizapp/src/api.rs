//! # API Facade
//!
//! [`QuizApi`] is built once per process from a backend and a [`QuizConfig`] and
//! owns every store together with the shared error sink. UIs talk to it only.
//!
//! ## Submitting a Game
//!
//! [`QuizApi::submit_session`] turns a finished [`PlayerSession`] into one
//! [`ScoreEntry`] and one [`GameReport`] stamped with the same time, then writes:
//!
//! 1. the global leaderboard,
//! 2. the question set's leaderboard (when the game was played on a named set),
//! 3. the game report log.
//!
//! The writes are independent. A failure in one is recorded in the returned
//! [`SubmitOutcome`] and the remaining writes still run, so a crash between them
//! can leave the stores disagreeing about the last game.
//!
//! ## Generic Over StorageBackend
//!
//! - Production: `QuizApi<FsBackend>`
//! - Testing: `QuizApi<MemBackend>`

use crate::config::QuizConfig;
use crate::error::{QuizError, Result};
use crate::error_reports::ErrorReporter;
use crate::leaderboard::Leaderboard;
use crate::model::{GameReport, ScoreEntry};
use crate::question_sets::QuestionSetStore;
use crate::reports::ReportStore;
use crate::session::{PlayerSession, SessionResult};
use crate::set_boards::SetLeaderboards;
use crate::stats::{self, GlobalStatistics, PlayerStatistics};
use crate::store::backend::StorageBackend;
use crate::store::record::RecordStore;
use chrono::Utc;
use std::fmt;
use std::rc::Rc;

/// One of the stores a submitted game is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitTarget {
    Global,
    Set(String),
    Reports,
}

impl fmt::Display for SubmitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitTarget::Global => f.write_str("global leaderboard"),
            SubmitTarget::Set(name) => write!(f, "leaderboard for '{}'", name),
            SubmitTarget::Reports => f.write_str("game reports"),
        }
    }
}

#[derive(Debug)]
pub struct SubmitFailure {
    pub target: SubmitTarget,
    pub error: QuizError,
}

#[derive(Debug)]
pub struct SubmitOutcome {
    pub entry: ScoreEntry,
    pub report: GameReport,
    /// 1-based global position right after the insert, if the entry survived the cap.
    pub global_rank: Option<usize>,
    pub failures: Vec<SubmitFailure>,
}

impl SubmitOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct QuizApi<B: StorageBackend> {
    config: QuizConfig,
    errors: Rc<ErrorReporter<B>>,
    leaderboard: Leaderboard<B>,
    set_boards: SetLeaderboards<B>,
    reports: ReportStore<B>,
    question_sets: QuestionSetStore<B>,
}

impl<B: StorageBackend> QuizApi<B> {
    pub fn new(backend: Rc<B>, config: QuizConfig) -> Self {
        let errors = Rc::new(ErrorReporter::new(Rc::clone(&backend)));
        let records = RecordStore::new(backend, Rc::clone(&errors));
        Self {
            leaderboard: Leaderboard::open(records.clone(), config.leaderboard_cap),
            set_boards: SetLeaderboards::new(records.clone(), config.set_leaderboard_cap),
            reports: ReportStore::open(records.clone(), config.report_cap),
            question_sets: QuestionSetStore::new(records),
            errors,
            config,
        }
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// A fresh session scored with the configured rules.
    pub fn start_session(&self, player_name: &str) -> PlayerSession {
        PlayerSession::with_rules(player_name, self.config.scoring_rules())
    }

    /// Record a finished game everywhere it belongs, stamped with the current time.
    pub fn submit_session(
        &mut self,
        set_name: Option<&str>,
        session: &PlayerSession,
    ) -> Result<SubmitOutcome> {
        if session.player_name().trim().is_empty() {
            return Err(QuizError::Validation("player name cannot be empty".to_string()));
        }
        self.submit_result(set_name, session.finish(Utc::now()))
    }

    /// Write an already finished game to all stores.
    pub fn submit_result(
        &mut self,
        set_name: Option<&str>,
        result: SessionResult,
    ) -> Result<SubmitOutcome> {
        let SessionResult { entry, report } = result;
        if entry.player_name.trim().is_empty() {
            return Err(QuizError::Validation("player name cannot be empty".to_string()));
        }
        if set_name.is_some_and(|name| name.trim().is_empty()) {
            return Err(QuizError::Validation(
                "question set name cannot be empty".to_string(),
            ));
        }

        let mut failures = Vec::new();

        let global_rank = match self.leaderboard.add_score(entry.clone()) {
            Ok(position) => position,
            Err(error) => {
                failures.push(SubmitFailure {
                    target: SubmitTarget::Global,
                    error,
                });
                self.rank_of_entry(&entry)
            }
        };
        if let Some(name) = set_name {
            if let Err(error) = self.set_boards.save_entry(name, entry.clone()) {
                failures.push(SubmitFailure {
                    target: SubmitTarget::Set(name.to_string()),
                    error,
                });
            }
        }
        if let Err(error) = self.reports.add_report(report.clone()) {
            failures.push(SubmitFailure {
                target: SubmitTarget::Reports,
                error,
            });
        }

        if !failures.is_empty() {
            tracing::warn!(failed = failures.len(), player = %entry.player_name, "game only partly saved");
        }

        Ok(SubmitOutcome {
            entry,
            report,
            global_rank,
            failures,
        })
    }

    /// Position of the last identical entry: where a just-inserted one lands.
    fn rank_of_entry(&self, entry: &ScoreEntry) -> Option<usize> {
        self.leaderboard
            .all_entries()
            .iter()
            .rposition(|e| e == entry)
            .map(|i| i + 1)
    }

    pub fn leaderboard(&self) -> &Leaderboard<B> {
        &self.leaderboard
    }

    pub fn leaderboard_mut(&mut self) -> &mut Leaderboard<B> {
        &mut self.leaderboard
    }

    pub fn set_boards(&self) -> &SetLeaderboards<B> {
        &self.set_boards
    }

    pub fn reports(&self) -> &ReportStore<B> {
        &self.reports
    }

    pub fn reports_mut(&mut self) -> &mut ReportStore<B> {
        &mut self.reports
    }

    pub fn question_sets(&self) -> &QuestionSetStore<B> {
        &self.question_sets
    }

    pub fn question_sets_mut(&mut self) -> &mut QuestionSetStore<B> {
        &mut self.question_sets
    }

    pub fn errors(&self) -> &ErrorReporter<B> {
        &self.errors
    }

    pub fn player_statistics(&self, name: &str) -> PlayerStatistics {
        stats::player_statistics(self.reports.all_reports(), name)
    }

    pub fn global_statistics(&self) -> GlobalStatistics {
        stats::global_statistics(self.reports.all_reports())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use crate::paths::{GLOBAL_LEADERBOARD_FILE, REPORTS_FILE};
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::mem_api;

    fn question(category: &str) -> Question {
        Question::new("Q?", vec!["right".into(), "wrong".into()], 0).with_category(category)
    }

    fn played(api: &QuizApi<impl StorageBackend>, name: &str, right: usize, wrong: usize) -> PlayerSession {
        let mut session = api.start_session(name);
        for _ in 0..right {
            session.answer(&question("Sport"), 0, 5.0);
        }
        for _ in 0..wrong {
            session.answer(&question("History"), 1, 5.0);
        }
        session
    }

    #[test]
    fn submit_writes_all_three_stores() {
        let (backend, mut api) = mem_api();
        let session = played(&api, "Alice", 2, 1);
        let outcome = api.submit_session(Some("Capitals"), &session).unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.global_rank, Some(1));
        assert_eq!(outcome.entry.timestamp, outcome.report.timestamp);
        assert!(backend.exists(GLOBAL_LEADERBOARD_FILE));
        assert!(backend.exists(REPORTS_FILE));
        assert!(backend.exists(&SetLeaderboards::<MemBackend>::board_path("Capitals")));

        assert_eq!(api.leaderboard().total_games(), 1);
        assert_eq!(api.set_boards().load_leaderboard("Capitals").len(), 1);
        assert_eq!(api.reports().total_games(), 1);
        assert_eq!(api.player_statistics("alice").total_games, 1);
    }

    #[test]
    fn submit_without_set_skips_set_board() {
        let (_backend, mut api) = mem_api();
        let session = played(&api, "Bob", 1, 0);
        api.submit_session(None, &session).unwrap();
        assert!(api.set_boards().available_leaderboards().is_empty());
        assert_eq!(api.reports().total_games(), 1);
    }

    #[test]
    fn empty_player_name_is_rejected_without_writes() {
        let (backend, mut api) = mem_api();
        let session = played(&api, "  ", 1, 0);
        let err = api.submit_session(None, &session).unwrap_err();
        assert!(matches!(err, QuizError::Validation(_)));
        assert_eq!(backend.file_count(), 0);
        assert!(api.errors().session_reports().is_empty());
    }

    #[test]
    fn write_failures_are_collected_not_short_circuited() {
        let (backend, mut api) = mem_api();
        let session = played(&api, "Alice", 1, 0);
        backend.set_simulate_write_error(true);

        let outcome = api.submit_session(Some("Capitals"), &session).unwrap();
        let targets: Vec<SubmitTarget> = outcome.failures.iter().map(|f| f.target.clone()).collect();
        assert_eq!(
            targets,
            vec![
                SubmitTarget::Global,
                SubmitTarget::Set("Capitals".to_string()),
                SubmitTarget::Reports
            ]
        );
        // In-memory state stays authoritative
        assert_eq!(api.leaderboard().total_games(), 1);
        assert_eq!(api.reports().total_games(), 1);
        assert_eq!(api.errors().session_reports().len(), 3);
    }

    #[test]
    fn repeated_result_gets_its_own_rank() {
        let (_backend, mut api) = mem_api();
        let result = played(&api, "Alice", 1, 0).finish(Utc::now());
        let first = api.submit_result(None, result.clone()).unwrap();
        let second = api.submit_result(None, result).unwrap();
        assert_eq!(first.global_rank, Some(1));
        assert_eq!(second.global_rank, Some(2));
        assert_eq!(api.leaderboard().total_games(), 2);
    }

    #[test]
    fn global_statistics_follow_reports() {
        let (_backend, mut api) = mem_api();
        let alice = played(&api, "Alice", 2, 0);
        let bob = played(&api, "Bob", 0, 2);
        api.submit_session(None, &alice).unwrap();
        api.submit_session(None, &bob).unwrap();

        let global = api.global_statistics();
        assert_eq!(global.total_games_played, 2);
        assert_eq!(global.total_players, 2);
        assert_eq!(global.category_frequency["Sport"], 1);
        assert_eq!(global.category_frequency["History"], 1);
        assert_eq!(api.leaderboard().player_rank("alice"), Some(1));
    }
}
