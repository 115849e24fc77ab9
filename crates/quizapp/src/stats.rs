//! Derived statistics over a snapshot of game reports.
//!
//! Pure functions: they take the report collection and compute aggregates, with
//! no state or I/O of their own. Every aggregate over an empty selection is zero.

use crate::model::GameReport;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerStatistics {
    pub total_games: usize,
    pub average_score: f64,
    pub best_score: u32,
    pub average_accuracy: f64,
    pub total_correct_answers: u64,
    pub total_questions_answered: u64,
    pub best_streak: u32,
    pub total_perfect_answers: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalStatistics {
    pub total_games_played: usize,
    pub total_players: usize,
    pub average_score: f64,
    pub highest_score: u32,
    pub average_accuracy: f64,
    pub total_questions_answered: u64,
    pub category_frequency: BTreeMap<String, usize>,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn player_statistics<'a, I>(reports: I, name: &str) -> PlayerStatistics
where
    I: IntoIterator<Item = &'a GameReport>,
{
    let mine: Vec<&GameReport> = reports.into_iter().filter(|r| r.is_player(name)).collect();

    PlayerStatistics {
        total_games: mine.len(),
        average_score: mean(mine.iter().map(|r| f64::from(r.total_score))),
        best_score: mine.iter().map(|r| r.total_score).max().unwrap_or(0),
        average_accuracy: mean(mine.iter().map(|r| r.accuracy)),
        total_correct_answers: mine.iter().map(|r| u64::from(r.correct_answers)).sum(),
        total_questions_answered: mine.iter().map(|r| u64::from(r.questions_answered)).sum(),
        best_streak: mine.iter().map(|r| r.longest_streak).max().unwrap_or(0),
        total_perfect_answers: mine.iter().map(|r| u64::from(r.perfect_answers)).sum(),
    }
}

pub fn global_statistics(reports: &[GameReport]) -> GlobalStatistics {
    if reports.is_empty() {
        return GlobalStatistics::default();
    }

    // Names as stored: "Alice" and "alice" are two players here.
    let players: BTreeSet<&str> = reports.iter().map(|r| r.player_name.as_str()).collect();

    GlobalStatistics {
        total_games_played: reports.len(),
        total_players: players.len(),
        average_score: mean(reports.iter().map(|r| f64::from(r.total_score))),
        highest_score: reports.iter().map(|r| r.total_score).max().unwrap_or(0),
        average_accuracy: mean(reports.iter().map(|r| r.accuracy)),
        total_questions_answered: reports.iter().map(|r| u64::from(r.questions_answered)).sum(),
        category_frequency: category_frequency(reports),
    }
}

/// One count per report for each distinct category it covered.
pub fn category_frequency(reports: &[GameReport]) -> BTreeMap<String, usize> {
    let mut frequency = BTreeMap::new();
    for category in reports.iter().flat_map(|r| r.categories_played.iter()) {
        *frequency.entry(category.clone()).or_insert(0) += 1;
    }
    frequency
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn report(name: &str, score: u32, correct: u32, answered: u32, categories: &[&str]) -> GameReport {
        GameReport {
            player_name: name.into(),
            total_score: score,
            questions_answered: answered,
            correct_answers: correct,
            accuracy: crate::model::accuracy_percent(correct, answered),
            average_time_per_question: 2.0,
            categories_played: categories.iter().map(|c| c.to_string()).collect(),
            timestamp: Utc::now(),
            longest_streak: correct,
            perfect_answers: correct / 2,
        }
    }

    #[test]
    fn player_statistics_are_isolated_and_case_insensitive() {
        let reports = vec![
            report("Alice", 400, 8, 10, &["A"]),
            report("Bob", 900, 10, 10, &["B"]),
            report("ALICE", 200, 3, 6, &["A"]),
        ];
        let stats = player_statistics(&reports, "alice");
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.average_score, 300.0);
        assert_eq!(stats.best_score, 400);
        assert_eq!(stats.average_accuracy, 65.0);
        assert_eq!(stats.total_correct_answers, 11);
        assert_eq!(stats.total_questions_answered, 16);
        assert_eq!(stats.best_streak, 8);
        assert_eq!(stats.total_perfect_answers, 5);
    }

    #[test]
    fn unknown_player_is_all_zero() {
        let reports = vec![report("Alice", 400, 8, 10, &["A"])];
        assert_eq!(player_statistics(&reports, "Carol"), PlayerStatistics::default());
    }

    #[test]
    fn category_frequency_counts_reports() {
        let reports = vec![
            report("Alice", 1, 1, 1, &["A", "B"]),
            report("Bob", 1, 1, 1, &["B", "C"]),
        ];
        let freq = global_statistics(&reports).category_frequency;
        let expected: BTreeMap<String, usize> =
            [("A".to_string(), 1), ("B".to_string(), 2), ("C".to_string(), 1)].into();
        assert_eq!(freq, expected);
    }

    #[test]
    fn global_aggregates() {
        let reports = vec![
            report("Alice", 100, 1, 2, &[]),
            report("Bob", 300, 2, 2, &[]),
            report("alice", 200, 0, 2, &[]),
        ];
        let stats = global_statistics(&reports);
        assert_eq!(stats.total_games_played, 3);
        assert_eq!(stats.total_players, 3);
        assert_eq!(stats.average_score, 200.0);
        assert_eq!(stats.highest_score, 300);
        assert_eq!(stats.average_accuracy, 50.0);
        assert_eq!(stats.total_questions_answered, 6);
    }

    #[test]
    fn empty_global_statistics() {
        assert_eq!(global_statistics(&[]), GlobalStatistics::default());
    }
}
