//! Per-game accumulator.
//!
//! A [`PlayerSession`] is fed one answer at a time by the game loop. When the game
//! ends, [`PlayerSession::finish`] produces the [`ScoreEntry`] and [`GameReport`]
//! from the same snapshot and the same timestamp, so the leaderboards and the
//! report log never disagree about a game.

use crate::model::{accuracy_percent, GameReport, Question, ScoreEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Point values used when scoring answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub points_per_correct: u32,
    /// Bonus points per whole second left on the clock.
    pub time_bonus_per_second: u32,
    /// A correct answer whose bonus reaches this value counts as perfect.
    pub perfect_bonus_threshold: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            points_per_correct: 100,
            time_bonus_per_second: 10,
            perfect_bonus_threshold: 90,
        }
    }
}

/// What happened on a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub points: u32,
    pub bonus_points: u32,
    pub perfect: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub entry: ScoreEntry,
    pub report: GameReport,
}

#[derive(Debug, Clone)]
pub struct PlayerSession {
    player_name: String,
    rules: ScoringRules,
    score: u32,
    correct: Vec<bool>,
    question_times: Vec<f64>,
    categories: BTreeSet<String>,
    current_streak: u32,
    longest_streak: u32,
    perfect_answers: u32,
}

impl PlayerSession {
    pub fn start(player_name: impl Into<String>) -> Self {
        Self::with_rules(player_name, ScoringRules::default())
    }

    pub fn with_rules(player_name: impl Into<String>, rules: ScoringRules) -> Self {
        Self {
            player_name: player_name.into(),
            rules,
            score: 0,
            correct: Vec::new(),
            question_times: Vec::new(),
            categories: BTreeSet::new(),
            current_streak: 0,
            longest_streak: 0,
            perfect_answers: 0,
        }
    }

    /// Score `chosen` against `question`, having taken `elapsed_secs` to answer.
    pub fn answer(&mut self, question: &Question, chosen: usize, elapsed_secs: f64) -> AnswerOutcome {
        let correct = question.is_correct(chosen);
        let bonus_points = if correct {
            let remaining = f64::from(question.time_limit) - elapsed_secs;
            if remaining > 0.0 {
                (remaining * f64::from(self.rules.time_bonus_per_second)).round() as u32
            } else {
                0
            }
        } else {
            0
        };
        let points = if correct {
            self.rules.points_per_correct + bonus_points
        } else {
            0
        };
        let perfect = correct && bonus_points >= self.rules.perfect_bonus_threshold;
        self.record(correct, points, perfect, elapsed_secs, &question.category);

        AnswerOutcome {
            correct,
            points,
            bonus_points,
            perfect,
        }
    }

    /// Record an answer that was scored elsewhere.
    pub fn record(&mut self, correct: bool, points: u32, perfect: bool, elapsed_secs: f64, category: &str) {
        self.score = self.score.saturating_add(points);
        self.correct.push(correct);
        self.question_times.push(elapsed_secs.max(0.0));
        if !category.is_empty() {
            self.categories.insert(category.to_string());
        }

        if correct {
            self.current_streak += 1;
            self.longest_streak = self.longest_streak.max(self.current_streak);
            if perfect {
                self.perfect_answers += 1;
            }
        } else {
            self.current_streak = 0;
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn questions_answered(&self) -> u32 {
        self.correct.len() as u32
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct.iter().filter(|c| **c).count() as u32
    }

    pub fn accuracy(&self) -> f64 {
        accuracy_percent(self.correct_answers(), self.questions_answered())
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn perfect_answers(&self) -> u32 {
        self.perfect_answers
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn average_time_per_question(&self) -> f64 {
        if self.question_times.is_empty() {
            return 0.0;
        }
        self.question_times.iter().sum::<f64>() / self.question_times.len() as f64
    }

    /// Snapshot the session into the records every store receives.
    pub fn finish(&self, now: DateTime<Utc>) -> SessionResult {
        let entry = ScoreEntry::new(
            self.player_name.clone(),
            self.score,
            self.questions_answered(),
            self.correct_answers(),
            now,
        );
        let report = GameReport {
            player_name: self.player_name.clone(),
            total_score: self.score,
            questions_answered: entry.questions_answered,
            correct_answers: entry.correct_answers,
            accuracy: entry.accuracy,
            average_time_per_question: self.average_time_per_question(),
            categories_played: self.categories.clone(),
            timestamp: now,
            longest_streak: self.longest_streak,
            perfect_answers: self.perfect_answers,
        };
        SessionResult { entry, report }
    }
}
