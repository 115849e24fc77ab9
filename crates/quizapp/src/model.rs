//! # Domain Model: Scores, Reports and Question Sets
//!
//! This module defines the records that quizapp persists: [`ScoreEntry`] (one
//! ranked result), [`GameReport`] (the richer per-game summary used for
//! statistics) and the question-set definitions [`Question`] / [`QuestionSet`].
//!
//! ## Timestamps
//!
//! Records carry a UTC `timestamp` serialized as RFC 3339. Ordering and pruning
//! compare that value directly, never a formatted display string.
//!
//! Older data files only carry a `date` display string (`dd/MM/yyyy HH:mm` or
//! `dd/MM/yyyy HH:mm:ss`). Those are still accepted on load:
//!
//! 1. `timestamp` present → used as-is.
//! 2. `date` present and parseable in one of the legacy formats → interpreted as UTC.
//! 3. Anything else → the Unix epoch, so the record sorts as the oldest.
//!
//! A bad legacy date never fails the whole load.
//!
//! ## Accuracy
//!
//! Accuracy is always derived from the counts via [`accuracy_percent`]; the stored
//! value is written for human readers but recomputed on load.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

const LEGACY_DATE_FORMATS: [&str; 2] = ["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];

/// Percentage of correct answers, `0.0` when nothing was answered.
pub fn accuracy_percent(correct: u32, answered: u32) -> f64 {
    if answered == 0 {
        return 0.0;
    }
    f64::from(correct) / f64::from(answered) * 100.0
}

/// Parse a timestamp as written by this crate or by older releases.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    LEGACY_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn resolve_timestamp(timestamp: Option<DateTime<Utc>>, date: Option<&str>) -> DateTime<Utc> {
    timestamp
        .or_else(|| date.and_then(parse_timestamp))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// One player's result from a single completed game, used for ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: u32,
    pub accuracy: f64,
    pub timestamp: DateTime<Utc>,
    pub questions_answered: u32,
    pub correct_answers: u32,
}

impl ScoreEntry {
    pub fn new(
        player_name: impl Into<String>,
        score: u32,
        questions_answered: u32,
        correct_answers: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let correct_answers = correct_answers.min(questions_answered);
        Self {
            player_name: player_name.into(),
            score,
            accuracy: accuracy_percent(correct_answers, questions_answered),
            timestamp,
            questions_answered,
            correct_answers,
        }
    }

    pub fn is_player(&self, name: &str) -> bool {
        same_player(&self.player_name, name)
    }
}

// Accepts both the current layout and legacy files keyed by `date`.
impl<'de> Deserialize<'de> for ScoreEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            player_name: String,
            #[serde(default)]
            score: u32,
            #[serde(default)]
            timestamp: Option<DateTime<Utc>>,
            #[serde(default)]
            date: Option<String>,
            #[serde(default)]
            questions_answered: u32,
            #[serde(default)]
            correct_answers: u32,
        }

        let raw = Raw::deserialize(deserializer)?;
        let timestamp = resolve_timestamp(raw.timestamp, raw.date.as_deref());
        Ok(ScoreEntry::new(
            raw.player_name,
            raw.score,
            raw.questions_answered,
            raw.correct_answers,
            timestamp,
        ))
    }
}

/// Full summary of one completed game session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameReport {
    pub player_name: String,
    pub total_score: u32,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub accuracy: f64,
    pub average_time_per_question: f64,
    pub categories_played: BTreeSet<String>,
    pub timestamp: DateTime<Utc>,
    pub longest_streak: u32,
    pub perfect_answers: u32,
}

impl GameReport {
    pub fn is_player(&self, name: &str) -> bool {
        same_player(&self.player_name, name)
    }
}

impl<'de> Deserialize<'de> for GameReport {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            player_name: String,
            #[serde(default)]
            total_score: u32,
            #[serde(default)]
            questions_answered: u32,
            #[serde(default)]
            correct_answers: u32,
            #[serde(default)]
            average_time_per_question: f64,
            #[serde(default)]
            categories_played: BTreeSet<String>,
            #[serde(default)]
            timestamp: Option<DateTime<Utc>>,
            #[serde(default)]
            date: Option<String>,
            #[serde(default)]
            longest_streak: u32,
            #[serde(default)]
            perfect_answers: u32,
        }

        let raw = Raw::deserialize(deserializer)?;
        let correct_answers = raw.correct_answers.min(raw.questions_answered);
        Ok(GameReport {
            timestamp: resolve_timestamp(raw.timestamp, raw.date.as_deref()),
            accuracy: accuracy_percent(correct_answers, raw.questions_answered),
            player_name: raw.player_name,
            total_score: raw.total_score,
            questions_answered: raw.questions_answered,
            correct_answers,
            average_time_per_question: raw.average_time_per_question.max(0.0),
            categories_played: raw.categories_played,
            longest_streak: raw.longest_streak,
            perfect_answers: raw.perfect_answers,
        })
    }
}

/// Case-insensitive player-name comparison used by every lookup.
pub fn same_player(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn default_category() -> String {
    "General".to_string()
}

fn default_time_limit() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_text: String,
    pub answers: Vec<String>,
    pub correct_answer_index: usize,
    #[serde(default = "default_category")]
    pub category: String,
    /// Seconds allowed to answer.
    #[serde(default = "default_time_limit")]
    pub time_limit: u32,
}

impl Question {
    pub fn new(text: impl Into<String>, answers: Vec<String>, correct_answer_index: usize) -> Self {
        Self {
            question_text: text.into(),
            answers,
            correct_answer_index,
            category: default_category(),
            time_limit: default_time_limit(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.time_limit = seconds;
        self
    }

    pub fn is_correct(&self, answer_index: usize) -> bool {
        answer_index == self.correct_answer_index
    }

    pub fn correct_answer(&self) -> Option<&str> {
        self.answers
            .get(self.correct_answer_index)
            .map(String::as_str)
    }
}

/// A named collection of questions ("Kahoot").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSet {
    pub set_name: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(set_name: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            set_name: set_name.into(),
            theme: theme.into(),
            questions: Vec::new(),
        }
    }
}

/// Replace characters that are not allowed in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
