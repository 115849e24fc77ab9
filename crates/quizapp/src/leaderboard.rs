//! # Global Leaderboard
//!
//! One ranked list of [`ScoreEntry`] across every game, stored in
//! `leaderboard.json` as `{ "entries": [...] }`.
//!
//! ## Ordering and Retention
//!
//! - Entries are kept sorted by score, highest first.
//! - The sort is stable: equal scores keep their insertion order, so the first
//!   player to reach a score ranks above later ones.
//! - After every insert the list is truncated to the retention cap (100 by default).
//!
//! Every [`Leaderboard::add_score`] saves the whole file. If the save fails the
//! in-memory list stays authoritative until the next successful save.

use crate::error::Result;
use crate::model::ScoreEntry;
use crate::paths::GLOBAL_LEADERBOARD_FILE;
use crate::store::backend::StorageBackend;
use crate::store::record::{Json, RecordStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_CAP: usize = 100;
pub const DEFAULT_TOP: usize = 10;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardFile {
    pub entries: Vec<ScoreEntry>,
}

/// Sort highest score first (stable) and drop whatever exceeds `cap`.
pub(crate) fn rank(entries: &mut Vec<ScoreEntry>, cap: usize) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(cap);
}

/// 1-based position of the first entry for `name`.
pub(crate) fn rank_of(entries: &[ScoreEntry], name: &str) -> Option<usize> {
    entries.iter().position(|e| e.is_player(name)).map(|i| i + 1)
}

pub(crate) fn best_of<'a>(entries: &'a [ScoreEntry], name: &str) -> Option<&'a ScoreEntry> {
    // Entries are ranked, so the first match is the best one.
    entries.iter().find(|e| e.is_player(name))
}

pub struct Leaderboard<B: StorageBackend> {
    records: RecordStore<B>,
    cap: usize,
    entries: Vec<ScoreEntry>,
}

impl<B: StorageBackend> Leaderboard<B> {
    /// Load the global leaderboard, falling back to an empty one.
    pub fn open(records: RecordStore<B>, cap: usize) -> Self {
        let mut entries = records
            .load::<Json<LeaderboardFile>>(GLOBAL_LEADERBOARD_FILE)
            .entries;
        rank(&mut entries, cap);
        Self {
            records,
            cap,
            entries,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Insert `entry` and save. Returns its 1-based position, or `None` when the
    /// cap dropped it.
    pub fn add_score(&mut self, entry: ScoreEntry) -> Result<Option<usize>> {
        tracing::debug!(player = %entry.player_name, score = entry.score, "adding global score");
        // Stable sort puts the new entry after every existing one with an equal or higher score.
        let position = self.entries.iter().filter(|e| e.score >= entry.score).count() + 1;
        self.entries.push(entry);
        rank(&mut self.entries, self.cap);
        self.save()?;
        Ok((position <= self.cap).then_some(position))
    }

    pub fn top_scores(&self, n: usize) -> &[ScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn all_entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn player_rank(&self, name: &str) -> Option<usize> {
        rank_of(&self.entries, name)
    }

    pub fn player_best_score(&self, name: &str) -> Option<&ScoreEntry> {
        best_of(&self.entries, name)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    pub fn total_games(&self) -> usize {
        self.entries.len()
    }

    pub fn average_score(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: u64 = self.entries.iter().map(|e| u64::from(e.score)).sum();
        total as f64 / self.entries.len() as f64
    }

    pub fn highest_score(&self) -> u32 {
        self.entries.iter().map(|e| e.score).max().unwrap_or(0)
    }

    /// Games per player name, as stored.
    pub fn player_game_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.player_name.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn player_average_score(&self, name: &str) -> f64 {
        let scores: Vec<u64> = self
            .entries
            .iter()
            .filter(|e| e.is_player(name))
            .map(|e| u64::from(e.score))
            .collect();
        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<u64>() as f64 / scores.len() as f64
    }

    fn save(&self) -> Result<()> {
        let file = LeaderboardFile {
            entries: self.entries.clone(),
        };
        self.records
            .save::<Json<LeaderboardFile>>(GLOBAL_LEADERBOARD_FILE, &file)
    }
}
