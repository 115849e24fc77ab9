//! # Game Report Store
//!
//! Chronological log of [`GameReport`]s in `reports.json` (`{ "reports": [...] }`).
//!
//! Reports are appended in arrival order. When the log grows past its cap (1000 by
//! default) the reports with the oldest timestamps are dropped, exactly as many as
//! needed. Queries return reports newest first; reports sharing a timestamp keep
//! their append order.

use crate::error::Result;
use crate::model::GameReport;
use crate::paths::REPORTS_FILE;
use crate::session::PlayerSession;
use crate::store::backend::StorageBackend;
use crate::store::record::{Json, RecordStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAP: usize = 1000;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsFile {
    pub reports: Vec<GameReport>,
}

/// Drop the oldest reports until at most `cap` remain, keeping append order.
fn prune_oldest(reports: &mut Vec<GameReport>, cap: usize) {
    if reports.len() <= cap {
        return;
    }
    let excess = reports.len() - cap;
    let mut by_age: Vec<usize> = (0..reports.len()).collect();
    by_age.sort_by_key(|&i| reports[i].timestamp);
    let mut doomed = vec![false; reports.len()];
    for &i in &by_age[..excess] {
        doomed[i] = true;
    }
    let mut index = 0;
    reports.retain(|_| {
        let keep = !doomed[index];
        index += 1;
        keep
    });
}

fn newest_first<'a>(reports: impl Iterator<Item = &'a GameReport>) -> Vec<&'a GameReport> {
    let mut sorted: Vec<&GameReport> = reports.collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}

pub struct ReportStore<B: StorageBackend> {
    records: RecordStore<B>,
    cap: usize,
    reports: Vec<GameReport>,
}

impl<B: StorageBackend> ReportStore<B> {
    pub fn open(records: RecordStore<B>, cap: usize) -> Self {
        let mut reports = records.load::<Json<ReportsFile>>(REPORTS_FILE).reports;
        prune_oldest(&mut reports, cap);
        Self {
            records,
            cap,
            reports,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Build a report from `session` as of now and store it.
    pub fn save_report(&mut self, session: &PlayerSession) -> Result<()> {
        let report = session.finish(Utc::now()).report;
        self.add_report(report)
    }

    /// Store an already-built report.
    pub fn add_report(&mut self, report: GameReport) -> Result<()> {
        tracing::debug!(player = %report.player_name, score = report.total_score, "adding game report");
        self.reports.push(report);
        prune_oldest(&mut self.reports, self.cap);
        self.save()
    }

    /// Reports in append order.
    pub fn all_reports(&self) -> &[GameReport] {
        &self.reports
    }

    pub fn player_reports(&self, name: &str) -> Vec<&GameReport> {
        newest_first(self.reports.iter().filter(|r| r.is_player(name)))
    }

    pub fn recent_reports(&self, n: usize) -> Vec<&GameReport> {
        let mut recent = newest_first(self.reports.iter());
        recent.truncate(n);
        recent
    }

    pub fn last_report(&self) -> Option<&GameReport> {
        newest_first(self.reports.iter()).into_iter().next()
    }

    pub fn total_games(&self) -> usize {
        self.reports.len()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.reports.clear();
        self.save()
    }

    fn save(&self) -> Result<()> {
        let file = ReportsFile {
            reports: self.reports.clone(),
        };
        self.records.save::<Json<ReportsFile>>(REPORTS_FILE, &file)
    }
}
