//! # Error-Reporting Sink
//!
//! When a store fails to read, parse or write one of its files it hands the
//! failure to [`ErrorReporter`]. Each failure becomes one human-readable text file
//! under `ErrorReports/`, named `ErrorReport_<yyyyMMdd_HHmmss>.txt` and written
//! immediately. The sink never fails its caller: if the report itself cannot be
//! written, that is logged and the store carries on with its fallback.
//!
//! The reporter also keeps the reports raised during this process in memory, so a
//! UI can show "what went wrong this session" without rescanning the directory.
//!
//! Management operations ([`ErrorReporter::list`], [`ErrorReporter::read`],
//! [`ErrorReporter::delete`], [`ErrorReporter::clear_all`]) work on the files and
//! are each fail-safe.

use crate::error::QuizError;
use crate::paths::ERROR_REPORTS_DIR;
use crate::store::backend::StorageBackend;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::error::Error as _;
use std::fmt;
use std::rc::Rc;

const RULE: &str = "=======================================================";
const FILE_PREFIX: &str = "ErrorReport_";
const FILE_EXT: &str = ".txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    JsonParse,
    XmlParse,
    General,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::JsonParse => "JSON_PARSE",
            ErrorKind::XmlParse => "XML_PARSE",
            ErrorKind::General => "GENERAL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    /// The chain of underlying causes, outermost first.
    pub trace: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// File or operation the failure relates to.
    pub context: String,
    pub notes: Option<String>,
    pub file_name: String,
}

pub struct ErrorReporter<B: StorageBackend> {
    backend: Rc<B>,
    session: RefCell<Vec<ErrorReport>>,
}

impl<B: StorageBackend> ErrorReporter<B> {
    pub fn new(backend: Rc<B>) -> Self {
        Self {
            backend,
            session: RefCell::new(Vec::new()),
        }
    }

    /// A JSON file could not be read or parsed.
    pub fn report_json_error(&self, path: &str, description: &str, cause: Option<&QuizError>) -> ErrorReport {
        self.report(
            ErrorKind::JsonParse,
            path,
            description,
            cause,
            Some("Probable cause: malformed JSON or a corrupt file"),
        )
    }

    /// An XML file could not be read or parsed.
    pub fn report_xml_error(&self, path: &str, description: &str, cause: Option<&QuizError>) -> ErrorReport {
        self.report(
            ErrorKind::XmlParse,
            path,
            description,
            cause,
            Some("An empty leaderboard is shown as fallback"),
        )
    }

    /// Any other system fault, including failed writes.
    pub fn report_general_error(&self, context: &str, description: &str, cause: Option<&QuizError>) -> ErrorReport {
        self.report(ErrorKind::General, context, description, cause, None)
    }

    /// Record one failure and write it out. Never fails.
    pub fn report(
        &self,
        kind: ErrorKind,
        context: &str,
        message: &str,
        cause: Option<&QuizError>,
        notes: Option<&str>,
    ) -> ErrorReport {
        let timestamp = Utc::now();
        let report = ErrorReport {
            kind,
            message: message.to_string(),
            trace: cause.map(source_chain),
            timestamp,
            context: context.to_string(),
            notes: notes.map(str::to_string),
            file_name: self.next_file_name(timestamp),
        };

        tracing::error!(%kind, context, message, "recording error report");

        let body = render_report(&report, cause, &self.location());
        let rel = format!("{}/{}", ERROR_REPORTS_DIR, report.file_name);
        if let Err(err) = self.backend.write_text(&rel, &body) {
            tracing::warn!(?err, file = %report.file_name, "could not write error report");
        }

        self.session.borrow_mut().push(report.clone());
        report
    }

    /// Reports raised since this reporter was created, oldest first.
    pub fn session_reports(&self) -> Vec<ErrorReport> {
        self.session.borrow().clone()
    }

    /// Error report file names, newest first.
    pub fn list(&self) -> Vec<String> {
        match self.backend.list(ERROR_REPORTS_DIR, FILE_EXT) {
            Ok(names) => {
                let mut names: Vec<String> = names
                    .into_iter()
                    .filter(|n| n.starts_with(FILE_PREFIX))
                    .collect();
                names.sort();
                names.reverse();
                names
            }
            Err(err) => {
                tracing::warn!(?err, "could not list error reports");
                Vec::new()
            }
        }
    }

    /// Content of one report, None if it does not exist or cannot be read.
    pub fn read(&self, file_name: &str) -> Option<String> {
        let rel = report_path(file_name)?;
        match self.backend.read_text(&rel) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(?err, file_name, "could not read error report");
                None
            }
        }
    }

    pub fn delete(&self, file_name: &str) -> bool {
        let Some(rel) = report_path(file_name) else {
            return false;
        };
        match self.backend.delete(&rel) {
            Ok(deleted) => {
                if deleted {
                    self.session
                        .borrow_mut()
                        .retain(|r| r.file_name != file_name);
                }
                deleted
            }
            Err(err) => {
                tracing::warn!(?err, file_name, "could not delete error report");
                false
            }
        }
    }

    /// Delete every report file. Returns how many were removed.
    pub fn clear_all(&self) -> usize {
        let removed = self
            .list()
            .iter()
            .filter(|name| self.delete(name))
            .count();
        self.session.borrow_mut().clear();
        removed
    }

    fn location(&self) -> String {
        self.backend
            .full_path(ERROR_REPORTS_DIR)
            .display()
            .to_string()
    }

    /// Named after the local wall-clock time; the record keeps the UTC instant.
    fn next_file_name(&self, timestamp: DateTime<Utc>) -> String {
        let local = timestamp.with_timezone(&Local);
        let stem = format!("{}{}", FILE_PREFIX, local.format("%Y%m%d_%H%M%S"));
        let taken = |name: &str| {
            self.backend
                .exists(&format!("{}/{}", ERROR_REPORTS_DIR, name))
                || self.session.borrow().iter().any(|r| r.file_name == name)
        };

        let first = format!("{}{}", stem, FILE_EXT);
        if !taken(&first) {
            return first;
        }
        (2..)
            .map(|n| format!("{}_{}{}", stem, n, FILE_EXT))
            .find(|name| !taken(name))
            .unwrap_or(first)
    }
}

fn report_path(file_name: &str) -> Option<String> {
    let valid = file_name.starts_with(FILE_PREFIX)
        && file_name.ends_with(FILE_EXT)
        && !file_name.contains(['/', '\\'])
        && !file_name.contains("..");
    valid.then(|| format!("{}/{}", ERROR_REPORTS_DIR, file_name))
}

fn source_chain(err: &QuizError) -> String {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        lines.push(format!("caused by: {}", inner));
        source = inner.source();
    }
    lines.join("\n")
}

fn render_report(report: &ErrorReport, cause: Option<&QuizError>, location: &str) -> String {
    let (cause_type, cause_message) = match cause {
        Some(err) => (err.cause_kind().to_string(), err.to_string()),
        None => ("N/A".to_string(), "N/A".to_string()),
    };

    let mut out = String::new();
    out.push_str(RULE);
    out.push_str("\n           ERROR REPORT - QUIZ\n");
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str(&format!(
        "Date and time: {}\n",
        report.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("Error type: {}\n\n", report.kind));
    out.push_str("DESCRIPTION:\n");
    out.push_str(&format!("{}\n\n", report.message));
    out.push_str("CAUSE:\n");
    out.push_str(&format!("Type: {}\nMessage: {}\n\n", cause_type, cause_message));
    out.push_str("ADDITIONAL INFORMATION:\n");
    out.push_str(&format!("Context: {}\n", report.context));
    if let Some(notes) = &report.notes {
        out.push_str(&format!("Note: {}\n", notes));
    }
    out.push('\n');
    out.push_str("TRACE:\n");
    out.push_str(report.trace.as_deref().unwrap_or("No trace available"));
    out.push_str("\n\n");
    out.push_str(RULE);
    out.push_str("\nThis report was generated automatically.\n");
    out.push_str(&format!("Location: {}/\n", location));
    out.push_str(RULE);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn reporter() -> (Rc<MemBackend>, ErrorReporter<MemBackend>) {
        let backend = Rc::new(MemBackend::new());
        let reporter = ErrorReporter::new(Rc::clone(&backend));
        (backend, reporter)
    }

    #[test]
    fn report_writes_one_file_with_template() {
        let (backend, reporter) = reporter();
        let cause = QuizError::Malformed("missing entries".into());
        let report = reporter.report_json_error("leaderboard.json", "could not parse", Some(&cause));

        assert_eq!(report.kind, ErrorKind::JsonParse);
        assert!(report.file_name.starts_with("ErrorReport_"));
        assert_eq!(backend.file_count(), 1);

        let body = reporter.read(&report.file_name).unwrap();
        assert!(body.contains("ERROR REPORT"));
        assert!(body.contains("Error type: JSON_PARSE"));
        assert!(body.contains("could not parse"));
        assert!(body.contains("Type: MalformedData"));
        assert!(body.contains("Context: leaderboard.json"));
    }

    #[test]
    fn file_name_uses_local_time() {
        let (_backend, reporter) = reporter();
        let report = reporter.report_general_error("x", "boom", None);
        let local = report.timestamp.with_timezone(&Local);
        let expected = format!("ErrorReport_{}.txt", local.format("%Y%m%d_%H%M%S"));
        assert_eq!(report.file_name, expected);
    }

    #[test]
    fn same_second_reports_get_distinct_names() {
        let (_backend, reporter) = reporter();
        let a = reporter.report_general_error("x", "first", None);
        let b = reporter.report_general_error("x", "second", None);
        let c = reporter.report_general_error("x", "third", None);
        assert_ne!(a.file_name, b.file_name);
        assert_ne!(b.file_name, c.file_name);
        assert_eq!(reporter.list().len(), 3);
        assert_eq!(reporter.session_reports().len(), 3);
    }

    #[test]
    fn write_failure_is_swallowed() {
        let (backend, reporter) = reporter();
        backend.set_simulate_write_error(true);
        let report = reporter.report_xml_error("Leaderboards/a.xml", "bad", None);
        assert_eq!(report.kind, ErrorKind::XmlParse);
        assert!(reporter.list().is_empty());
        assert_eq!(reporter.session_reports().len(), 1);
    }

    #[test]
    fn delete_and_clear() {
        let (_backend, reporter) = reporter();
        let a = reporter.report_general_error("x", "one", None);
        reporter.report_general_error("x", "two", None);

        assert!(reporter.delete(&a.file_name));
        assert!(!reporter.delete(&a.file_name));
        assert_eq!(reporter.list().len(), 1);
        assert_eq!(reporter.session_reports().len(), 1);

        assert_eq!(reporter.clear_all(), 1);
        assert!(reporter.list().is_empty());
        assert!(reporter.session_reports().is_empty());
    }

    #[test]
    fn rejects_paths_outside_the_report_dir() {
        let (backend, reporter) = reporter();
        backend.put_raw("leaderboard.json", "{}");
        assert_eq!(reporter.read("../leaderboard.json"), None);
        assert!(!reporter.delete("../leaderboard.json"));
        assert_eq!(reporter.read("ErrorReport_missing.txt"), None);
    }

    #[test]
    fn list_is_newest_first() {
        let (backend, reporter) = reporter();
        backend.put_raw("ErrorReports/ErrorReport_20240101_000000.txt", "old");
        backend.put_raw("ErrorReports/ErrorReport_20250101_000000.txt", "new");
        backend.put_raw("ErrorReports/notes.txt", "ignored");
        assert_eq!(
            reporter.list(),
            vec![
                "ErrorReport_20250101_000000.txt".to_string(),
                "ErrorReport_20240101_000000.txt".to_string(),
            ]
        );
    }

    #[test]
    fn trace_includes_source_chain() {
        let (_backend, reporter) = reporter();
        let cause = QuizError::Write {
            path: "reports.json".into(),
            source: Box::new(QuizError::Store("disk full".into())),
        };
        let report = reporter.report_general_error("reports.json", "save failed", Some(&cause));
        let trace = report.trace.unwrap();
        assert!(trace.contains("caused by: Store error: disk full"));
    }
}
