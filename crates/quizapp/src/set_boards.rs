//! # Per-Question-Set Leaderboards
//!
//! Each question set has its own ranked list in `Leaderboards/<sanitized>.xml`:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Leaderboard kahoot="Inazuma Eleven">
//!   <Entry>
//!     <PlayerName>Alice</PlayerName>
//!     <Score>500</Score>
//!     <Accuracy>80.00</Accuracy>
//!     <Date>2024-03-14T09:26:00Z</Date>
//!     <QuestionsAnswered>10</QuestionsAnswered>
//!     <CorrectAnswers>8</CorrectAnswers>
//!   </Entry>
//! </Leaderboard>
//! ```
//!
//! Same ordering rule as the global board, with its own retention cap. Boards
//! are read from disk on every query; nothing is cached between calls.
//!
//! A document that is not well-formed, or has no `Leaderboard` root, yields an
//! empty board for that set only (and an `XML_PARSE` error report). A single
//! `Entry` with an unparsable number is skipped and the rest of the board is kept.

use crate::error::{QuizError, Result};
use crate::error_reports::ErrorKind;
use crate::leaderboard::{best_of, rank, rank_of};
use crate::model::{parse_timestamp, sanitize_file_name, ScoreEntry};
use crate::paths::LEADERBOARDS_DIR;
use crate::store::backend::StorageBackend;
use crate::store::record::{RecordCodec, RecordStore};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;
use std::io::Write;

pub const DEFAULT_CAP: usize = 100;

const ROOT: &str = "Leaderboard";
const ENTRY: &str = "Entry";
const SET_ATTR: &str = "kahoot";
const XML_EXT: &str = ".xml";

/// Contents of one per-set leaderboard file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SetBoardFile {
    pub set_name: String,
    pub entries: Vec<ScoreEntry>,
}

pub struct XmlBoard;

impl RecordCodec for XmlBoard {
    type Collection = SetBoardFile;

    const ERROR_KIND: ErrorKind = ErrorKind::XmlParse;

    fn decode(text: &str) -> Result<SetBoardFile> {
        decode_board(text)
    }

    fn encode(board: &SetBoardFile) -> Result<String> {
        encode_board(board)
    }
}

fn decode_board(text: &str) -> Result<SetBoardFile> {
    // Field text is kept verbatim; indentation between elements is never at field depth.
    let mut reader = Reader::from_str(text);

    let mut board = SetBoardFile::default();
    let mut saw_root = false;
    let mut stack: Vec<String> = Vec::new();
    let mut fields: HashMap<String, String> = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if stack.is_empty() {
                    open_root(&mut board, &mut saw_root, &name, &e)?;
                } else if stack.len() == 1 && name == ENTRY {
                    fields.clear();
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if stack.is_empty() {
                    open_root(&mut board, &mut saw_root, &name, &e)?;
                } else if stack.len() == 2 && stack[1] == ENTRY {
                    fields.insert(name, String::new());
                }
            }
            Event::Text(t) => {
                if stack.len() == 3 && stack[1] == ENTRY {
                    let value = t.unescape()?;
                    fields.entry(stack[2].clone()).or_default().push_str(&value);
                }
            }
            Event::End(_) => {
                let closed = stack.pop();
                if stack.len() == 1 && closed.as_deref() == Some(ENTRY) {
                    match entry_from_fields(&fields) {
                        Ok(entry) => board.entries.push(entry),
                        Err(reason) => {
                            tracing::warn!(set = %board.set_name, %reason, "skipping leaderboard entry")
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(QuizError::Malformed(format!("missing <{}> root element", ROOT)));
    }
    if !stack.is_empty() {
        return Err(QuizError::Malformed("unexpected end of document".to_string()));
    }
    Ok(board)
}

fn open_root(board: &mut SetBoardFile, saw_root: &mut bool, name: &str, e: &BytesStart<'_>) -> Result<()> {
    if *saw_root || name != ROOT {
        return Err(QuizError::Malformed(format!(
            "expected a single <{}> root, found <{}>",
            ROOT, name
        )));
    }
    *saw_root = true;
    if let Some(attr) = e
        .try_get_attribute(SET_ATTR)
        .map_err(quick_xml::Error::from)?
    {
        board.set_name = attr.unescape_value()?.into_owned();
    }
    Ok(())
}

fn entry_from_fields(fields: &HashMap<String, String>) -> std::result::Result<ScoreEntry, String> {
    fn number(fields: &HashMap<String, String>, key: &str) -> std::result::Result<u32, String> {
        match fields.get(key).map(|v| v.trim()) {
            None | Some("") => Ok(0),
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("{} is not a number: {:?}", key, raw)),
        }
    }

    let player_name = fields
        .get("PlayerName")
        .filter(|n| !n.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string());
    let timestamp = fields
        .get("Date")
        .and_then(|d| parse_timestamp(d))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    Ok(ScoreEntry::new(
        player_name,
        number(fields, "Score")?,
        number(fields, "QuestionsAnswered")?,
        number(fields, "CorrectAnswers")?,
        timestamp,
    ))
}

fn encode_board(board: &SetBoardFile) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new(ROOT);
    root.push_attribute((SET_ATTR, board.set_name.as_str()));
    writer.write_event(Event::Start(root))?;

    for entry in &board.entries {
        writer.write_event(Event::Start(BytesStart::new(ENTRY)))?;
        write_field(&mut writer, "PlayerName", &entry.player_name)?;
        write_field(&mut writer, "Score", &entry.score.to_string())?;
        write_field(&mut writer, "Accuracy", &format!("{:.2}", entry.accuracy))?;
        write_field(
            &mut writer,
            "Date",
            &entry.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )?;
        write_field(
            &mut writer,
            "QuestionsAnswered",
            &entry.questions_answered.to_string(),
        )?;
        write_field(&mut writer, "CorrectAnswers", &entry.correct_answers.to_string())?;
        writer.write_event(Event::End(BytesEnd::new(ENTRY)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
    String::from_utf8(writer.into_inner()).map_err(|e| QuizError::Malformed(e.to_string()))
}

fn write_field<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Summary of one set's board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetStatistics {
    pub total_games: usize,
    pub average_score: f64,
    pub highest_score: u32,
    pub average_accuracy: f64,
}

pub struct SetLeaderboards<B: StorageBackend> {
    records: RecordStore<B>,
    cap: usize,
}

impl<B: StorageBackend> SetLeaderboards<B> {
    pub fn new(records: RecordStore<B>, cap: usize) -> Self {
        Self { records, cap }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Relative path of the board file for `set_name`.
    pub fn board_path(set_name: &str) -> String {
        format!("{}/{}{}", LEADERBOARDS_DIR, sanitize_file_name(set_name), XML_EXT)
    }

    /// Add one result to `set_name`'s board and save it.
    ///
    /// A board that failed to load is replaced by a fresh one holding this entry.
    pub fn save_entry(&self, set_name: &str, entry: ScoreEntry) -> Result<()> {
        if set_name.trim().is_empty() {
            return Err(QuizError::Validation(
                "question set name cannot be empty".to_string(),
            ));
        }
        let path = Self::board_path(set_name);
        let mut board = self.records.load::<XmlBoard>(&path);
        board.set_name = set_name.to_string();
        tracing::debug!(set = set_name, player = %entry.player_name, score = entry.score, "adding set score");
        board.entries.push(entry);
        rank(&mut board.entries, self.cap);
        self.records.save::<XmlBoard>(&path, &board)
    }

    /// Ranked entries for `set_name`; empty when the set has no board yet.
    pub fn load_leaderboard(&self, set_name: &str) -> Vec<ScoreEntry> {
        if set_name.trim().is_empty() {
            return Vec::new();
        }
        let mut entries = self
            .records
            .load::<XmlBoard>(&Self::board_path(set_name))
            .entries;
        rank(&mut entries, self.cap);
        entries
    }

    pub fn top_scores(&self, set_name: &str, n: usize) -> Vec<ScoreEntry> {
        let mut entries = self.load_leaderboard(set_name);
        entries.truncate(n);
        entries
    }

    pub fn player_rank(&self, set_name: &str, name: &str) -> Option<usize> {
        rank_of(&self.load_leaderboard(set_name), name)
    }

    pub fn player_best_score(&self, set_name: &str, name: &str) -> Option<ScoreEntry> {
        best_of(&self.load_leaderboard(set_name), name).cloned()
    }

    /// Sanitized names of the sets that have a board file.
    pub fn available_leaderboards(&self) -> Vec<String> {
        match self.records.backend().list(LEADERBOARDS_DIR, XML_EXT) {
            Ok(names) => names
                .into_iter()
                .filter_map(|n| n.strip_suffix(XML_EXT).map(str::to_string))
                .collect(),
            Err(err) => {
                tracing::warn!(?err, "could not list leaderboards");
                Vec::new()
            }
        }
    }

    /// Delete `set_name`'s board. Returns whether a file was removed.
    pub fn clear(&self, set_name: &str) -> bool {
        let path = Self::board_path(set_name);
        match self.records.backend().delete(&path) {
            Ok(removed) => removed,
            Err(err) => {
                tracing::warn!(?err, file = %path, "could not delete leaderboard");
                false
            }
        }
    }

    /// Delete every per-set board. Returns how many were removed.
    pub fn clear_all(&self) -> usize {
        self.available_leaderboards()
            .iter()
            .filter(|stem| {
                let path = format!("{}/{}{}", LEADERBOARDS_DIR, stem, XML_EXT);
                self.records.backend().delete(&path).unwrap_or(false)
            })
            .count()
    }

    pub fn set_statistics(&self, set_name: &str) -> SetStatistics {
        let entries = self.load_leaderboard(set_name);
        if entries.is_empty() {
            return SetStatistics::default();
        }
        let n = entries.len() as f64;
        SetStatistics {
            total_games: entries.len(),
            average_score: entries.iter().map(|e| f64::from(e.score)).sum::<f64>() / n,
            highest_score: entries.iter().map(|e| e.score).max().unwrap_or(0),
            average_accuracy: entries.iter().map(|e| e.accuracy).sum::<f64>() / n,
        }
    }
}
