//! Question-set storage and the in-memory editing draft.
//!
//! Sets live in `CustomKahoots/<sanitized>.json` as
//! `{ "setName", "theme", "questions": [...] }`. Editing works on a single draft:
//! [`QuestionSetStore::create`] or [`QuestionSetStore::load`] makes one current,
//! question edits apply to it, and [`QuestionSetStore::save`] validates and writes it.

use crate::error::{QuizError, Result};
use crate::model::{sanitize_file_name, Question, QuestionSet};
use crate::paths::CUSTOM_KAHOOTS_DIR;
use crate::store::backend::StorageBackend;
use crate::store::record::{Json, RecordStore};
use std::path::Path;

const JSON_EXT: &str = ".json";

/// Shape checks applied before a set is written.
pub fn validate_set(set: &QuestionSet) -> Result<()> {
    if set.set_name.trim().is_empty() {
        return Err(QuizError::Validation("question set needs a name".to_string()));
    }
    if set.questions.is_empty() {
        return Err(QuizError::Validation(
            "question set needs at least one question".to_string(),
        ));
    }
    for (i, q) in set.questions.iter().enumerate() {
        validate_question(q).map_err(|e| match e {
            QuizError::Validation(msg) => QuizError::Validation(format!("question {}: {}", i + 1, msg)),
            other => other,
        })?;
    }
    Ok(())
}

pub fn validate_question(q: &Question) -> Result<()> {
    if q.question_text.trim().is_empty() {
        return Err(QuizError::Validation("question text is empty".to_string()));
    }
    if q.answers.len() < 2 {
        return Err(QuizError::Validation("needs at least two answers".to_string()));
    }
    if q.correct_answer_index >= q.answers.len() {
        return Err(QuizError::Validation(format!(
            "correct answer index {} is out of range",
            q.correct_answer_index
        )));
    }
    Ok(())
}

pub struct QuestionSetStore<B: StorageBackend> {
    records: RecordStore<B>,
    current: Option<QuestionSet>,
}

impl<B: StorageBackend> QuestionSetStore<B> {
    pub fn new(records: RecordStore<B>) -> Self {
        Self {
            records,
            current: None,
        }
    }

    pub fn file_name_for(set_name: &str) -> String {
        format!("{}{}", sanitize_file_name(set_name), JSON_EXT)
    }

    fn rel(file_name: &str) -> Result<String> {
        if file_name.contains(['/', '\\']) || file_name.contains("..") {
            return Err(QuizError::Validation(format!("invalid file name: {}", file_name)));
        }
        Ok(format!("{}/{}", CUSTOM_KAHOOTS_DIR, file_name))
    }

    /// Start a new, empty draft.
    pub fn create(&mut self, name: &str, theme: &str) {
        self.current = Some(QuestionSet::new(name, theme));
    }

    pub fn current(&self) -> Option<&QuestionSet> {
        self.current.as_ref()
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    fn draft_mut(&mut self) -> Result<&mut QuestionSet> {
        self.current
            .as_mut()
            .ok_or_else(|| QuizError::Validation("no question set is being edited".to_string()))
    }

    pub fn add_question(&mut self, question: Question) -> Result<()> {
        self.draft_mut()?.questions.push(question);
        Ok(())
    }

    pub fn update_question(&mut self, index: usize, question: Question) -> Result<()> {
        let draft = self.draft_mut()?;
        let slot = draft
            .questions
            .get_mut(index)
            .ok_or_else(|| QuizError::Validation(format!("no question at index {}", index)))?;
        *slot = question;
        Ok(())
    }

    pub fn delete_question(&mut self, index: usize) -> Result<Question> {
        let draft = self.draft_mut()?;
        if index >= draft.questions.len() {
            return Err(QuizError::Validation(format!("no question at index {}", index)));
        }
        Ok(draft.questions.remove(index))
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.current.as_ref()?.questions.get(index)
    }

    pub fn question_count(&self) -> usize {
        self.current.as_ref().map_or(0, |s| s.questions.len())
    }

    /// Validate and write the draft. Returns the file name it was saved under.
    pub fn save(&self) -> Result<String> {
        let draft = self
            .current
            .as_ref()
            .ok_or_else(|| QuizError::Validation("no question set is being edited".to_string()))?;
        self.write(draft)
    }

    /// Validate and write a complete set, e.g. one imported from elsewhere.
    pub fn write(&self, set: &QuestionSet) -> Result<String> {
        validate_set(set)?;
        let file_name = Self::file_name_for(&set.set_name);
        self.records
            .save::<Json<QuestionSet>>(&Self::rel(&file_name)?, set)?;
        Ok(file_name)
    }

    /// Read a set without touching the draft.
    ///
    /// A missing file is `NotFound`; a corrupt one is reported and returned as an error.
    pub fn read(&self, file_name: &str) -> Result<QuestionSet> {
        let rel = Self::rel(file_name)?;
        match self.records.try_load::<Json<QuestionSet>>(&rel) {
            Ok(Some(set)) => Ok(set),
            Ok(None) => Err(QuizError::NotFound(file_name.to_string())),
            Err(err) => {
                self.records.errors().report_json_error(
                    &rel,
                    "Could not read the question set",
                    Some(&err),
                );
                Err(err)
            }
        }
    }

    /// Make the stored set `file_name` the current draft.
    pub fn load(&mut self, file_name: &str) -> Result<&QuestionSet> {
        let set = self.read(file_name)?;
        Ok(self.current.insert(set))
    }

    /// File names of the stored sets.
    pub fn list(&self) -> Vec<String> {
        match self.records.backend().list(CUSTOM_KAHOOTS_DIR, JSON_EXT) {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(?err, "could not list question sets");
                Vec::new()
            }
        }
    }

    pub fn delete(&self, file_name: &str) -> bool {
        let Ok(rel) = Self::rel(file_name) else {
            return false;
        };
        match self.records.backend().delete(&rel) {
            Ok(deleted) => deleted,
            Err(err) => {
                tracing::warn!(?err, file_name, "could not delete question set");
                false
            }
        }
    }

    /// Set name and question count; falls back to (file stem, 0) when unreadable.
    pub fn info(&self, file_name: &str) -> (String, usize) {
        let fallback = || {
            let stem = Path::new(file_name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file_name.to_string());
            (stem, 0)
        };
        let Ok(rel) = Self::rel(file_name) else {
            return fallback();
        };
        match self.records.try_load::<Json<QuestionSet>>(&rel) {
            Ok(Some(set)) => (set.set_name, set.questions.len()),
            _ => fallback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_reports::ErrorReporter;
    use crate::store::mem_backend::MemBackend;
    use std::rc::Rc;

    fn store() -> (Rc<MemBackend>, QuestionSetStore<MemBackend>) {
        let backend = Rc::new(MemBackend::new());
        let errors = Rc::new(ErrorReporter::new(Rc::clone(&backend)));
        let records = RecordStore::new(Rc::clone(&backend), errors);
        (backend, QuestionSetStore::new(records))
    }

    fn q(text: &str) -> Question {
        Question::new(text, vec!["yes".into(), "no".into()], 0).with_category("Misc")
    }

    #[test]
    fn create_edit_save_load() {
        let (_b, mut store) = store();
        store.create("My Set", "Football");
        store.add_question(q("one")).unwrap();
        store.add_question(q("two")).unwrap();
        store.add_question(q("three")).unwrap();
        store.update_question(1, q("TWO")).unwrap();
        assert_eq!(store.delete_question(0).unwrap().question_text, "one");
        assert_eq!(store.question_count(), 2);

        let file = store.save().unwrap();
        assert_eq!(file, "My Set.json");

        store.clear_current();
        assert_eq!(store.question_count(), 0);
        let loaded = store.load(&file).unwrap();
        assert_eq!(loaded.set_name, "My Set");
        assert_eq!(loaded.theme, "Football");
        assert_eq!(loaded.questions[0].question_text, "TWO");
        assert_eq!(store.question(1).unwrap().question_text, "three");
    }

    #[test]
    fn saving_an_empty_set_is_a_validation_error() {
        let (backend, mut store) = store();
        store.create("Empty", "");
        assert!(matches!(store.save(), Err(QuizError::Validation(_))));
        assert_eq!(backend.file_count(), 0);
        assert_eq!(store.records.errors().session_reports().len(), 0);
    }

    #[test]
    fn invalid_question_is_rejected() {
        let set = QuestionSet {
            set_name: "S".into(),
            theme: String::new(),
            questions: vec![Question::new("?", vec!["only".into()], 0)],
        };
        let err = validate_set(&set).unwrap_err();
        assert!(err.to_string().contains("question 1"));

        let out_of_range = Question::new("?", vec!["a".into(), "b".into()], 2);
        assert!(validate_question(&out_of_range).is_err());
    }

    #[test]
    fn edits_without_draft_fail() {
        let (_b, mut store) = store();
        assert!(store.add_question(q("x")).is_err());
        assert!(store.save().is_err());
        store.create("S", "");
        assert!(store.update_question(3, q("x")).is_err());
        assert!(store.delete_question(0).is_err());
    }

    #[test]
    fn missing_set_is_not_found_without_report() {
        let (_b, mut store) = store();
        assert!(matches!(store.load("nope.json"), Err(QuizError::NotFound(_))));
        assert!(store.records.errors().session_reports().is_empty());
    }

    #[test]
    fn corrupt_set_is_reported() {
        let (backend, store) = store();
        backend.put_raw("CustomKahoots/bad.json", "{ nope");
        assert!(store.read("bad.json").is_err());
        assert_eq!(store.records.errors().session_reports().len(), 1);
        assert_eq!(store.info("bad.json"), ("bad".to_string(), 0));
    }

    #[test]
    fn list_info_delete() {
        let (_b, mut store) = store();
        store.create("Alpha", "");
        store.add_question(q("a")).unwrap();
        store.save().unwrap();
        store.create("Beta", "");
        store.add_question(q("b")).unwrap();
        store.add_question(q("c")).unwrap();
        store.save().unwrap();

        assert_eq!(store.list(), vec!["Alpha.json".to_string(), "Beta.json".to_string()]);
        assert_eq!(store.info("Beta.json"), ("Beta".to_string(), 2));
        assert!(store.delete("Alpha.json"));
        assert!(!store.delete("Alpha.json"));
        assert!(!store.delete("../leaderboard.json"));
        assert_eq!(store.list(), vec!["Beta.json".to_string()]);
    }
}
