use super::backend::StorageBackend;
use crate::error::{QuizError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since quizapp is single-threaded.
/// This allows the `StorageBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    files: RefCell<BTreeMap<String, String>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Test helper to plant raw (possibly corrupt) content, bypassing codecs.
    pub fn put_raw(&self, rel: &str, content: &str) {
        self.files
            .borrow_mut()
            .insert(rel.to_string(), content.to_string());
    }

    pub fn file_count(&self) -> usize {
        self.files.borrow().len()
    }
}

impl StorageBackend for MemBackend {
    fn read_text(&self, rel: &str) -> Result<Option<String>> {
        Ok(self.files.borrow().get(rel).cloned())
    }

    fn write_text(&self, rel: &str, content: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(QuizError::Store("Simulated write error".to_string()));
        }
        self.files
            .borrow_mut()
            .insert(rel.to_string(), content.to_string());
        Ok(())
    }

    fn delete(&self, rel: &str) -> Result<bool> {
        Ok(self.files.borrow_mut().remove(rel).is_some())
    }

    fn list(&self, dir: &str, extension: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let names = self
            .files
            .borrow()
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|name| !name.contains('/') && name.ends_with(extension))
            .map(str::to_string)
            .collect();
        Ok(names)
    }

    fn exists(&self, rel: &str) -> bool {
        self.files.borrow().contains_key(rel)
    }

    fn full_path(&self, rel: &str) -> PathBuf {
        PathBuf::from("/mem").join(rel)
    }
}
