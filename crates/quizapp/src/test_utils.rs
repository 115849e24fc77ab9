use crate::api::QuizApi;
use crate::config::QuizConfig;
use crate::init::ensure_data_dirs;
use crate::store::fs_backend::FsBackend;
use crate::store::mem_backend::MemBackend;
use std::path::PathBuf;
use std::rc::Rc;
use tempfile::TempDir;

/// A data root in a temp directory, with the standard subdirectories created.
pub struct TestEnv {
    // Held so the directory lives as long as the env
    pub _temp_dir: TempDir,
    pub backend: Rc<FsBackend>,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        ensure_data_dirs(&root).expect("failed to create data dirs");
        let backend = Rc::new(FsBackend::new(root.clone()));
        Self {
            _temp_dir: temp_dir,
            backend,
            root,
        }
    }

    pub fn api(&self) -> QuizApi<FsBackend> {
        QuizApi::new(Rc::clone(&self.backend), QuizConfig::default())
    }
}

/// An API over a fresh in-memory backend.
pub fn mem_api() -> (Rc<MemBackend>, QuizApi<MemBackend>) {
    let backend = Rc::new(MemBackend::new());
    let api = QuizApi::new(Rc::clone(&backend), QuizConfig::default());
    (backend, api)
}
