//! # Data Root
//!
//! All quiz files live under one directory, resolved during [`initialize`]:
//!
//! 1. `QUIZ_DATA` environment variable, if set. Tests use it to isolate state.
//! 2. The `data_override` argument (the CLI `--data` flag).
//! 3. The OS data directory for the app (via the `directories` crate).
//!
//! Initialization creates the fixed subdirectories (see [`crate::paths`]) and loads
//! `quiz.toml` from the root. A missing config file is not an error.

use crate::api::QuizApi;
use crate::config::QuizConfig;
use crate::error::{QuizError, Result};
use crate::paths::DATA_DIRS;
use crate::store::fs_backend::FsBackend;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const DATA_ENV: &str = "QUIZ_DATA";

pub struct QuizContext {
    pub api: QuizApi<FsBackend>,
    pub config: QuizConfig,
    pub root: PathBuf,
}

pub fn default_data_root() -> Result<PathBuf> {
    ProjectDirs::from("com", "inahoot", "quiz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| QuizError::Store("could not determine a home directory".to_string()))
}

pub fn resolve_data_root(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(env_root) = std::env::var_os(DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(env_root));
    }
    match data_override {
        Some(root) => Ok(root),
        None => default_data_root(),
    }
}

/// Create the root and its fixed subdirectories if missing.
pub fn ensure_data_dirs(root: &Path) -> Result<()> {
    for dir in DATA_DIRS {
        std::fs::create_dir_all(root.join(dir))?;
    }
    Ok(())
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<QuizContext> {
    let root = resolve_data_root(data_override)?;
    ensure_data_dirs(&root)?;
    let config = QuizConfig::load(&root)?;
    tracing::debug!(root = %root.display(), "initialized data root");

    let backend = Rc::new(FsBackend::new(root.clone()));
    let api = QuizApi::new(backend, config.clone());
    Ok(QuizContext { api, config, root })
}
