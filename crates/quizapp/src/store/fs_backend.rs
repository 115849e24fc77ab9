use super::backend::StorageBackend;
use crate::error::{QuizError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const TMP_PREFIX: &str = ".write-";
const TMP_SUFFIX: &str = ".tmp";

/// In-flight atomic write, never a record.
fn is_temp_file(name: &str) -> bool {
    name.starts_with(TMP_PREFIX) && name.ends_with(TMP_SUFFIX)
}

/// Filesystem backend rooted on the game data directory.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(QuizError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_text(&self, rel: &str) -> Result<Option<String>> {
        let path = self.full_path(rel);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(QuizError::Io)?;
        Ok(Some(content))
    }

    fn write_text(&self, rel: &str, content: &str) -> Result<()> {
        let target = self.full_path(rel);
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        self.ensure_dir(&dir)?;

        // Atomic write
        let tmp = dir.join(format!("{}{}{}", TMP_PREFIX, Uuid::new_v4(), TMP_SUFFIX));
        fs::write(&tmp, content).map_err(QuizError::Io)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(QuizError::Io(e));
        }
        Ok(())
    }

    fn delete(&self, rel: &str) -> Result<bool> {
        let path = self.full_path(rel);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path).map_err(QuizError::Io)?;
        Ok(true)
    }

    fn list(&self, dir: &str, extension: &str) -> Result<Vec<String>> {
        let path = self.full_path(dir);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&path).map_err(QuizError::Io)? {
            let entry = entry.map_err(QuizError::Io)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                if name.ends_with(extension) && !is_temp_file(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn exists(&self, rel: &str) -> bool {
        self.full_path(rel).exists()
    }

    fn full_path(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}
