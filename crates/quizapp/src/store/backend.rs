use crate::error::Result;
use std::path::PathBuf;

/// Abstract interface for raw storage I/O.
///
/// This trait handles the "how" of storage (filesystem vs memory), while the
/// record store and the stores built on it handle the "what" (ordering,
/// retention, recovery). All paths are relative to the data root and use `/`
/// as separator.
pub trait StorageBackend {
    /// Read a whole file.
    /// Returns Ok(None) if the file does not exist.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_text(&self, rel: &str) -> Result<Option<String>>;

    /// Replace a file's content, creating parent directories as needed.
    /// MUST be atomic (e.g. write to tmp then rename) so readers see either the
    /// old or the new content.
    fn write_text(&self, rel: &str, content: &str) -> Result<()>;

    /// Delete a file. Returns Ok(false) if there was nothing to delete.
    fn delete(&self, rel: &str) -> Result<bool>;

    /// File names (not paths) directly inside `dir` ending in `extension`,
    /// sorted ascending. A missing directory lists as empty.
    fn list(&self, dir: &str, extension: &str) -> Result<Vec<String>>;

    fn exists(&self, rel: &str) -> bool;

    /// Location shown to users. For MemBackend, a virtual path.
    fn full_path(&self, rel: &str) -> PathBuf;
}
