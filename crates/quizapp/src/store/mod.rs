//! # Storage Layer
//!
//! Everything the quiz persists goes through a [`backend::StorageBackend`]: a small
//! text-file abstraction addressed by paths relative to the data root.
//!
//! ## Layers
//!
//! 1. **Backend** ([`backend`]): read, write, list and delete text files.
//!    - [`fs_backend::FsBackend`]: production, writes via temp file plus rename.
//!    - [`mem_backend::MemBackend`]: in-memory, for tests (can simulate write failures).
//! 2. **Records** ([`record`]): one collection per file, decoded with a
//!    [`record::RecordCodec`] (JSON or the per-set XML format).
//!
//! ## Failure Policy
//!
//! Reads never abort the game. A missing file is an empty collection. A file that
//! cannot be decoded is written up as an error report and also treated as empty;
//! the next save replaces it. Write failures are reported and returned to the caller.

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod record;
