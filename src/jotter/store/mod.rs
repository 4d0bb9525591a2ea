//! # Storage Layer
//!
//! Everything jotter persists lives in a handful of well-known files under one
//! home directory. The [`StorageBackend`] trait gives byte-level access to
//! those files, identified by [`DataFile`], so the migration engine and the
//! commands never build paths themselves.
//!
//! ## Implementations
//!
//! - [`fs::FsBackend`]: production storage under the jotter home directory.
//! - [`memory::MemBackend`]: in-memory storage for tests, with write-failure
//!   injection.
//!
//! ## Batched commits
//!
//! All writes go through a [`WriteBatch`]. A backend first stages every write
//! (temp file next to the target), and only once all of them are staged does
//! it rename them into place in insertion order, followed by removals in
//! order. A failure while staging leaves the visible files untouched.
//!
//! ```text
//! <home>/
//! ├── archive                 # books and notes (JSON; legacy YAML before v1)
//! ├── schema                  # {"current_version": N}
//! ├── actions                 # append-only JSON array of actions
//! ├── config.json             # current book, editor, api key
//! ├── archive-yaml-archived   # obsolete YAML copy, removed by step 1
//! └── jotrc                   # legacy YAML rc, folded into config.json by step 4
//! ```

use crate::error::{JotError, Result};
use std::fmt;

pub mod fs;
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFile {
    Archive,
    Schema,
    Actions,
    Config,
    LegacyYamlArchive,
    LegacyRc,
}

impl DataFile {
    pub fn file_name(self) -> &'static str {
        match self {
            DataFile::Archive => "archive",
            DataFile::Schema => "schema",
            DataFile::Actions => "actions",
            DataFile::Config => "config.json",
            DataFile::LegacyYamlArchive => "archive-yaml-archived",
            DataFile::LegacyRc => "jotrc",
        }
    }
}

impl fmt::Display for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Write(DataFile, Vec<u8>),
    Remove(DataFile),
}

/// An ordered set of writes and removals committed together.
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, file: DataFile, bytes: Vec<u8>) {
        self.ops.push(BatchOp::Write(file, bytes));
    }

    pub fn remove(&mut self, file: DataFile) {
        self.ops.push(BatchOp::Remove(file));
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

/// Abstract interface for raw storage I/O.
pub trait StorageBackend {
    /// Read the whole file. Returns `Ok(None)` when it does not exist.
    fn read(&self, file: DataFile) -> Result<Option<Vec<u8>>>;

    /// Modification time in epoch seconds, if the file exists.
    fn modified(&self, file: DataFile) -> Result<Option<i64>>;

    fn exists(&self, file: DataFile) -> Result<bool> {
        Ok(self.read(file)?.is_some())
    }

    /// Apply a batch. MUST stage all writes before making any of them visible.
    fn commit(&self, batch: WriteBatch) -> Result<()>;
}

/// Read a file as UTF-8 text.
pub fn read_string<S: StorageBackend + ?Sized>(
    backend: &S,
    file: DataFile,
) -> Result<Option<String>> {
    match backend.read(file)? {
        Some(bytes) => String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| JotError::decode(file, e)),
        None => Ok(None),
    }
}
