use super::{BatchOp, DataFile, StorageBackend, WriteBatch};
use crate::error::{JotError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

/// In-memory storage for tests.
///
/// `fail_writes_to` makes every commit that writes the given file fail before
/// anything is applied, which is how a crash mid-migration is simulated.
#[derive(Debug, Default)]
pub struct MemBackend {
    files: RefCell<HashMap<DataFile, Vec<u8>>>,
    mtimes: RefCell<HashMap<DataFile, i64>>,
    failing: RefCell<Option<DataFile>>,
    commits: RefCell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, file: DataFile, content: impl Into<Vec<u8>>) -> Self {
        self.put(file, content);
        self
    }

    pub fn put(&self, file: DataFile, content: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert(file, content.into());
    }

    pub fn get(&self, file: DataFile) -> Option<Vec<u8>> {
        self.files.borrow().get(&file).cloned()
    }

    pub fn get_string(&self, file: DataFile) -> Option<String> {
        self.get(file)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn set_modified(&self, file: DataFile, epoch_secs: i64) {
        self.mtimes.borrow_mut().insert(file, epoch_secs);
    }

    pub fn fail_writes_to(&self, file: DataFile) {
        *self.failing.borrow_mut() = Some(file);
    }

    pub fn clear_failure(&self) {
        *self.failing.borrow_mut() = None;
    }

    /// Number of batches applied so far.
    pub fn commit_count(&self) -> usize {
        *self.commits.borrow()
    }

    /// Snapshot of every file, for before/after comparisons.
    pub fn snapshot(&self) -> HashMap<DataFile, Vec<u8>> {
        self.files.borrow().clone()
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, file: DataFile) -> Result<Option<Vec<u8>>> {
        Ok(self.get(file))
    }

    fn modified(&self, file: DataFile) -> Result<Option<i64>> {
        if !self.files.borrow().contains_key(&file) {
            return Ok(None);
        }
        Ok(self.mtimes.borrow().get(&file).copied())
    }

    fn commit(&self, batch: WriteBatch) -> Result<()> {
        if let Some(failing) = *self.failing.borrow() {
            let hits = batch
                .ops()
                .iter()
                .any(|op| matches!(op, BatchOp::Write(f, _) if *f == failing));
            if hits {
                return Err(JotError::Io(io::Error::new(
                    io::ErrorKind::Other,
                    format!("injected write failure for {}", failing),
                )));
            }
        }

        let mut files = self.files.borrow_mut();
        for op in batch.into_ops() {
            match op {
                BatchOp::Write(file, bytes) => {
                    files.insert(file, bytes);
                }
                BatchOp::Remove(file) => {
                    files.remove(&file);
                }
            }
        }
        *self.commits.borrow_mut() += 1;
        Ok(())
    }
}
