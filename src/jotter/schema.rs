//! Schema State Store: the persisted `{"current_version": N}` record.
//!
//! Writes always go through a [`WriteBatch`], so the record is replaced by
//! rename and a crash can never leave a half-written version behind.

use crate::error::{JotError, Result};
use crate::model::SchemaRecord;
use crate::store::{read_string, DataFile, StorageBackend, WriteBatch};

/// Fails with [`JotError::NotFound`] when no schema has been written yet.
pub fn read_schema<S: StorageBackend + ?Sized>(backend: &S) -> Result<SchemaRecord> {
    let content = read_string(backend, DataFile::Schema)?
        .ok_or_else(|| JotError::NotFound(DataFile::Schema.to_string()))?;
    serde_json::from_str(&content).map_err(|e| JotError::decode(DataFile::Schema, e))
}

/// The persisted version, treating an absent schema as version 0.
pub fn current_version<S: StorageBackend + ?Sized>(backend: &S) -> Result<u32> {
    match read_schema(backend) {
        Ok(record) => Ok(record.current_version),
        Err(JotError::NotFound(_)) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Queue `record` on `batch`. The persisted version never moves backwards,
/// so a record below the current version is rejected with
/// [`JotError::Downgrade`] before anything is staged.
pub fn stage_write<S: StorageBackend + ?Sized>(
    backend: &S,
    batch: &mut WriteBatch,
    record: SchemaRecord,
) -> Result<()> {
    let current = current_version(backend)?;
    if record.current_version < current {
        return Err(JotError::Downgrade {
            current,
            requested: record.current_version,
        });
    }
    batch.write(DataFile::Schema, serde_json::to_vec(&record)?);
    Ok(())
}

pub fn write_schema<S: StorageBackend + ?Sized>(backend: &S, record: SchemaRecord) -> Result<()> {
    let mut batch = WriteBatch::new();
    stage_write(backend, &mut batch, record)?;
    backend.commit(batch)
}
