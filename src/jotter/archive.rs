//! Content Archive reader/writer for the current, UUID-keyed shape.

use crate::error::{JotError, Result};
use crate::model::Archive;
use crate::store::{DataFile, StorageBackend, WriteBatch};

pub fn decode(bytes: &[u8]) -> Result<Archive> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Archive::new());
    }
    let archive: Archive =
        serde_json::from_slice(bytes).map_err(|e| JotError::decode(DataFile::Archive, e))?;
    for (key, book) in archive.iter() {
        if key != book.uuid.to_string() {
            return Err(JotError::decode(
                DataFile::Archive,
                format!("book `{}` is stored under key `{}`", book.name, key),
            ));
        }
    }
    Ok(archive)
}

pub fn encode(archive: &Archive) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(archive)?)
}

pub fn load<S: StorageBackend + ?Sized>(backend: &S) -> Result<Archive> {
    match backend.read(DataFile::Archive)? {
        Some(bytes) => decode(&bytes),
        None => Ok(Archive::new()),
    }
}

pub fn stage_write(batch: &mut WriteBatch, archive: &Archive) -> Result<()> {
    batch.write(DataFile::Archive, encode(archive)?);
    Ok(())
}

pub fn write<S: StorageBackend + ?Sized>(backend: &S, archive: &Archive) -> Result<()> {
    let mut batch = WriteBatch::new();
    stage_write(&mut batch, archive)?;
    backend.commit(batch)
}
