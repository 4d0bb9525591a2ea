//! Action Log Writer.
//!
//! The log is one JSON array. Appending rewrites the whole array through a
//! [`WriteBatch`], so a failed append leaves the previous log intact and a
//! successful one makes every new action visible at once. Existing entries
//! are never reordered or deduplicated.

use crate::error::{JotError, Result};
use crate::model::Action;
use crate::store::{read_string, DataFile, StorageBackend, WriteBatch};

pub fn load<S: StorageBackend + ?Sized>(backend: &S) -> Result<Vec<Action>> {
    match read_string(backend, DataFile::Actions)? {
        Some(content) if !content.trim().is_empty() => {
            serde_json::from_str(&content).map_err(|e| JotError::decode(DataFile::Actions, e))
        }
        _ => Ok(Vec::new()),
    }
}

/// Queue the rewritten log on `batch`. Does nothing for an empty slice.
pub fn stage_append<S: StorageBackend + ?Sized>(
    backend: &S,
    batch: &mut WriteBatch,
    actions: &[Action],
) -> Result<()> {
    if actions.is_empty() {
        return Ok(());
    }
    let mut log = load(backend)?;
    log.extend_from_slice(actions);
    batch.write(DataFile::Actions, serde_json::to_vec_pretty(&log)?);
    Ok(())
}

pub fn append<S: StorageBackend + ?Sized>(backend: &S, actions: &[Action]) -> Result<()> {
    let mut batch = WriteBatch::new();
    stage_append(backend, &mut batch, actions)?;
    backend.commit(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionKind, Note};
    use crate::store::memory::MemBackend;

    fn note(content: &str) -> Note {
        Note::new(content.to_string(), 100)
    }

    #[test]
    fn absent_log_is_empty() {
        let backend = MemBackend::new();
        assert!(load(&backend).unwrap().is_empty());
    }

    #[test]
    fn appends_after_existing_entries() {
        let backend = MemBackend::new();
        let first = Action::insert("js", &note("a"), 1);
        let second = Action::edit("js", &note("b"), 2);
        let third = Action::delete("css", &note("c"), 3);

        append(&backend, &[first.clone()]).unwrap();
        append(&backend, &[second.clone(), third.clone()]).unwrap();

        assert_eq!(load(&backend).unwrap(), vec![first, second, third]);
    }

    #[test]
    fn keeps_duplicates() {
        let backend = MemBackend::new();
        let action = Action::insert("js", &note("a"), 1);
        append(&backend, &[action.clone()]).unwrap();
        append(&backend, &[action.clone()]).unwrap();
        assert_eq!(load(&backend).unwrap().len(), 2);
    }

    #[test]
    fn empty_append_writes_nothing() {
        let backend = MemBackend::new();
        append(&backend, &[]).unwrap();
        assert_eq!(backend.get(DataFile::Actions), None);
    }

    #[test]
    fn failed_append_is_invisible() {
        let backend = MemBackend::new();
        append(&backend, &[Action::insert("js", &note("a"), 1)]).unwrap();
        backend.fail_writes_to(DataFile::Actions);

        let batch = vec![
            Action::insert("js", &note("b"), 2),
            Action::insert("js", &note("c"), 3),
        ];
        assert!(append(&backend, &batch).is_err());

        let log = load(&backend).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, ActionKind::Insert);
        assert_eq!(log[0].content, "a");
    }

    #[test]
    fn malformed_log_is_a_decode_error() {
        let backend = MemBackend::new().with_file(DataFile::Actions, "{\"kind\": \"insert\"}");
        assert!(matches!(load(&backend), Err(JotError::Decode { .. })));
    }
}
