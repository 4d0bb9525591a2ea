use crate::archive;
use crate::commands::helpers::{locate_note, persist};
use crate::commands::{CmdMessage, CmdResult, DisplayNote};
use crate::error::{JotError, Result};
use crate::model::Action;
use crate::store::StorageBackend;

pub fn run<S: StorageBackend>(
    backend: &S,
    book_name: &str,
    index: usize,
    now: i64,
) -> Result<CmdResult> {
    let mut archive = archive::load(backend)?;
    let (key, pos) = locate_note(&archive, book_name, index)?;
    let book = archive
        .get_mut(&key)
        .ok_or_else(|| JotError::Api(format!("Book {} does not exist", book_name)))?;
    let note = book.notes.remove(pos);

    persist(backend, &archive, &[Action::delete(book_name, &note, now)])?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Removed note {} from {}",
        index, book_name
    )));
    result.affected_notes.push(DisplayNote {
        book: book_name.to_string(),
        index,
        note,
    });
    Ok(result)
}
