use crate::archive;
use crate::commands::helpers::{persist, sanitize_content};
use crate::commands::{CmdMessage, CmdResult, DisplayNote};
use crate::error::{JotError, Result};
use crate::model::{find_book, find_book_mut, Action, Book, Note};
use crate::store::StorageBackend;

pub fn run<S: StorageBackend>(
    backend: &S,
    book_name: &str,
    content: &str,
    now: i64,
) -> Result<CmdResult> {
    let book_name = book_name.trim();
    if book_name.is_empty() {
        return Err(JotError::Api("Book name cannot be empty".into()));
    }
    let content = sanitize_content(content);
    if content.is_empty() {
        return Err(JotError::Api("Content cannot be empty".into()));
    }

    let mut archive = archive::load(backend)?;
    let mut result = CmdResult::default();

    if find_book(&archive, book_name).is_none() {
        let book = Book::new(book_name.to_string());
        archive.insert(book.uuid.to_string(), book);
        result.add_message(CmdMessage::info(format!("Created book {}", book_name)));
    }

    let note = Note::new(content, now);
    let book = find_book_mut(&mut archive, book_name)
        .ok_or_else(|| JotError::Api(format!("Book {} does not exist", book_name)))?;
    book.notes.push(note.clone());
    let index = book.notes.len();

    persist(backend, &archive, &[Action::insert(book_name, &note, now)])?;

    result.add_message(CmdMessage::success(format!(
        "Added note {} to {}",
        index, book_name
    )));
    result.affected_notes.push(DisplayNote {
        book: book_name.to_string(),
        index,
        note,
    });
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions;
    use crate::model::{note_count, ActionKind};
    use crate::store::memory::MemBackend;

    #[test]
    fn adds_note_and_logs_insert() {
        let backend = MemBackend::new();
        let result = run(&backend, "js", "  closures capture variables  ", 1_700_000_000).unwrap();

        let archive = archive::load(&backend).unwrap();
        let book = find_book(&archive, "js").unwrap();
        assert_eq!(book.notes[0].content, "closures capture variables");
        assert_eq!(book.notes[0].added_on, 1_700_000_000);
        assert_eq!(book.notes[0].edited_on, 0);
        assert_eq!(result.affected_notes[0].index, 1);

        let log = actions::load(&backend).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, ActionKind::Insert);
        assert_eq!(log[0].note_uuid, book.notes[0].uuid);
        assert_eq!(log[0].timestamp, 1_700_000_000);
    }

    #[test]
    fn appends_to_existing_book() {
        let backend = MemBackend::new();
        run(&backend, "js", "one", 1).unwrap();
        let result = run(&backend, "js", "two", 2).unwrap();

        let archive = archive::load(&backend).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(note_count(&archive), 2);
        assert_eq!(result.affected_notes[0].index, 2);
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn rejects_empty_content() {
        let backend = MemBackend::new();
        assert!(run(&backend, "js", "   ", 1).is_err());
        assert!(run(&backend, " ", "x", 1).is_err());
        assert_eq!(backend.commit_count(), 0);
    }
}
