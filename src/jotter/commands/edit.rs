use crate::archive;
use crate::commands::helpers::{locate_note, persist, sanitize_content};
use crate::commands::{CmdMessage, CmdResult, DisplayNote};
use crate::error::{JotError, Result};
use crate::model::Action;
use crate::store::StorageBackend;

pub fn run<S: StorageBackend>(
    backend: &S,
    book_name: &str,
    index: usize,
    content: &str,
    now: i64,
) -> Result<CmdResult> {
    let content = sanitize_content(content);
    if content.is_empty() {
        return Err(JotError::Api("Content cannot be empty".into()));
    }

    let mut archive = archive::load(backend)?;
    let (key, pos) = locate_note(&archive, book_name, index)?;
    let book = archive
        .get_mut(&key)
        .ok_or_else(|| JotError::Api(format!("Book {} does not exist", book_name)))?;
    let note = &mut book.notes[pos];

    if note.content == content {
        return Err(JotError::Api("Nothing changed".into()));
    }
    note.content = content;
    note.edited_on = now;
    let note = note.clone();

    persist(backend, &archive, &[Action::edit(book_name, &note, now)])?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Edited note {} in {}",
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
    use crate::commands::add;
    use crate::model::{find_book, ActionKind};
    use crate::store::memory::MemBackend;

    #[test]
    fn edits_content_and_logs_edit() {
        let backend = MemBackend::new();
        add::run(&backend, "linux", "grep -r", 100).unwrap();
        run(&backend, "linux", 1, "grep -rn pattern .", 200).unwrap();

        let archive = archive::load(&backend).unwrap();
        let note = &find_book(&archive, "linux").unwrap().notes[0];
        assert_eq!(note.content, "grep -rn pattern .");
        assert_eq!(note.added_on, 100);
        assert_eq!(note.edited_on, 200);

        let log = actions::load(&backend).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].kind, ActionKind::Edit);
        assert_eq!(log[1].note_uuid, note.uuid);
        assert_eq!(log[1].content, "grep -rn pattern .");
        assert_eq!(log[1].timestamp, 200);
    }

    #[test]
    fn unchanged_content_is_an_error() {
        let backend = MemBackend::new();
        add::run(&backend, "linux", "grep -r", 100).unwrap();
        let err = run(&backend, "linux", 1, "grep -r  ", 200).unwrap_err();
        assert_eq!(err.to_string(), "Nothing changed");
        assert_eq!(actions::load(&backend).unwrap().len(), 1);
    }

    #[test]
    fn missing_note_is_an_error() {
        let backend = MemBackend::new();
        add::run(&backend, "linux", "grep -r", 100).unwrap();
        assert!(run(&backend, "linux", 5, "x", 200).is_err());
        assert!(run(&backend, "rust", 1, "x", 200).is_err());
    }
}
