use crate::actions;
use crate::archive;
use crate::error::{JotError, Result};
use crate::model::{find_book, Action, Archive};
use crate::store::{StorageBackend, WriteBatch};

/// Trim surrounding whitespace; inner formatting is left alone.
pub fn sanitize_content(content: &str) -> String {
    content.trim().to_string()
}

/// Resolve a book name and 1-based note index to the book's archive key and
/// the note's position.
pub fn locate_note(archive: &Archive, book_name: &str, index: usize) -> Result<(String, usize)> {
    let book = find_book(archive, book_name)
        .ok_or_else(|| JotError::Api(format!("Book {} does not exist", book_name)))?;
    if index == 0 || index > book.notes.len() {
        return Err(JotError::Api(format!(
            "Book {} does not have note with index {}",
            book_name, index
        )));
    }
    Ok((book.uuid.to_string(), index - 1))
}

/// Persist a changed archive and the action describing the change together.
pub fn persist<S: StorageBackend + ?Sized>(
    backend: &S,
    archive: &Archive,
    logged: &[Action],
) -> Result<()> {
    let mut batch = WriteBatch::new();
    actions::stage_append(backend, &mut batch, logged)?;
    archive::stage_write(&mut batch, archive)?;
    backend.commit(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Book, Note};

    fn archive_with(name: &str, notes: usize) -> Archive {
        let mut book = Book::new(name.to_string());
        for i in 0..notes {
            book.notes.push(Note::new(format!("note {}", i), 1));
        }
        let mut archive = Archive::new();
        archive.insert(book.uuid.to_string(), book);
        archive
    }

    #[test]
    fn locates_by_one_based_index() {
        let archive = archive_with("js", 3);
        let (key, pos) = locate_note(&archive, "js", 3).unwrap();
        assert_eq!(pos, 2);
        assert_eq!(archive.get(&key).unwrap().name, "js");
    }

    #[test]
    fn rejects_out_of_range_indexes() {
        let archive = archive_with("js", 1);
        assert!(locate_note(&archive, "js", 0).is_err());
        let err = locate_note(&archive, "js", 2).unwrap_err();
        assert_eq!(err.to_string(), "Book js does not have note with index 2");
        let err = locate_note(&archive, "css", 1).unwrap_err();
        assert_eq!(err.to_string(), "Book css does not exist");
    }

    #[test]
    fn sanitizes_surrounding_whitespace() {
        assert_eq!(sanitize_content("  hello\n world \n"), "hello\n world");
    }
}
