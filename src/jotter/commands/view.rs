use crate::archive;
use crate::commands::{CmdResult, DisplayNote};
use crate::error::{JotError, Result};
use crate::model::find_book;
use crate::store::StorageBackend;

pub fn run<S: StorageBackend>(backend: &S, book_name: &str) -> Result<CmdResult> {
    let archive = archive::load(backend)?;
    let book = find_book(&archive, book_name)
        .ok_or_else(|| JotError::Api(format!("Book {} does not exist", book_name)))?;

    let listed = book
        .notes
        .iter()
        .enumerate()
        .map(|(i, note)| DisplayNote {
            book: book.name.clone(),
            index: i + 1,
            note: note.clone(),
        })
        .collect();
    Ok(CmdResult::default().with_listed_notes(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::store::memory::MemBackend;

    #[test]
    fn lists_notes_in_order_with_indexes() {
        let backend = MemBackend::new();
        add::run(&backend, "rust", "ownership", 1).unwrap();
        add::run(&backend, "rust", "borrowing", 2).unwrap();

        let result = run(&backend, "rust").unwrap();
        let listed: Vec<(usize, &str)> = result
            .listed_notes
            .iter()
            .map(|dn| (dn.index, dn.note.content.as_str()))
            .collect();
        assert_eq!(listed, vec![(1, "ownership"), (2, "borrowing")]);
    }

    #[test]
    fn unknown_book_is_an_error() {
        let err = run(&MemBackend::new(), "go").unwrap_err();
        assert_eq!(err.to_string(), "Book go does not exist");
    }
}
