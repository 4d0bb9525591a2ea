use crate::archive;
use crate::commands::{BookSummary, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::StorageBackend;

pub fn run<S: StorageBackend>(backend: &S, current_book: &str) -> Result<CmdResult> {
    let archive = archive::load(backend)?;
    let books: Vec<BookSummary> = archive
        .values()
        .map(|b| BookSummary {
            name: b.name.clone(),
            note_count: b.notes.len(),
            is_current: b.name == current_book,
        })
        .collect();

    let mut result = CmdResult::default().with_books(books);
    if result.books.is_empty() {
        result.add_message(CmdMessage::info("No books yet."));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::store::memory::MemBackend;

    #[test]
    fn lists_books_in_archive_order_and_marks_current() {
        let backend = MemBackend::new();
        add::run(&backend, "linux", "a", 1).unwrap();
        add::run(&backend, "css", "b", 1).unwrap();
        add::run(&backend, "css", "c", 1).unwrap();

        let result = run(&backend, "linux").unwrap();
        let names: Vec<&str> = result.books.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["linux", "css"]);
        assert_eq!(result.books[1].note_count, 2);
        assert!(result.books[0].is_current);
        assert!(!result.books[1].is_current);
    }

    #[test]
    fn empty_archive_says_so() {
        let result = run(&MemBackend::new(), "general").unwrap();
        assert!(result.books.is_empty());
        assert_eq!(result.messages.len(), 1);
    }
}
