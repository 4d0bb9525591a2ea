use crate::archive;
use crate::commands::{CmdMessage, CmdResult, DisplayNote};
use crate::error::{JotError, Result};
use crate::store::StorageBackend;

/// Quote every whitespace-separated term so it is matched literally, joining
/// the quoted terms with single spaces. Embedded quotes are doubled.
pub fn escape_query(query: &str) -> String {
    let terms: Vec<&str> = query.split_whitespace().collect();
    let mut escaped = String::new();
    for (idx, term) in terms.iter().enumerate() {
        escaped.push('"');
        escaped.push_str(&term.replace('"', "\"\""));
        escaped.push('"');
        if idx + 1 != terms.len() {
            escaped.push(' ');
        }
    }
    escaped
}

/// Notes whose content contains every term, ignoring case. Results keep
/// archive order and carry the note's 1-based index within its book.
pub fn run<S: StorageBackend>(
    backend: &S,
    query: &str,
    book_filter: Option<&str>,
) -> Result<CmdResult> {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if terms.is_empty() {
        return Err(JotError::Api("Search query cannot be empty".into()));
    }

    let archive = archive::load(backend)?;
    if let Some(name) = book_filter {
        if archive.values().all(|b| b.name != name) {
            return Err(JotError::Api(format!("Book {} does not exist", name)));
        }
    }

    let listed: Vec<DisplayNote> = archive
        .values()
        .filter(|book| book_filter.map_or(true, |name| book.name == name))
        .flat_map(|book| {
            book.notes.iter().enumerate().map(move |(i, note)| DisplayNote {
                book: book.name.clone(),
                index: i + 1,
                note: note.clone(),
            })
        })
        .filter(|dn| {
            let content = dn.note.content.to_lowercase();
            terms.iter().all(|t| content.contains(t.as_str()))
        })
        .collect();

    let mut result = CmdResult::default();
    if listed.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No notes match {}",
            escape_query(query)
        )));
    }
    Ok(result.with_listed_notes(listed))
}
