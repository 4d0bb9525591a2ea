//! Current (post-migration) data types.
//!
//! These are the shapes the live commands read and write. Older shapes only
//! exist inside [`crate::legacy`] and [`crate::migrate`].

use crate::keyed::Keyed;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub uuid: Uuid,
    pub content: String,
    pub added_on: i64,
    pub edited_on: i64,
}

impl Note {
    pub fn new(content: String, added_on: i64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            content,
            added_on,
            edited_on: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub uuid: Uuid,
    pub name: String,
    pub notes: Vec<Note>,
}

impl Book {
    pub fn new(name: String) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name,
            notes: Vec::new(),
        }
    }
}

/// Books keyed by their UUID, in the order they were first written.
pub type Archive = Keyed<Book>;

pub fn find_book<'a>(archive: &'a Archive, name: &str) -> Option<&'a Book> {
    archive.values().find(|b| b.name == name)
}

pub fn find_book_mut<'a>(archive: &'a mut Archive, name: &str) -> Option<&'a mut Book> {
    archive.values_mut().find(|b| b.name == name)
}

pub fn note_count(archive: &Archive) -> usize {
    archive.values().map(|b| b.notes.len()).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Insert,
    Edit,
    Delete,
}

/// A note-level mutation, replayed later against the sync service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub note_uuid: Uuid,
    pub book_name: String,
    pub content: String,
    pub timestamp: i64,
}

impl Action {
    pub fn insert(book_name: &str, note: &Note, timestamp: i64) -> Self {
        Self::of(ActionKind::Insert, book_name, note, timestamp)
    }

    pub fn edit(book_name: &str, note: &Note, timestamp: i64) -> Self {
        Self::of(ActionKind::Edit, book_name, note, timestamp)
    }

    pub fn delete(book_name: &str, note: &Note, timestamp: i64) -> Self {
        Self::of(ActionKind::Delete, book_name, note, timestamp)
    }

    fn of(kind: ActionKind, book_name: &str, note: &Note, timestamp: i64) -> Self {
        Self {
            kind,
            note_uuid: note.uuid,
            book_name: book_name.to_string(),
            content: note.content.clone(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRecord {
    pub current_version: u32,
}
