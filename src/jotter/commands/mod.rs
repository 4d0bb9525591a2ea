//! # Command Layer
//!
//! One module per command. Commands take a [`StorageBackend`] and plain Rust
//! arguments, and return a [`CmdResult`]; they never print. Every command that
//! changes a note appends exactly one action in the same batch that rewrites
//! the archive, using the same action format the migration engine emits.
//!
//! [`StorageBackend`]: crate::store::StorageBackend

use crate::config::JotConfig;
use crate::migrate::MigrationReport;
use crate::model::Note;

pub mod add;
pub mod books;
pub mod config;
pub mod edit;
pub mod find;
pub mod helpers;
pub mod migrate;
pub mod remove;
pub mod view;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// A note together with where the user can find it: its book and its
/// 1-based position in that book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNote {
    pub book: String,
    pub index: usize,
    pub note: Note,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSummary {
    pub name: String,
    pub note_count: usize,
    pub is_current: bool,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub books: Vec<BookSummary>,
    pub listed_notes: Vec<DisplayNote>,
    pub affected_notes: Vec<DisplayNote>,
    pub report: Option<MigrationReport>,
    pub config: Option<JotConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_books(mut self, books: Vec<BookSummary>) -> Self {
        self.books = books;
        self
    }

    pub fn with_listed_notes(mut self, notes: Vec<DisplayNote>) -> Self {
        self.listed_notes = notes;
        self
    }

    pub fn with_config(mut self, config: JotConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_report(mut self, report: MigrationReport) -> Self {
        self.report = Some(report);
        self
    }
}
