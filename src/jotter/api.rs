//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! jotter operation. It fills in defaults the user left out (the current book,
//! the clock) and returns structured [`CmdResult`]s; it never prints.
//!
//! `JotApi<S: StorageBackend>` is generic over storage:
//! - Production: `JotApi<FsBackend>`
//! - Testing: `JotApi<MemBackend>`
//!
//! API tests check that arguments reach the right command. Command behavior is
//! tested in `commands/*.rs` and storage in `store/*.rs`.

use crate::commands::{self, CmdResult};
use crate::config::JotConfig;
use crate::error::Result;
use crate::store::StorageBackend;
use chrono::Utc;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{BookSummary, CmdMessage, DisplayNote, MessageLevel};

pub struct JotApi<S: StorageBackend> {
    backend: S,
    config: JotConfig,
}

impl<S: StorageBackend> JotApi<S> {
    /// Configuration is read once here and again after [`JotApi::migrate`],
    /// since a migration step may rewrite it.
    pub fn new(backend: S) -> Result<Self> {
        let config = JotConfig::load(&backend)?;
        Ok(Self { backend, config })
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn config(&self) -> &JotConfig {
        &self.config
    }

    pub fn migrate(&mut self) -> Result<CmdResult> {
        let result = commands::migrate::run(&self.backend)?;
        self.config = JotConfig::load(&self.backend)?;
        Ok(result)
    }

    pub fn books(&self) -> Result<CmdResult> {
        commands::books::run(&self.backend, &self.config.book)
    }

    pub fn view(&self, book: Option<&str>) -> Result<CmdResult> {
        commands::view::run(&self.backend, self.book_or_current(book))
    }

    pub fn add(&mut self, book: Option<&str>, content: &str) -> Result<CmdResult> {
        let book = self.book_or_current(book).to_string();
        commands::add::run(&self.backend, &book, content, now())
    }

    pub fn edit(&mut self, book: Option<&str>, index: usize, content: &str) -> Result<CmdResult> {
        let book = self.book_or_current(book).to_string();
        commands::edit::run(&self.backend, &book, index, content, now())
    }

    pub fn remove(&mut self, book: Option<&str>, index: usize) -> Result<CmdResult> {
        let book = self.book_or_current(book).to_string();
        commands::remove::run(&self.backend, &book, index, now())
    }

    /// Show or change configuration. The cached config is reloaded so later
    /// calls on this facade see a changed current book.
    pub fn configure(&mut self, action: ConfigAction) -> Result<CmdResult> {
        let result = commands::config::run(&self.backend, action)?;
        self.config = JotConfig::load(&self.backend)?;
        Ok(result)
    }

    pub fn find(&self, query: &str, book: Option<&str>) -> Result<CmdResult> {
        commands::find::run(&self.backend, query, book)
    }

    fn book_or_current<'a>(&'a self, book: Option<&'a str>) -> &'a str {
        book.unwrap_or(&self.config.book)
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}
