use crate::error::{JotError, Result};
use crate::store::{read_string, DataFile, StorageBackend, WriteBatch};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BOOK: &str = "general";
pub const DEFAULT_EDITOR: &str = "vi";
const LOCK_FILENAME: &str = ".lock";

/// Locations of every file jotter owns. Built once at startup and passed
/// down; nothing else resolves paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JotPaths {
    home: PathBuf,
}

impl JotPaths {
    pub fn new(home: PathBuf) -> Self {
        Self { home }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn file(&self, file: DataFile) -> PathBuf {
        self.home.join(file.file_name())
    }

    pub fn lock_file(&self) -> PathBuf {
        self.home.join(LOCK_FILENAME)
    }
}

/// User configuration, stored in `<home>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JotConfig {
    /// Book used when a command does not name one
    #[serde(default = "default_book")]
    pub book: String,

    #[serde(default = "default_editor")]
    pub editor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_book() -> String {
    DEFAULT_BOOK.to_string()
}

fn default_editor() -> String {
    DEFAULT_EDITOR.to_string()
}

impl Default for JotConfig {
    fn default() -> Self {
        Self {
            book: default_book(),
            editor: default_editor(),
            api_key: None,
        }
    }
}

impl JotConfig {
    /// Load config from the backend, or return defaults if not found
    pub fn load<S: StorageBackend + ?Sized>(backend: &S) -> Result<Self> {
        match read_string(backend, DataFile::Config)? {
            Some(content) => {
                serde_json::from_str(&content).map_err(|e| JotError::decode(DataFile::Config, e))
            }
            None => Ok(Self::default()),
        }
    }

    /// Value of a single key for display. The API key is never echoed back.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "book" => Some(self.book.clone()),
            "editor" => Some(self.editor.clone()),
            "api_key" => Some(if self.api_key.is_some() { "(set)" } else { "(unset)" }.into()),
            _ => None,
        }
    }

    /// An empty `api_key` clears it; `book` and `editor` must not be empty.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match key {
            "book" | "editor" if value.is_empty() => Err(format!("{} cannot be empty", key)),
            "book" => {
                self.book = value.to_string();
                Ok(())
            }
            "editor" => {
                self.editor = value.to_string();
                Ok(())
            }
            "api_key" => {
                self.api_key = (!value.is_empty()).then(|| value.to_string());
                Ok(())
            }
            other => Err(format!("Unknown config key: {}", other)),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn save<S: StorageBackend + ?Sized>(&self, backend: &S) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.write(DataFile::Config, self.encode()?);
        backend.commit(batch)
    }
}
