use thiserror::Error;

#[derive(Error, Debug)]
pub enum JotError {
    #[error("Failed to decode {file}: {reason}")]
    Decode { file: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Schema version {found} is newer than the latest known version {latest}")]
    Version { found: u32, latest: u32 },

    #[error("Refusing to move schema version back from {current} to {requested}")]
    Downgrade { current: u32, requested: u32 },

    #[error("Could not draw a unique note identifier after {attempts} attempts")]
    IdentifierExhausted { attempts: usize },

    #[error("Another jot process holds the lock on {0}")]
    Locked(String),

    #[error("{0}")]
    Api(String),
}

impl JotError {
    pub fn decode(file: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        JotError::Decode {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JotError>;
