/// Error types shared by the catalog, settings and the asset store
///
/// iced messages must be `Clone`, so every variant keeps the rendered
/// message of its source instead of the source itself.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowserError {
    /// SQLite catalog failure
    #[error("catalog error: {0}")]
    Database(String),

    #[error("i/o error: {0}")]
    Io(String),

    /// Settings file could not be parsed or written
    #[error("settings error: {0}")]
    Settings(String),

    /// A blocking task panicked or was cancelled
    #[error("background task failed: {0}")]
    TaskJoin(String),

    #[error("could not determine user data directory")]
    NoDataDir,

    #[error("not a usable file path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, BrowserError>;

impl From<rusqlite::Error> for BrowserError {
    fn from(err: rusqlite::Error) -> Self {
        BrowserError::Database(err.to_string())
    }
}

impl From<std::io::Error> for BrowserError {
    fn from(err: std::io::Error) -> Self {
        BrowserError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BrowserError {
    fn from(err: serde_json::Error) -> Self {
        BrowserError::Settings(err.to_string())
    }
}

impl From<tokio::task::JoinError> for BrowserError {
    fn from(err: tokio::task::JoinError) -> Self {
        BrowserError::TaskJoin(err.to_string())
    }
}
