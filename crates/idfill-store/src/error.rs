use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("record store unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid identifier suffix {0:?}: expected 4 digits")]
    InvalidSuffix(String),
    #[error("join error: {0}")]
    Join(String),
}

impl StoreError {
    /// True when the store could not be opened at all (the "no data" mode).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. } | StoreError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
