//! Database error types.

use thiserror::Error;
use vocab_core::PersistError;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("repository lock poisoned")]
    Poisoned,
}

impl From<DbError> for PersistError {
    fn from(e: DbError) -> Self {
        PersistError::Backend(e.to_string())
    }
}
