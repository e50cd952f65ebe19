//! Storage error types.
//!
//! Returned by [`crate::MessageRepository`]; callers map them into their own error types.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StorageError::NotFound("row not found".to_string()),
            other => StorageError::Database(other.to_string()),
        }
    }
}
