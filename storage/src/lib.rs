//! Storage crate: the recorded message log of the monitored chat.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – MessageRecord, MessageQuery
//! - [`message_repo`] – MessageRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod message_repo;
mod models;
mod sqlite_pool;

pub use error::StorageError;
pub use message_repo::MessageRepository;
pub use models::{MessageQuery, MessageRecord};
pub use sqlite_pool::SqlitePoolManager;
