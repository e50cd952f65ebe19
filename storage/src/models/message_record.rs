//! Message record model for persistence.
//!
//! Maps to the `messages` table; one row per (chat, message id). Edits overwrite the row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub chat_id: i64,
    pub message_id: i32,
    pub chat_type: String,
    pub author_id: i64,
    pub author_name: String,
    pub kind: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}
