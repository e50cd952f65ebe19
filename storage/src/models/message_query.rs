//! Page request for walking a chat's log forward from a cursor.
//!
//! Used by MessageRepository::get_messages_after.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageQuery {
    pub chat_id: i64,
    /// Exclusive lower bound on message id (the cursor).
    pub after_message_id: i32,
    /// Drop messages created before this instant.
    pub since: Option<DateTime<Utc>>,
    pub limit: i64,
}

impl MessageQuery {
    pub fn new(chat_id: i64, after_message_id: i32, limit: i64) -> Self {
        Self {
            chat_id,
            after_message_id,
            since: None,
            limit,
        }
    }

    pub fn with_since(mut self, since: Option<DateTime<Utc>>) -> Self {
        self.since = since;
        self
    }
}
