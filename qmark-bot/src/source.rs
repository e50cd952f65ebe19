//! [`MessageSource`] over the recorded message log.

use async_trait::async_trait;
use qmark_core::{Author, Chat, ChatType, Message, MessageKind, QmarkError, Result};
use qmark_stats::{MessageSource, PageRequest};
use storage::{MessageQuery, MessageRecord, MessageRepository, StorageError};
use tracing::debug;

/// Pages the monitored chat out of the SQLite log. The anchor must itself have been recorded.
#[derive(Clone)]
pub struct StoredMessageSource {
    repo: MessageRepository,
}

impl StoredMessageSource {
    pub fn new(repo: MessageRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl MessageSource for StoredMessageSource {
    async fn anchor_exists(&self, chat_id: i64, anchor_id: i32) -> Result<bool> {
        let anchor = self
            .repo
            .get_message(chat_id, anchor_id)
            .await
            .map_err(storage_error)?;
        Ok(anchor.is_some())
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Message>> {
        let limit = i64::try_from(request.limit).unwrap_or(i64::MAX);
        let query = MessageQuery::new(request.chat_id, request.after, limit).with_since(request.since);
        let records = self
            .repo
            .get_messages_after(&query)
            .await
            .map_err(storage_error)?;
        debug!(chat_id = request.chat_id, after = request.after, count = records.len(), "Page read from log");
        Ok(records.into_iter().map(from_record).collect())
    }
}

pub fn storage_error(err: StorageError) -> QmarkError {
    match err {
        StorageError::NotFound(what) => QmarkError::NotFound(what),
        StorageError::Database(e) => QmarkError::Database(e),
    }
}

pub fn to_record(message: &Message) -> MessageRecord {
    MessageRecord {
        chat_id: message.chat.id,
        message_id: message.id,
        chat_type: message.chat.chat_type.as_str().to_string(),
        author_id: message.author.id,
        author_name: message.author.display_name.clone(),
        kind: message.kind.as_str().to_string(),
        content: message.content.clone(),
        created_at: message.created_at,
        edited_at: message.edited_at,
    }
}

pub fn from_record(record: MessageRecord) -> Message {
    Message {
        id: record.message_id,
        chat: Chat::new(record.chat_id, ChatType::parse(&record.chat_type)),
        author: Author {
            id: record.author_id,
            display_name: record.author_name,
        },
        content: record.content,
        kind: MessageKind::parse(&record.kind),
        created_at: record.created_at,
        edited_at: record.edited_at,
    }
}
