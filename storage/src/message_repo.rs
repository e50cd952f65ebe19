//! Message repository: the recorded log of the monitored chat.
//!
//! Uses SqlitePoolManager and the models (MessageRecord, MessageQuery).
//! Rows are keyed by (chat_id, message_id); an edit overwrites the recorded row.

use crate::error::StorageError;
use crate::models::{MessageQuery, MessageRecord};
use crate::sqlite_pool::SqlitePoolManager;
use tracing::{debug, info};

#[derive(Clone)]
pub struct MessageRepository {
    pool_manager: SqlitePoolManager,
}

impl MessageRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                chat_id INTEGER NOT NULL,
                message_id INTEGER NOT NULL,
                chat_type TEXT NOT NULL,
                author_id INTEGER NOT NULL,
                author_name TEXT NOT NULL,
                kind TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                edited_at TEXT,
                PRIMARY KEY (chat_id, message_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at)")
            .execute(pool)
            .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// Inserts the record. An already recorded message is only overwritten by a newer edit, so a late
    /// copy of the original never clobbers an edit.
    pub async fn save(&self, message: &MessageRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO messages (chat_id, message_id, chat_type, author_id, author_name, kind, content, created_at, edited_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(chat_id, message_id) DO UPDATE SET
                author_name = excluded.author_name,
                kind = excluded.kind,
                content = excluded.content,
                edited_at = excluded.edited_at
            WHERE excluded.edited_at IS NOT NULL
              AND (messages.edited_at IS NULL OR excluded.edited_at >= messages.edited_at)
            "#,
        )
        .bind(message.chat_id)
        .bind(message.message_id)
        .bind(&message.chat_type)
        .bind(message.author_id)
        .bind(&message.author_name)
        .bind(&message.kind)
        .bind(&message.content)
        .bind(message.created_at)
        .bind(message.edited_at)
        .execute(pool)
        .await?;

        debug!(
            chat_id = message.chat_id,
            message_id = message.message_id,
            kind = %message.kind,
            "Saved message"
        );
        Ok(())
    }

    pub async fn get_message(
        &self,
        chat_id: i64,
        message_id: i32,
    ) -> Result<Option<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let message = sqlx::query_as::<_, MessageRecord>(
            "SELECT * FROM messages WHERE chat_id = ? AND message_id = ?",
        )
        .bind(chat_id)
        .bind(message_id)
        .fetch_optional(pool)
        .await?;

        Ok(message)
    }

    /// One page of messages with id greater than `query.after_message_id`, ascending by id.
    pub async fn get_messages_after(
        &self,
        query: &MessageQuery,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let messages: Vec<MessageRecord> = match query.since {
            Some(since) => {
                sqlx::query_as::<_, MessageRecord>(
                    "SELECT * FROM messages WHERE chat_id = ? AND message_id > ? AND created_at >= ? \
                     ORDER BY message_id ASC LIMIT ?",
                )
                .bind(query.chat_id)
                .bind(query.after_message_id)
                .bind(since)
                .bind(query.limit)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MessageRecord>(
                    "SELECT * FROM messages WHERE chat_id = ? AND message_id > ? \
                     ORDER BY message_id ASC LIMIT ?",
                )
                .bind(query.chat_id)
                .bind(query.after_message_id)
                .bind(query.limit)
                .fetch_all(pool)
                .await?
            }
        };

        debug!(
            chat_id = query.chat_id,
            after = query.after_message_id,
            count = messages.len(),
            "Retrieved message page"
        );

        Ok(messages)
    }

    pub async fn count_messages(&self, chat_id: i64) -> Result<i64, StorageError> {
        let pool = self.pool_manager.pool();
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}
