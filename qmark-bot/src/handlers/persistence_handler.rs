//! Handler that records the monitored chat into the message log in before().

use async_trait::async_trait;
use qmark_core::{Handler, Message, Result};
use storage::MessageRepository;
use tracing::{error, info, instrument};

use crate::source::{storage_error, to_record};

/// Saves every message (and every edit) posted in `monitor_chat_id`; other chats pass through untouched.
#[derive(Clone)]
pub struct PersistenceHandler {
    repo: MessageRepository,
    monitor_chat_id: i64,
}

impl PersistenceHandler {
    pub fn new(repo: MessageRepository, monitor_chat_id: i64) -> Self {
        Self {
            repo,
            monitor_chat_id,
        }
    }
}

#[async_trait]
impl Handler for PersistenceHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = message.id))]
    async fn before(&self, message: &Message) -> Result<bool> {
        if message.chat.id != self.monitor_chat_id {
            return Ok(true);
        }

        self.repo.save(&to_record(message)).await.map_err(|e| {
            error!(error = %e, "Failed to record message");
            storage_error(e)
        })?;

        info!(
            author_id = message.author.id,
            kind = %message.kind,
            edited = message.is_edit(),
            "step: PersistenceHandler recorded message"
        );
        Ok(true)
    }
}
