//! Wraps teloxide::Bot and implements [`qmark_core::Bot`]. Tests substitute a recording Bot instead.

use async_trait::async_trait;
use qmark_core::{Bot as CoreBot, ImageArtifact, PinOutcome, QmarkError, Result};
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ChatId, InputFile, MessageId};
use teloxide::{ApiError, RequestError};
use tracing::warn;

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

/// Maps a teloxide failure onto the error taxonomy the pipeline understands.
pub fn map_request_error(err: RequestError) -> QmarkError {
    match err {
        RequestError::RetryAfter(secs) => QmarkError::RateLimited {
            retry_after: secs.duration(),
        },
        RequestError::MigrateToChatId(new_id) => {
            QmarkError::NotFound(format!("chat migrated to {:?}", new_id))
        }
        RequestError::Api(ApiError::ChatNotFound) => QmarkError::NotFound("chat not found".to_string()),
        RequestError::Api(api) if is_rights_error(&api) => QmarkError::PermissionDenied(api.to_string()),
        other => QmarkError::Bot(other.to_string()),
    }
}

fn is_rights_error(api: &ApiError) -> bool {
    matches!(api, ApiError::NotEnoughRightsToPinMessage)
        || api.to_string().to_lowercase().contains("not enough rights")
}

/// Missing rights become [`PinOutcome::PermissionDenied`]; everything else is a per-message failure.
pub fn pin_outcome_for(err: RequestError) -> PinOutcome {
    match map_request_error(err) {
        QmarkError::PermissionDenied(_) => PinOutcome::PermissionDenied,
        other => PinOutcome::Failed(other),
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text.to_string())
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn send_image(&self, chat_id: i64, image: ImageArtifact) -> Result<()> {
        let file = InputFile::memory(image.bytes).file_name(image.file_name);
        self.bot
            .send_document(ChatId(chat_id), file)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn pin_message(&self, chat_id: i64, message_id: i32) -> PinOutcome {
        match self
            .bot
            .pin_chat_message(ChatId(chat_id), MessageId(message_id))
            .await
        {
            Ok(_) => PinOutcome::Pinned,
            Err(e) => {
                warn!(error = %e, chat_id, message_id, "Pin request failed");
                pin_outcome_for(e)
            }
        }
    }
}
