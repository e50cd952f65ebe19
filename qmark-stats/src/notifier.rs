//! Announces and pins anomalous messages as the crawl discovers them.

use qmark_core::{Bot, Message, PinOutcome, Result};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::retry::{retry_rate_limited, RetryPolicy};

pub const PIN_FAILED_NOTICE: &str = "I couldn't pin a message!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Pinned,
    /// Notice sent, but the bot may not pin in the monitored chat.
    PinDenied,
}

/// Notice text for an anomalous message.
pub fn format_notice(message: &Message) -> String {
    format!(
        "I found a message saying [{}] (by {}, on {})",
        message.content,
        message.author.display_name,
        message.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

pub struct AnomalyNotifier {
    bot: Arc<dyn Bot>,
    report_chat_id: i64,
    retry: RetryPolicy,
}

impl AnomalyNotifier {
    pub fn new(bot: Arc<dyn Bot>, report_chat_id: i64) -> Self {
        Self {
            bot,
            report_chat_id,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sends the notice, then pins the original. Rate-limited calls are retried. A denied pin is
    /// announced and is not an error; any other failure is returned for this message only.
    #[instrument(skip(self, message), fields(message_id = message.id, chat_id = message.chat.id))]
    pub async fn notify(&self, message: &Message) -> Result<NotifyOutcome> {
        let notice = format_notice(message);
        self.send(&notice).await?;

        let bot = &self.bot;
        let (chat_id, message_id) = (message.chat.id, message.id);
        let pinned = retry_rate_limited(&self.retry, "pin anomalous message", move || async move {
            match bot.pin_message(chat_id, message_id).await {
                PinOutcome::Failed(e) => Err(e),
                outcome => Ok(outcome),
            }
        })
        .await?;

        match pinned {
            PinOutcome::Pinned => {
                info!("step: anomalous message announced and pinned");
                Ok(NotifyOutcome::Pinned)
            }
            PinOutcome::PermissionDenied => {
                warn!("Not allowed to pin anomalous message");
                self.send(PIN_FAILED_NOTICE).await?;
                Ok(NotifyOutcome::PinDenied)
            }
            PinOutcome::Failed(e) => Err(e),
        }
    }

    async fn send(&self, text: &str) -> Result<()> {
        let bot = &self.bot;
        let chat_id = self.report_chat_id;
        retry_rate_limited(&self.retry, "send anomaly notice", move || {
            bot.send_message(chat_id, text)
        })
        .await
    }
}
