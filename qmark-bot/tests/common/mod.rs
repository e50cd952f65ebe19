//! Test doubles: a recording [`Bot`] plus config and message builders.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use qmark_bot::{BaseConfig, BotConfig, ChannelConfig};
use qmark_core::{
    Author, Bot, Chat, ChatType, ImageArtifact, Message, MessageKind, PinOutcome, QmarkError,
    Result,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const MONITOR_CHAT: i64 = -1001;
pub const REPORT_CHAT: i64 = -2002;
pub const ANCHOR: i32 = 10;

pub fn config(database_url: &str, cooldown_secs: u64) -> BotConfig {
    BotConfig {
        base: BaseConfig {
            bot_token: "test_token".to_string(),
            telegram_api_url: None,
            log_file: "logs/test.log".to_string(),
            database_url: database_url.to_string(),
        },
        channels: ChannelConfig {
            monitor_chat_id: MONITOR_CHAT,
            report_chat_id: REPORT_CHAT,
            anchor_message_id: ANCHOR,
            command_prefix: "/".to_string(),
            report_cooldown_secs: cooldown_secs,
            crawl_page_size: 2,
        },
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

pub fn author(id: i64, name: &str) -> Author {
    Author {
        id,
        display_name: name.to_string(),
    }
}

/// Message `id` in the monitored chat, posted `id` hours after [`base_time`].
pub fn channel_message(id: i32, author: &Author, content: &str) -> Message {
    Message {
        id,
        chat: Chat::new(MONITOR_CHAT, ChatType::Supergroup),
        author: author.clone(),
        content: content.to_string(),
        kind: MessageKind::Default,
        created_at: base_time() + Duration::hours(id as i64),
        edited_at: None,
    }
}

pub fn command(chat_id: i64, chat_type: ChatType, text: &str) -> Message {
    Message {
        id: 500,
        chat: Chat::new(chat_id, chat_type),
        author: author(99, "@operator"),
        content: text.to_string(),
        kind: MessageKind::Default,
        created_at: Utc::now(),
        edited_at: None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotEvent {
    Text { chat_id: i64, text: String },
    Image { chat_id: i64, file_name: String },
    Typing { chat_id: i64 },
    Pin { chat_id: i64, message_id: i32 },
}

/// Records every call; pins succeed unless `deny_pins` is set.
#[derive(Default)]
pub struct RecordingBot {
    events: Mutex<Vec<BotEvent>>,
    deny_pins: bool,
    throttled_sends: AtomicUsize,
}

impl RecordingBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn denying_pins() -> Self {
        Self {
            deny_pins: true,
            ..Self::default()
        }
    }

    /// The first `sends` text or chart sends come back `RateLimited` and are not recorded.
    pub fn throttling_sends(sends: usize) -> Self {
        Self {
            throttled_sends: AtomicUsize::new(sends),
            ..Self::default()
        }
    }

    fn throttled(&self) -> bool {
        self.throttled_sends
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn events(&self) -> Vec<BotEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BotEvent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        if self.throttled() {
            return Err(QmarkError::RateLimited {
                retry_after: std::time::Duration::ZERO,
            });
        }
        self.events.lock().unwrap().push(BotEvent::Text {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_image(&self, chat_id: i64, image: ImageArtifact) -> Result<()> {
        if self.throttled() {
            return Err(QmarkError::RateLimited {
                retry_after: std::time::Duration::ZERO,
            });
        }
        if !image.bytes.starts_with(b"<svg") {
            return Err(QmarkError::Bot("not an svg".to_string()));
        }
        self.events.lock().unwrap().push(BotEvent::Image {
            chat_id,
            file_name: image.file_name,
        });
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        self.events.lock().unwrap().push(BotEvent::Typing { chat_id });
        Ok(())
    }

    async fn pin_message(&self, chat_id: i64, message_id: i32) -> PinOutcome {
        self.events
            .lock()
            .unwrap()
            .push(BotEvent::Pin { chat_id, message_id });
        if self.deny_pins {
            PinOutcome::PermissionDenied
        } else {
            PinOutcome::Pinned
        }
    }
}
