//! Test doubles for the pipeline: an in-memory [`MessageSource`] and a recording [`Bot`].

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use qmark_core::{
    Author, Bot, Chat, ChatType, ImageArtifact, Message, MessageKind, PinOutcome, QmarkError,
    Result,
};
use qmark_stats::{MessageSource, PageRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const MONITOR_CHAT: i64 = -1001;
pub const REPORT_CHAT: i64 = -2002;
pub const ANCHOR: i32 = 10;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
}

pub fn author(id: i64, name: &str) -> Author {
    Author {
        id,
        display_name: name.to_string(),
    }
}

/// Message `id` in the monitored chat, posted `id` minutes after [`base_time`].
pub fn message(id: i32, author: &Author, content: &str) -> Message {
    Message {
        id,
        chat: Chat::new(MONITOR_CHAT, ChatType::Supergroup),
        author: author.clone(),
        content: content.to_string(),
        kind: MessageKind::Default,
        created_at: base_time() + Duration::minutes(id as i64),
        edited_at: None,
    }
}

/// In-memory source. Can be told to throttle the first N page fetches or to fail on a given page.
pub struct MockSource {
    messages: Vec<Message>,
    anchor_present: bool,
    rate_limited_fetches: AtomicUsize,
    fail_on_page: Option<usize>,
    pub fetches: AtomicUsize,
}

impl MockSource {
    pub fn new(mut messages: Vec<Message>) -> Self {
        messages.sort_by_key(|m| m.id);
        Self {
            messages,
            anchor_present: true,
            rate_limited_fetches: AtomicUsize::new(0),
            fail_on_page: None,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn without_anchor(mut self) -> Self {
        self.anchor_present = false;
        self
    }

    pub fn rate_limited_for(self, fetches: usize) -> Self {
        self.rate_limited_fetches.store(fetches, Ordering::SeqCst);
        self
    }

    /// The `page`-th successful fetch (0-based) reports the channel as gone.
    pub fn failing_on_page(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }
}

#[async_trait]
impl MessageSource for MockSource {
    async fn anchor_exists(&self, chat_id: i64, anchor_id: i32) -> Result<bool> {
        Ok(self.anchor_present && chat_id == MONITOR_CHAT && anchor_id == ANCHOR)
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Message>> {
        let remaining = self.rate_limited_fetches.load(Ordering::SeqCst);
        if remaining > 0 {
            self.rate_limited_fetches.store(remaining - 1, Ordering::SeqCst);
            return Err(QmarkError::RateLimited {
                retry_after: std::time::Duration::ZERO,
            });
        }

        let page_no = self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_page == Some(page_no) {
            return Err(QmarkError::NotFound(format!("chat {}", request.chat_id)));
        }

        Ok(self
            .messages
            .iter()
            .filter(|m| m.chat.id == request.chat_id && m.id > request.after)
            .filter(|m| request.since.map_or(true, |s| m.created_at >= s))
            .take(request.limit)
            .cloned()
            .collect())
    }
}

fn rate_limited() -> QmarkError {
    QmarkError::RateLimited {
        retry_after: std::time::Duration::ZERO,
    }
}

/// Decrements `counter` if it is positive; true when a unit was taken.
fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// Everything the pipeline asked the transport to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotEvent {
    Text { chat_id: i64, text: String },
    Image { chat_id: i64, file_name: String },
    Typing { chat_id: i64 },
    Pin { chat_id: i64, message_id: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinBehaviour {
    Allow,
    Deny,
    Fail,
}

pub struct RecordingBot {
    pub events: Mutex<Vec<BotEvent>>,
    pin: PinBehaviour,
    throttled_sends: AtomicUsize,
    throttled_pins: AtomicUsize,
}

impl RecordingBot {
    pub fn new(pin: PinBehaviour) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            pin,
            throttled_sends: AtomicUsize::new(0),
            throttled_pins: AtomicUsize::new(0),
        }
    }

    /// The first `sends` text messages come back `RateLimited` and are not recorded.
    pub fn throttling_sends(self, sends: usize) -> Self {
        self.throttled_sends.store(sends, Ordering::SeqCst);
        self
    }

    /// The first `pins` pin requests fail with `RateLimited` and are not recorded.
    pub fn throttling_pins(self, pins: usize) -> Self {
        self.throttled_pins.store(pins, Ordering::SeqCst);
        self
    }

    pub fn events(&self) -> Vec<BotEvent> {
        self.events.lock().unwrap().clone()
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

    pub fn pins(&self) -> Vec<i32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BotEvent::Pin { message_id, .. } => Some(message_id),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        if take_one(&self.throttled_sends) {
            return Err(rate_limited());
        }
        self.events.lock().unwrap().push(BotEvent::Text {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_image(&self, chat_id: i64, image: ImageArtifact) -> Result<()> {
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
        if take_one(&self.throttled_pins) {
            return PinOutcome::Failed(rate_limited());
        }
        self.events
            .lock()
            .unwrap()
            .push(BotEvent::Pin { chat_id, message_id });
        match self.pin {
            PinBehaviour::Allow => PinOutcome::Pinned,
            PinBehaviour::Deny => PinOutcome::PermissionDenied,
            PinBehaviour::Fail => PinOutcome::Failed(QmarkError::Bot("message to pin not found".into())),
        }
    }
}
