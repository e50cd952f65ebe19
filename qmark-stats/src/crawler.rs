//! Pull-based crawl of the monitored channel, forward from the anchor message.
//!
//! [`ChannelCrawler`] pages through a [`MessageSource`] with an explicit cursor (the last yielded id).
//! It is finite once the source is exhausted, and a fresh crawler over the same anchor yields the same sequence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qmark_core::{Message, QmarkError, Result};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::retry::{retry_rate_limited, RetryPolicy};

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// One page request: messages of `chat_id` with id greater than `after`, ascending, at most `limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub chat_id: i64,
    pub after: i32,
    pub since: Option<DateTime<Utc>>,
    pub limit: usize,
}

/// Where messages come from. Implementations return `NotFound` when the channel is gone
/// and `RateLimited` when throttled.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Whether the anchor message exists in the channel.
    async fn anchor_exists(&self, chat_id: i64, anchor_id: i32) -> Result<bool>;
    /// Fetches one page in ascending id order.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Message>>;
}

/// What to crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub chat_id: i64,
    pub anchor_id: i32,
    pub since: Option<DateTime<Utc>>,
    pub page_size: usize,
}

impl CrawlRequest {
    pub fn new(chat_id: i64, anchor_id: i32) -> Self {
        Self {
            chat_id,
            anchor_id,
            since: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_since(mut self, since: Option<DateTime<Utc>>) -> Self {
        self.since = since;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

pub struct ChannelCrawler {
    source: Arc<dyn MessageSource>,
    request: CrawlRequest,
    retry: RetryPolicy,
    cursor: i32,
    buffer: VecDeque<Message>,
    anchor_checked: bool,
    exhausted: bool,
    pages: usize,
}

impl ChannelCrawler {
    pub fn new(source: Arc<dyn MessageSource>, request: CrawlRequest) -> Self {
        let cursor = request.anchor_id;
        Self {
            source,
            request,
            retry: RetryPolicy::default(),
            cursor,
            buffer: VecDeque::new(),
            anchor_checked: false,
            exhausted: false,
            pages: 0,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Id of the last message handed out (the anchor before the first one).
    pub fn cursor(&self) -> i32 {
        self.cursor
    }

    /// Next message after the cursor, or `None` when the source is exhausted.
    pub async fn next(&mut self) -> Result<Option<Message>> {
        if !self.anchor_checked {
            self.check_anchor().await?;
        }

        if let Some(message) = self.buffer.pop_front() {
            return Ok(Some(message));
        }
        if self.exhausted {
            return Ok(None);
        }

        let page = self.fetch_with_retry().await?;
        self.pages += 1;
        if page.len() < self.request.page_size {
            self.exhausted = true;
        }

        // Keep ids strictly increasing even if the source repeats itself.
        for message in page {
            if message.id > self.cursor {
                self.cursor = message.id;
                self.buffer.push_back(message);
            }
        }
        if self.buffer.is_empty() {
            self.exhausted = true;
        }

        debug!(
            chat_id = self.request.chat_id,
            page = self.pages,
            cursor = self.cursor,
            buffered = self.buffer.len(),
            "Fetched crawl page"
        );

        Ok(self.buffer.pop_front())
    }

    #[instrument(skip(self), fields(chat_id = self.request.chat_id, anchor_id = self.request.anchor_id))]
    async fn check_anchor(&mut self) -> Result<()> {
        let exists = self
            .source
            .anchor_exists(self.request.chat_id, self.request.anchor_id)
            .await?;
        if !exists {
            return Err(QmarkError::NotFound(format!(
                "anchor message {} in chat {}",
                self.request.anchor_id, self.request.chat_id
            )));
        }
        self.anchor_checked = true;
        info!("step: crawl started from anchor");
        Ok(())
    }

    async fn fetch_with_retry(&self) -> Result<Vec<Message>> {
        let page_request = PageRequest {
            chat_id: self.request.chat_id,
            after: self.cursor,
            since: self.request.since,
            limit: self.request.page_size,
        };

        retry_rate_limited(&self.retry, "fetch crawl page", || {
            self.source.fetch_page(&page_request)
        })
        .await
    }
}
