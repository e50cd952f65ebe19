//! Which chat is monitored, where reports go, and the command-layer knobs.

use anyhow::{anyhow, Result};
use qmark_stats::DEFAULT_PAGE_SIZE;
use std::env;
use std::str::FromStr;

pub const DEFAULT_COMMAND_PREFIX: &str = "/";
pub const DEFAULT_REPORT_COOLDOWN_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// MONITOR_CHAT_ID: the question-mark chat
    pub monitor_chat_id: i64,
    /// REPORT_CHAT_ID: where notices and charts go
    pub report_chat_id: i64,
    /// ANCHOR_MESSAGE_ID: counting starts strictly after this message
    pub anchor_message_id: i32,
    /// COMMAND_PREFIX
    pub command_prefix: String,
    /// REPORT_COOLDOWN_SECS: one go / history per this many seconds
    pub report_cooldown_secs: u64,
    /// CRAWL_PAGE_SIZE
    pub crawl_page_size: usize,
}

impl ChannelConfig {
    pub fn from_env() -> Result<Self> {
        let command_prefix = env::var("COMMAND_PREFIX")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string());

        Ok(Self {
            monitor_chat_id: required("MONITOR_CHAT_ID")?,
            report_chat_id: required("REPORT_CHAT_ID")?,
            anchor_message_id: required("ANCHOR_MESSAGE_ID")?,
            command_prefix,
            report_cooldown_secs: optional("REPORT_COOLDOWN_SECS", DEFAULT_REPORT_COOLDOWN_SECS),
            crawl_page_size: optional("CRAWL_PAGE_SIZE", DEFAULT_PAGE_SIZE),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.anchor_message_id <= 0 {
            anyhow::bail!(
                "ANCHOR_MESSAGE_ID must be a positive message id, got {}",
                self.anchor_message_id
            );
        }
        if self.crawl_page_size == 0 {
            anyhow::bail!("CRAWL_PAGE_SIZE must be at least 1");
        }
        Ok(())
    }
}

fn required<T: FromStr>(name: &str) -> Result<T> {
    let raw = env::var(name).map_err(|_| anyhow!("{} not set", name))?;
    raw.trim()
        .parse()
        .map_err(|_| anyhow!("{} is not a valid number: {}", name, raw))
}

fn optional<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
